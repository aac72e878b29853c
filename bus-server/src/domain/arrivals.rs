//! Arrival snapshot types and display ordering.

use std::cmp::Ordering;

/// Rank assigned when no numeric value can be parsed from the display text.
/// Sorts after every real estimate.
pub const UNRANKED: f32 = 999.0;

/// A single bus arrival estimate for a route at a stop.
///
/// `minutes_rank` is a sort key derived from `display_text` and is never
/// shown to the user; display always uses the original text verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalEstimate {
    /// Upstream display text, e.g. "3 min", "<1 min", "Approaching".
    pub display_text: String,

    /// Numeric sort key: 0 for approaching, 0.5 for "<1 min" style text,
    /// the leading number otherwise, [`UNRANKED`] when nothing parses.
    pub minutes_rank: f32,

    /// Normalized distance text, e.g. "2 stops away", "~4 stops away".
    pub distance_label: String,

    /// Vehicle identifier with the upstream "Vehicle " prefix stripped.
    /// Empty when the source omits it.
    pub vehicle_id: String,
}

/// All arrival estimates for one route+direction pair at a stop.
///
/// `arrivals` may be empty: a route section that currently has no buses
/// en route is still emitted, and the consumer renders it as such.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteArrivals {
    /// Route identifier, e.g. "B62".
    pub route_id: String,

    /// Direction text from the section header; empty when absent.
    pub direction: String,

    /// Estimates in upstream document order (first seen is soonest).
    pub arrivals: Vec<ArrivalEstimate>,
}

/// One extraction result for a stop.
///
/// Produced fresh on every extraction; each snapshot replaces the previous
/// one in the consuming layer. Routes are kept in document order — use
/// [`order_for_display`] for presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopSnapshot {
    /// Stop name from the page heading; empty when not present.
    pub stop_name: String,

    /// Route sections in upstream document order.
    pub routes: Vec<RouteArrivals>,
}

/// Order routes for display.
///
/// Routes with at least one arrival come first, sorted ascending by their
/// soonest arrival's rank (stable, so ties keep document order). Routes
/// with no buses en route follow, in document order.
pub fn order_for_display(snapshot: &StopSnapshot) -> Vec<&RouteArrivals> {
    let (mut with_arrivals, without): (Vec<&RouteArrivals>, Vec<&RouteArrivals>) = snapshot
        .routes
        .iter()
        .partition(|r| !r.arrivals.is_empty());

    with_arrivals.sort_by(|a, b| {
        a.arrivals[0]
            .minutes_rank
            .partial_cmp(&b.arrivals[0].minutes_rank)
            .unwrap_or(Ordering::Equal)
    });

    with_arrivals.into_iter().chain(without).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, ranks: &[f32]) -> RouteArrivals {
        RouteArrivals {
            route_id: id.to_string(),
            direction: String::new(),
            arrivals: ranks
                .iter()
                .map(|&r| ArrivalEstimate {
                    display_text: String::new(),
                    minutes_rank: r,
                    distance_label: String::new(),
                    vehicle_id: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn sorts_by_first_arrival_rank() {
        let snapshot = StopSnapshot {
            stop_name: String::new(),
            routes: vec![route("B62", &[7.0, 12.0]), route("B43", &[0.5]), route("B48", &[3.0])],
        };

        let ordered: Vec<&str> = order_for_display(&snapshot)
            .iter()
            .map(|r| r.route_id.as_str())
            .collect();
        assert_eq!(ordered, vec!["B43", "B48", "B62"]);
    }

    #[test]
    fn unranked_sorts_last_among_non_empty() {
        let snapshot = StopSnapshot {
            stop_name: String::new(),
            routes: vec![route("B24", &[UNRANKED]), route("B62", &[5.0])],
        };

        let ordered: Vec<&str> = order_for_display(&snapshot)
            .iter()
            .map(|r| r.route_id.as_str())
            .collect();
        assert_eq!(ordered, vec!["B62", "B24"]);
    }

    #[test]
    fn empty_routes_grouped_after_routes_with_arrivals() {
        let snapshot = StopSnapshot {
            stop_name: String::new(),
            routes: vec![
                route("B24", &[]),
                route("B62", &[UNRANKED]),
                route("B43", &[]),
                route("B48", &[2.0]),
            ],
        };

        let ordered: Vec<&str> = order_for_display(&snapshot)
            .iter()
            .map(|r| r.route_id.as_str())
            .collect();
        // Empty routes keep document order at the end.
        assert_eq!(ordered, vec!["B48", "B62", "B24", "B43"]);
    }

    #[test]
    fn stable_for_equal_ranks() {
        let snapshot = StopSnapshot {
            stop_name: String::new(),
            routes: vec![route("B62", &[3.0]), route("B43", &[3.0])],
        };

        let ordered: Vec<&str> = order_for_display(&snapshot)
            .iter()
            .map(|r| r.route_id.as_str())
            .collect();
        assert_eq!(ordered, vec!["B62", "B43"]);
    }
}
