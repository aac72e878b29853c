//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ArrivalEstimate, RouteArrivals, RouteColors, StopSnapshot, order_for_display};

/// One stop's board, as served by the JSON API.
///
/// Routes are already in display order. A transport failure does not blank
/// the board: `routes` keeps the retained snapshot and `error` carries the
/// failure message.
#[derive(Debug, Serialize)]
pub struct StopBoardResponse {
    /// The queried stop code
    pub stop_code: String,

    /// Stop name from the tracker page; empty when unknown
    pub stop_name: String,

    /// Routes in display order
    pub routes: Vec<RouteResult>,

    /// Message from the most recent failed fetch, if the last fetch failed
    pub error: Option<String>,

    /// Whole seconds until a refresh is allowed again
    pub cooldown_seconds: u64,

    /// Whether a fetch is currently outstanding
    pub refreshing: bool,
}

impl StopBoardResponse {
    /// Assemble a response from controller state.
    pub fn build(
        stop_code: &str,
        snapshot: Option<&StopSnapshot>,
        error: Option<String>,
        cooldown_seconds: u64,
        refreshing: bool,
        colors: &RouteColors,
    ) -> Self {
        let (stop_name, routes) = match snapshot {
            Some(snapshot) => (
                snapshot.stop_name.clone(),
                order_for_display(snapshot)
                    .into_iter()
                    .map(|r| RouteResult::from_route(r, colors))
                    .collect(),
            ),
            None => (String::new(), Vec::new()),
        };

        Self {
            stop_code: stop_code.to_string(),
            stop_name,
            routes,
            error,
            cooldown_seconds,
            refreshing,
        }
    }
}

/// A route's arrivals in API responses.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    /// Route identifier, e.g. "B62"
    pub route_id: String,

    /// Direction text; empty when the header had none
    pub direction: String,

    /// Display color for the route card
    pub color: String,

    /// Arrivals, soonest first
    pub arrivals: Vec<ArrivalResult>,
}

impl RouteResult {
    /// Convert a domain route for API output.
    pub fn from_route(route: &RouteArrivals, colors: &RouteColors) -> Self {
        Self {
            route_id: route.route_id.clone(),
            direction: route.direction.clone(),
            color: colors.color_for(&route.route_id).to_string(),
            arrivals: route.arrivals.iter().map(ArrivalResult::from_arrival).collect(),
        }
    }
}

/// A single arrival estimate in API responses.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    /// Display text verbatim from the tracker, e.g. "3 min"
    pub display_text: String,

    /// Normalized distance label, e.g. "2 stops away"
    pub distance_label: String,

    /// Vehicle identifier; empty when the source omits it
    pub vehicle_id: String,
}

impl ArrivalResult {
    fn from_arrival(arrival: &ArrivalEstimate) -> Self {
        Self {
            display_text: arrival.display_text.clone(),
            distance_label: arrival.distance_label.clone(),
            vehicle_id: arrival.vehicle_id.clone(),
        }
    }
}

/// Browser-reported visibility change.
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    /// Whether the board page is currently visible
    pub visible: bool,
}

/// Error payload for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNRANKED;

    fn snapshot() -> StopSnapshot {
        let arrival = |text: &str, rank: f32| ArrivalEstimate {
            display_text: text.to_string(),
            minutes_rank: rank,
            distance_label: String::new(),
            vehicle_id: String::new(),
        };
        StopSnapshot {
            stop_name: "MANHATTAN AV/NORMAN AV".to_string(),
            routes: vec![
                RouteArrivals {
                    route_id: "B24".to_string(),
                    direction: "Greenpoint".to_string(),
                    arrivals: vec![],
                },
                RouteArrivals {
                    route_id: "B62".to_string(),
                    direction: "Queens Plaza".to_string(),
                    arrivals: vec![arrival("8 min", 8.0)],
                },
                RouteArrivals {
                    route_id: "B43".to_string(),
                    direction: "Kingston".to_string(),
                    arrivals: vec![arrival("<1 min", 0.5)],
                },
            ],
        }
    }

    #[test]
    fn response_routes_are_in_display_order() {
        let snapshot = snapshot();
        let response = StopBoardResponse::build(
            "308209",
            Some(&snapshot),
            None,
            0,
            false,
            &RouteColors::default(),
        );

        let ids: Vec<&str> = response.routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["B43", "B62", "B24"]);
        assert_eq!(response.stop_name, "MANHATTAN AV/NORMAN AV");
    }

    #[test]
    fn response_without_snapshot_is_empty_not_missing() {
        let response = StopBoardResponse::build(
            "308209",
            None,
            Some("upstream returned status 502".to_string()),
            3,
            false,
            &RouteColors::default(),
        );

        assert!(response.routes.is_empty());
        assert_eq!(response.error.as_deref(), Some("upstream returned status 502"));
        assert_eq!(response.cooldown_seconds, 3);
    }

    #[test]
    fn route_color_comes_from_the_map() {
        let route = RouteArrivals {
            route_id: "B62".to_string(),
            direction: String::new(),
            arrivals: vec![ArrivalEstimate {
                display_text: "err".to_string(),
                minutes_rank: UNRANKED,
                distance_label: String::new(),
                vehicle_id: String::new(),
            }],
        };

        let result = RouteResult::from_route(&route, &RouteColors::default());
        assert_eq!(result.color, "#0039a6");
    }
}
