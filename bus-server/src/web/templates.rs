//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{ArrivalEstimate, RouteArrivals, RouteColors, StopSnapshot, order_for_display};

/// Arrival board page for one stop.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub stop_code: String,
    pub stop_name: String,
    pub routes: Vec<RouteView>,
    pub error: Option<String>,
    pub cooldown_seconds: u64,
    pub auto_interval_secs: u64,
}

impl BoardTemplate {
    /// Build the board view from controller state.
    pub fn build(
        stop_code: &str,
        snapshot: Option<&StopSnapshot>,
        error: Option<String>,
        cooldown_seconds: u64,
        auto_interval_secs: u64,
        colors: &RouteColors,
    ) -> Self {
        let (stop_name, routes) = match snapshot {
            Some(snapshot) => (
                snapshot.stop_name.clone(),
                order_for_display(snapshot)
                    .into_iter()
                    .map(|r| RouteView::from_route(r, colors))
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
            auto_interval_secs,
        }
    }
}

/// Route card view model.
pub struct RouteView {
    pub route_id: String,
    pub direction: String,
    pub color: String,
    pub arrivals: Vec<ArrivalView>,
}

impl RouteView {
    fn from_route(route: &RouteArrivals, colors: &RouteColors) -> Self {
        Self {
            route_id: route.route_id.clone(),
            direction: route.direction.clone(),
            color: colors.color_for(&route.route_id).to_string(),
            arrivals: route.arrivals.iter().map(ArrivalView::from_arrival).collect(),
        }
    }
}

/// Single arrival row view model.
pub struct ArrivalView {
    pub display_text: String,
    pub distance_label: String,
    pub vehicle_id: String,
}

impl ArrivalView {
    fn from_arrival(arrival: &ArrivalEstimate) -> Self {
        Self {
            display_text: arrival.display_text.clone(),
            distance_label: arrival.distance_label.clone(),
            vehicle_id: arrival.vehicle_id.clone(),
        }
    }
}
