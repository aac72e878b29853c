//! Route display colors.

use std::collections::HashMap;

/// Display color used for routes without an explicit mapping.
const FALLBACK_COLOR: &str = "#4a5568";

/// Route id → CSS color mapping for the board cards.
///
/// Known routes get a stable color so the board reads consistently across
/// refreshes; anything else falls back to a neutral tone.
#[derive(Debug, Clone)]
pub struct RouteColors {
    colors: HashMap<String, String>,
    fallback: String,
}

impl Default for RouteColors {
    fn default() -> Self {
        let mut colors = HashMap::new();
        for (route, color) in [
            ("B24", "#00843d"),
            ("B32", "#b933ad"),
            ("B43", "#ee352e"),
            ("B48", "#ff6319"),
            ("B62", "#0039a6"),
        ] {
            colors.insert(route.to_string(), color.to_string());
        }

        Self {
            colors,
            fallback: FALLBACK_COLOR.to_string(),
        }
    }
}

impl RouteColors {
    /// Look up the display color for a route id.
    pub fn color_for(&self, route_id: &str) -> &str {
        self.colors
            .get(route_id)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Add or override a route color.
    pub fn with_color(mut self, route_id: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(route_id.into(), color.into());
        self
    }
}
