//! Text pattern helpers for the extractor.
//!
//! These reproduce the upstream page's loosely-structured text conventions:
//! arrival text like "3 min" or "Approaching", and distance text like
//! "2 stops away" or "0.6 miles away". All functions are total; anything
//! unrecognized degrades to a defined default instead of failing.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::UNRANKED;

/// Stops shown per mile when the upstream only reports a distance in miles.
const STOPS_PER_MILE: f64 = 8.0;

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid pattern"))
}

fn stops_away_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d+)\s+stops?\s+away").expect("valid pattern"))
}

fn miles_away_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s+miles?\s+away").expect("valid pattern"))
}

fn distance_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Everything between "minute(s)," and either the token "Vehicle" or
    // the end of the text.
    RE.get_or_init(|| {
        Regex::new(r"(?is)minutes?\s*,\s*(.*?)\s*(?:\bVehicle\b|$)").expect("valid pattern")
    })
}

/// Derive the sort rank for an arrival's display text.
///
/// "Approaching" ranks 0, "<1 min" style text ranks 0.5, otherwise the
/// leading number is the rank. Text with no parsable number gets the
/// [`UNRANKED`] sentinel so it sorts last. The rank is never displayed.
pub fn minutes_rank(text: &str) -> f32 {
    if text.to_ascii_lowercase().contains("approaching") {
        return 0.0;
    }
    if text.contains('<') {
        return 0.5;
    }
    leading_number_re()
        .captures(text)
        .and_then(|c| c[1].parse::<f32>().ok())
        .unwrap_or(UNRANKED)
}

/// Pull the raw distance text out of an arrival item's full text.
///
/// Returns the segment between "minute(s)," and the "Vehicle" token (or end
/// of text), with surrounding whitespace and a trailing comma removed.
/// Empty string when the pattern does not match.
pub fn distance_text(full_text: &str) -> String {
    distance_segment_re()
        .captures(full_text)
        .map(|c| c[1].trim().trim_end_matches(',').trim_end().to_string())
        .unwrap_or_default()
}

/// Normalize raw distance text into a display label.
///
/// First matching rule wins:
/// 1. "N stop(s) away" is re-emitted as "N stops away".
/// 2. Anything containing "approaching" becomes "Approaching".
/// 3. "X mile(s) away" is converted at [`STOPS_PER_MILE`], clamped to at
///    least one stop, and emitted as "~N stops away".
/// 4. Otherwise the raw text passes through unchanged.
pub fn normalize_distance(raw: &str) -> String {
    if let Some(captures) = stops_away_re().captures(raw) {
        return format!("{} stops away", &captures[1]);
    }

    if raw.to_ascii_lowercase().contains("approaching") {
        return "Approaching".to_string();
    }

    if let Some(captures) = miles_away_re().captures(raw) {
        if let Ok(miles) = captures[1].parse::<f64>() {
            let stops = (miles * STOPS_PER_MILE).round().max(1.0) as u64;
            return format!("~{stops} stops away");
        }
    }

    raw.to_string()
}
