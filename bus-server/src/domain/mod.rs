//! Domain types for the arrival board.
//!
//! This module contains the core types that represent validated transit
//! data. `StopCode` enforces its invariants at construction time; the
//! snapshot types are plain immutable data produced by the extractor.

mod arrivals;
mod colors;
mod stop_code;

pub use arrivals::{ArrivalEstimate, RouteArrivals, StopSnapshot, UNRANKED, order_for_display};
pub use colors::RouteColors;
pub use stop_code::{InvalidStopCode, StopCode};
