//! Web layer: router, handlers, templates, and DTOs.

mod dto;
mod routes;
mod state;
mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
