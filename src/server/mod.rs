//! The ambient HTTP layer (spec §4.9/§6): a thin axum router over the
//! command façade.

pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
