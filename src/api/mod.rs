//! HTTP API module: chart routes, landing page, health and metrics
//! endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
