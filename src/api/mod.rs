pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
