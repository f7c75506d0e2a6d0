pub mod auth;
pub mod error;

pub use auth::{require_admin, require_auth, AppState, AuthenticatedUser};
pub use error::{ApiError, ApiResult};
