pub mod access_mode;
pub mod auth;
pub mod cookies;
pub mod response;
pub mod validate_user;

pub use access_mode::{access_mode_middleware, AccessMode};
pub use auth::{require_user_manager, session_auth_middleware};
pub use response::{ApiResponse, ApiResult};
pub use validate_user::validate_user_middleware;
