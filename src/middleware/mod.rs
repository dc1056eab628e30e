pub mod auth;
pub mod response;

pub use auth::{session_middleware, AuthUser, Session};
pub use response::{ApiResponse, ApiResult};
