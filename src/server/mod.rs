// Web 服务器模块

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult, UploadError};
pub use router::build_router;
pub use state::AppState;
