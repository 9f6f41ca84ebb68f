// 用户存储模块
//
// 基础目录下的用户目录及其文件

mod guard;
mod service;
mod types;
mod upload;

pub use guard::SegmentGuard;
pub use service::UserStorage;
pub use types::*;
pub use upload::UploadSink;
