// 用户目录服务库
// 通过 HTTP API 管理用户目录和文件

// 配置管理
pub mod config;

// 日志系统
pub mod logging;

// Web服务器
pub mod server;

// 本地文件系统上的用户存储
pub mod filesystem;

pub use config::AppConfig;
pub use filesystem::{DirectoryName, StorageError, UserStorage};
pub use server::{build_router, AppState};
