//! 日志系统
//!
//! 控制台输出，可选按天滚动的日志文件；超过 `max_files` 个时由 appender 清理旧文件。

use crate::config::LogConfig;
use std::fs;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// 日志文件名前缀：`user-dirs.YYYY-MM-DD.log`
const LOG_FILE_PREFIX: &str = "user-dirs";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 日志守卫
/// 必须保持存活，否则文件写入线程会停止
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

fn build_file_appender(config: &LogConfig) -> Result<RollingFileAppender, String> {
    fs::create_dir_all(&config.log_dir)
        .map_err(|e| format!("failed to create log directory {:?}: {}", config.log_dir, e))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(&config.log_dir)
        .map_err(|e| format!("failed to create log file appender: {}", e))
}

/// 初始化全局日志订阅器
///
/// `RUST_LOG` 优先于 `config.level`。无法创建文件 appender 时只输出到控制台。
pub fn init_logging(config: &LogConfig) -> LogGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_ansi(true);

    if !config.enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();

        info!("Logging initialized (console only)");
        return LogGuard { _file_guard: None };
    }

    let appender = match build_file_appender(config) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("{}, falling back to console only", e);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            return LogGuard { _file_guard: None };
        }
    };

    let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        "Logging initialized: dir={:?}, level={}, keep {} files",
        config.log_dir, config.level, config.max_files
    );

    LogGuard {
        _file_guard: Some(file_guard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_appender_creates_log_dir() {
        let temp = TempDir::new().unwrap();
        let config = LogConfig {
            log_dir: temp.path().join("logs"),
            ..Default::default()
        };

        assert!(build_file_appender(&config).is_ok());
        assert!(config.log_dir.is_dir());
    }
}
