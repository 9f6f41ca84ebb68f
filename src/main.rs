use user_dirs::{
    build_router,
    config::{AppConfig, LogConfig, CONFIG_PATH},
    logging, AppState,
};
use tracing::info;

/// 在日志系统初始化前读取日志配置
///
/// 任何失败都使用默认值；完整配置在日志就绪后加载，问题会记录到日志。
async fn load_log_config() -> LogConfig {
    if let Ok(content) = tokio::fs::read_to_string(CONFIG_PATH).await {
        if let Ok(config) = toml::from_str::<toml::Value>(&content) {
            if let Some(log_table) = config.get("log") {
                if let Ok(log_config) = log_table.clone().try_into::<LogConfig>() {
                    return log_config;
                }
            }
        }
    }

    LogConfig::default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_config = load_log_config().await;

    // 必须存活到程序退出
    let _log_guard = logging::init_logging(&log_config);

    info!("{} v{} starting", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(CONFIG_PATH).await;
    let addr = config.server.addr();

    let app_state = AppState::new(config)?;
    info!("Base directory: {:?}", app_state.storage.base_dir());

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
        }
    }

    info!("Stopped");
    Ok(())
}
