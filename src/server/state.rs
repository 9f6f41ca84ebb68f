// 应用状态

use crate::config::AppConfig;
use crate::filesystem::UserStorage;
use anyhow::Context;
use std::sync::Arc;

/// 共享应用状态
#[derive(Clone)]
pub struct AppState {
    /// 用户目录存储
    pub storage: Arc<UserStorage>,
    /// 应用配置
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 构建状态，基础目录不存在时创建
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let storage = UserStorage::new(config.storage.base_dir.clone());
        storage
            .ensure_base_dir()
            .with_context(|| format!("Failed to prepare base directory {:?}", storage.base_dir()))?;

        Ok(Self {
            storage: Arc::new(storage),
            config: Arc::new(config),
        })
    }
}
