use std::sync::Arc;

use crate::calculate::{AchievementOptions, RivalryOptions};
use crate::config::{AppConfig, ConfigError};
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub config: Arc<AppConfig>,
    pub rivalry: Arc<RivalryOptions>,
    pub achievements: Arc<AchievementOptions>,
}

impl AppState {
    /// Build state from a validated config.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let achievements = config.achievement_options()?;
        Ok(Self {
            storage: Arc::new(StorageConfig::new(config.data_dir.clone())),
            rivalry: Arc::new(config.rivalry_options()),
            achievements: Arc::new(achievements),
            config: Arc::new(config),
        })
    }
}
