//! Configuration loading and validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calculate::{AchievementOptions, RivalryOptions};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Rivalry detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalryConfig {
    /// Shared tracks a pair needs before it counts as a rivalry
    #[serde(default = "default_min_shared_tracks")]
    pub min_shared_tracks: u32,

    /// Player logins never paired with anyone
    #[serde(default)]
    pub excluded_players: Vec<String>,
}

fn default_min_shared_tracks() -> u32 {
    3
}

impl Default for RivalryConfig {
    fn default() -> Self {
        Self {
            min_shared_tracks: default_min_shared_tracks(),
            excluded_players: Vec::new(),
        }
    }
}

/// Achievement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementsConfig {
    /// First night hour, inclusive
    #[serde(default)]
    pub night_start_hour: u32,

    /// Last night hour, inclusive
    #[serde(default = "default_night_end_hour")]
    pub night_end_hour: u32,

    /// Track-name keyword for the keyword award
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// Regex matched against server labels; empty disables the server award
    #[serde(default = "default_featured_server_pattern")]
    pub featured_server_pattern: String,

    #[serde(default = "default_featured_server_title")]
    pub featured_server_title: String,
}

fn default_night_end_hour() -> u32 {
    6
}

fn default_keyword() -> String {
    "lolsport".to_string()
}

fn default_featured_server_pattern() -> String {
    crate::calculate::achievements::DEFAULT_FEATURED_SERVER_PATTERN.to_string()
}

fn default_featured_server_title() -> String {
    "MINILOL CHAMPION".to_string()
}

impl Default for AchievementsConfig {
    fn default() -> Self {
        Self {
            night_start_hour: 0,
            night_end_hour: default_night_end_hour(),
            keyword: default_keyword(),
            featured_server_pattern: default_featured_server_pattern(),
            featured_server_title: default_featured_server_title(),
        }
    }
}

/// Server preference analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerAnalysisConfig {
    /// Attempts a player needs on a server before it is listed for them
    #[serde(default = "default_min_records")]
    pub min_records: u32,
}

fn default_min_records() -> u32 {
    5
}

impl Default for ServerAnalysisConfig {
    fn default() -> Self {
        Self {
            min_records: default_min_records(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Player logins included in reports; empty means everyone in the data
    #[serde(default)]
    pub roster: Vec<String>,

    #[serde(default)]
    pub rivalry: RivalryConfig,

    #[serde(default)]
    pub achievements: AchievementsConfig,

    #[serde(default)]
    pub server_analysis: ServerAnalysisConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            roster: Vec::new(),
            rivalry: RivalryConfig::default(),
            achievements: AchievementsConfig::default(),
            server_analysis: ServerAnalysisConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir must not be empty".to_string(),
            ));
        }

        if self.rivalry.min_shared_tracks == 0 {
            return Err(ConfigError::ValidationError(
                "rivalry.min_shared_tracks must be greater than 0".to_string(),
            ));
        }

        let a = &self.achievements;
        if a.night_start_hour > 23 || a.night_end_hour > 23 {
            return Err(ConfigError::ValidationError(
                "Night hours must be between 0 and 23".to_string(),
            ));
        }
        if a.night_start_hour > a.night_end_hour {
            return Err(ConfigError::ValidationError(format!(
                "night_start_hour ({}) is after night_end_hour ({})",
                a.night_start_hour, a.night_end_hour
            )));
        }
        self.featured_server_regex()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn featured_server_regex(&self) -> Result<Option<Regex>, ConfigError> {
        let pattern = self.achievements.featured_server_pattern.trim();
        if pattern.is_empty() {
            return Ok(None);
        }
        Regex::new(pattern).map(Some).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid featured_server_pattern: {}", e))
        })
    }

    pub fn rivalry_options(&self) -> RivalryOptions {
        RivalryOptions::default()
            .with_min_shared_tracks(self.rivalry.min_shared_tracks)
            .with_excluded(self.rivalry.excluded_players.iter().cloned())
    }

    pub fn achievement_options(&self) -> Result<AchievementOptions, ConfigError> {
        let a = &self.achievements;
        Ok(AchievementOptions {
            night_start_hour: a.night_start_hour,
            night_end_hour: a.night_end_hour,
            keyword: a.keyword.clone(),
            featured_server: self.featured_server_regex()?,
            featured_server_title: a.featured_server_title.clone(),
        })
    }
}
