//! Configuration Types
//!
//! 定义应用级配置结构体（Profile 配置见 profile.rs / store.rs）

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// TTS Profile 配置文件路径
    #[serde(default = "default_profiles_path")]
    pub profiles_path: PathBuf,

    /// 数据目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_profiles_path() -> PathBuf {
    PathBuf::from("data/tts-profiles.json")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            profiles_path: default_profiles_path(),
            data_dir: default_data_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(
            config.storage.profiles_path,
            PathBuf::from("data/tts-profiles.json")
        );
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
    }
}
