//! Configuration Module
//!
//! 两类配置：
//! - 应用配置（types/loader）：环境变量 > 配置文件 > 默认值
//! - TTS Profile 配置（profile/store）：用户可编辑、JSON 文件持久化

mod loader;
mod profile;
mod store;
mod types;

pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use profile::{
    default_profile, HttpMethod, ProfileError, TtsConfig, TtsProfile, DEFAULT_AUDIO_MIME,
    DEFAULT_PROFILE_ID,
};
pub use store::{StoreError, TtsConfigStore};
pub use types::{AppConfig, LogConfig, StorageConfig};
