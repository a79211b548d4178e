//! TTS Config Store - Profile 配置持久化
//!
//! 以 JSON 文件为持久化单元：启动时读取（缺失时用内置默认初始化），
//! 每次变更后立即写回。没有显式的 schema 版本字段。

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

use super::profile::{default_profile, ProfileError, TtsConfig, TtsProfile};

/// 配置持久化错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write profile config: {0}")]
    Write(String),

    #[error("Failed to serialize profile config: {0}")]
    Serialize(String),
}

/// TTS 配置存储
///
/// 配置的唯一持有者：播放引擎在每次取音频前从这里解析激活的 Profile，
/// 用户编辑通过 `update` 进入并被立即持久化。
pub struct TtsConfigStore {
    /// 持久化路径，None 表示仅内存（测试/一次性会话）
    path: Option<PathBuf>,
    config: RwLock<TtsConfig>,
}

impl TtsConfigStore {
    /// 从文件加载配置
    ///
    /// 文件缺失时写出默认配置；内容损坏时退回默认配置但不覆盖原文件。
    /// 加载后 profiles 不为空（空列表会被恢复为内置默认 Profile）。
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let config = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<TtsConfig>(&raw) {
                Ok(mut config) => {
                    if config.profiles.is_empty() {
                        tracing::warn!(
                            path = %path.display(),
                            "Profile list empty, restoring built-in default"
                        );
                        let fallback = default_profile();
                        config.active_profile_id = fallback.id.clone();
                        config.profiles.push(fallback);
                    }
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Profile config unreadable, falling back to defaults"
                    );
                    TtsConfig::default()
                }
            },
            Err(_) => {
                let config = TtsConfig::default();
                if let Err(e) = persist_to(&path, &config) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to write initial profile config"
                    );
                }
                config
            }
        };

        tracing::info!(
            path = %path.display(),
            profiles = config.profiles.len(),
            active = %config.active_profile_id,
            "TTS profile config loaded"
        );

        Self {
            path: Some(path),
            config: RwLock::new(config),
        }
    }

    /// 仅内存的存储（不持久化）
    pub fn in_memory(config: TtsConfig) -> Self {
        Self {
            path: None,
            config: RwLock::new(config),
        }
    }

    /// 当前配置的副本
    pub fn snapshot(&self) -> TtsConfig {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// 解析当前激活的 Profile
    pub fn active_profile(&self) -> Result<TtsProfile, ProfileError> {
        let config = self.config.read().expect("config lock poisoned");
        config.active_profile().cloned()
    }

    /// 修改配置并立即持久化
    pub fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut TtsConfig),
    {
        let snapshot = {
            let mut config = self.config.write().expect("config lock poisoned");
            mutate(&mut config);
            config.clone()
        };
        self.persist(&snapshot)
    }

    /// 恢复为内置默认配置（单个默认 Profile）
    pub fn reset_to_defaults(&self) -> Result<(), StoreError> {
        tracing::info!("Resetting TTS profile config to defaults");
        self.update(|config| *config = TtsConfig::default())
    }

    fn persist(&self, config: &TtsConfig) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => persist_to(path, config),
            None => Ok(()),
        }
    }
}

fn persist_to(path: &Path, config: &TtsConfig) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
        }
    }

    let json =
        serde_json::to_string_pretty(config).map_err(|e| StoreError::Serialize(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| StoreError::Write(e.to_string()))?;

    tracing::debug!(path = %path.display(), "TTS profile config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::{DEFAULT_PROFILE_ID, HttpMethod};
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tts-profiles.json");

        let store = TtsConfigStore::load(&path);
        assert!(path.exists());
        assert_eq!(store.snapshot(), TtsConfig::default());
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tts-profiles.json");

        let store = TtsConfigStore::load(&path);
        store
            .update(|config| {
                config.enabled = true;
                config.profiles.push(TtsProfile {
                    id: "edge".to_string(),
                    name: "Edge TTS".to_string(),
                    method: HttpMethod::Get,
                    url: "http://localhost:5500/api/tts".to_string(),
                    headers: Default::default(),
                    params: Default::default(),
                    body_template: None,
                    timeout_ms: None,
                    response_type: None,
                });
                config.active_profile_id = "edge".to_string();
            })
            .unwrap();

        let reloaded = TtsConfigStore::load(&path);
        let config = reloaded.snapshot();
        assert!(config.enabled);
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(reloaded.active_profile().unwrap().id, "edge");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tts-profiles.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = TtsConfigStore::load(&path);
        assert_eq!(store.snapshot(), TtsConfig::default());
        // 损坏的原文件不被覆盖
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_empty_profile_list_restored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tts-profiles.json");
        std::fs::write(
            &path,
            r#"{"enabled":true,"activeProfileId":"x","profiles":[]}"#,
        )
        .unwrap();

        let store = TtsConfigStore::load(&path);
        let config = store.snapshot();
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.active_profile_id, DEFAULT_PROFILE_ID);
    }

    #[test]
    fn test_reset_to_defaults() {
        let store = TtsConfigStore::in_memory(TtsConfig {
            enabled: true,
            active_profile_id: "other".to_string(),
            profiles: vec![default_profile()],
        });

        store.reset_to_defaults().unwrap();
        assert_eq!(store.snapshot(), TtsConfig::default());
    }
}
