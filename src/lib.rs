//! Lector - 电子书朗读 TTS 播放管线
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - chunker: 书文按句末标点切分为朗读片段
//! - template: `{{key}}` 占位符替换
//!
//! 应用层 (application/):
//! - Ports: 端口定义（HostProxy, AudioDevice）
//! - request/fetch: Profile 驱动的请求构造与音频获取
//! - resource/queue: 音频资源缓存与播放队列状态
//! - engine: 播放引擎（primary fetch 取消替代、预取、错误恢复）
//!
//! 基础设施层 (infrastructure/):
//! - proxy: Reqwest HTTP 代理、二进制文件读取
//! - audio: Rodio 音频输出、测试用 Null 设备
//!
//! 配置 (config/):
//! - 应用配置（环境变量 > config.toml > 默认值）
//! - TTS Provider Profile 配置（JSON 文件持久化）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{PlaybackEngine, PlaybackHandle, PlaybackStatus};
pub use config::{load_config, AppConfig, TtsConfigStore};
pub use domain::split_into_chunks;
