//! 应用层 - 播放管线编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（HostProxy、AudioDevice）
//! - request/fetch: 请求构造与经代理的音频获取
//! - resource/queue: 音频资源缓存与播放队列状态
//! - engine: 播放引擎（命令进、状态通知出）

pub mod engine;
pub mod fetch;
pub mod ports;
pub mod queue;
pub mod request;
pub mod resource;

pub use engine::{PlaybackCommand, PlaybackEngine, PlaybackHandle};
pub use fetch::{AudioFetchClient, FetchError};
pub use ports::{
    AudioDevicePort, DeviceError, DeviceEvent, HostProxyPort, ProxyError, ProxyRequest,
};
pub use queue::{PlaybackState, PlaybackStatus};
pub use request::{build_request, RequestError, ResolvedRequest};
pub use resource::{AudioCache, AudioResource};
