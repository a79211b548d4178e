//! Audio Device Port - 音频输出设备抽象
//!
//! 播放引擎只依赖这组操作：装载资源、播放、暂停、状态查询，
//! 以及通过事件通道送回的两种异步通知（播放结束 / 播放出错）。

use std::sync::Arc;
use thiserror::Error;

use crate::application::resource::AudioResource;

/// 设备错误
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Audio output error: {0}")]
    Output(String),

    #[error("Audio decode error: {0}")]
    Decode(String),
}

/// 设备异步通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// 当前资源播放结束
    Ended,
    /// 播放故障
    Error(String),
}

/// Audio Device Port
///
/// 音频输出设备。实现方在构造时拿到事件发送端，
/// 播放结束/出错通过该通道送回引擎。
pub trait AudioDevicePort: Send {
    /// 装载一个音频资源（替换之前装载的资源）
    fn assign(&mut self, resource: Arc<AudioResource>) -> Result<(), DeviceError>;

    /// 开始/恢复播放
    fn play(&mut self) -> Result<(), DeviceError>;

    /// 原地暂停，保留当前资源
    fn pause(&mut self);

    /// 卸载当前资源并停止输出
    fn clear(&mut self);

    /// 是否处于暂停（未装载资源时视为暂停）
    fn is_paused(&self) -> bool;

    /// 是否仍持有已装载的资源
    fn has_source(&self) -> bool;
}
