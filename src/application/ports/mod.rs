//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_device;
mod host_proxy;

pub use audio_device::{AudioDevicePort, DeviceError, DeviceEvent};
pub use host_proxy::{HostProxyPort, ProxyError, ProxyRequest};
