//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod audio;
pub mod proxy;

pub use audio::{NullDevice, NullDeviceProbe, RodioDevice};
pub use proxy::{ReqwestProxy, ReqwestProxyConfig};
