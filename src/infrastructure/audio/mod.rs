//! Audio Adapters - 音频输出设备实现

mod null_device;
mod rodio_device;

pub use null_device::{NullDevice, NullDeviceProbe};
pub use rodio_device::RodioDevice;
