//! Null Device - 用于测试与无声运行的音频设备
//!
//! 不产生任何声音，只记录装载/播放/暂停调用，供测试探针观察。
//! 播放结束等通知由测试侧通过事件通道自行注入。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{AudioDevicePort, DeviceError};
use crate::application::resource::AudioResource;

#[derive(Default)]
struct Shared {
    current: Mutex<Option<Arc<AudioResource>>>,
    paused: AtomicBool,
    assign_count: AtomicUsize,
    play_count: AtomicUsize,
    assigned_bytes: Mutex<Vec<Vec<u8>>>,
}

/// 无声音频设备
pub struct NullDevice {
    shared: Arc<Shared>,
}

/// NullDevice 的观察探针
#[derive(Clone)]
pub struct NullDeviceProbe {
    shared: Arc<Shared>,
}

impl NullDevice {
    pub fn new() -> (Self, NullDeviceProbe) {
        let shared = Arc::new(Shared {
            paused: AtomicBool::new(true),
            ..Default::default()
        });
        (
            Self {
                shared: shared.clone(),
            },
            NullDeviceProbe { shared },
        )
    }
}

impl AudioDevicePort for NullDevice {
    fn assign(&mut self, resource: Arc<AudioResource>) -> Result<(), DeviceError> {
        self.shared
            .assigned_bytes
            .lock()
            .unwrap()
            .push(resource.bytes().to_vec());
        *self.shared.current.lock().unwrap() = Some(resource);
        self.shared.paused.store(true, Ordering::SeqCst);
        self.shared.assign_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.shared.current.lock().unwrap().is_none() {
            return Err(DeviceError::Output("no source assigned".to_string()));
        }
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.play_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) {
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    fn clear(&mut self) {
        *self.shared.current.lock().unwrap() = None;
        self.shared.paused.store(true, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    fn has_source(&self) -> bool {
        self.shared.current.lock().unwrap().is_some()
    }
}

impl NullDeviceProbe {
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    pub fn has_source(&self) -> bool {
        self.shared.current.lock().unwrap().is_some()
    }

    pub fn assign_count(&self) -> usize {
        self.shared.assign_count.load(Ordering::SeqCst)
    }

    pub fn play_count(&self) -> usize {
        self.shared.play_count.load(Ordering::SeqCst)
    }

    /// 最后一次装载的资源字节
    pub fn last_assigned_bytes(&self) -> Option<Vec<u8>> {
        self.shared.assigned_bytes.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(bytes: &[u8]) -> Arc<AudioResource> {
        Arc::new(AudioResource::new(bytes.to_vec(), "audio/mpeg"))
    }

    #[test]
    fn test_play_without_source_is_error() {
        let (mut device, _probe) = NullDevice::new();
        assert!(device.play().is_err());
    }

    #[test]
    fn test_assign_play_pause_clear() {
        let (mut device, probe) = NullDevice::new();
        assert!(probe.is_paused());
        assert!(!probe.has_source());

        device.assign(resource(b"abc")).unwrap();
        assert!(device.is_paused());
        assert!(device.has_source());

        device.play().unwrap();
        assert!(!probe.is_paused());

        device.pause();
        assert!(probe.is_paused());
        assert!(probe.has_source());

        device.clear();
        assert!(!probe.has_source());
        assert_eq!(probe.assign_count(), 1);
        assert_eq!(probe.last_assigned_bytes(), Some(b"abc".to_vec()));
    }
}
