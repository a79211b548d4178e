//! Rodio Device - 基于 rodio 的音频输出实现
//!
//! 每次装载资源新建一个 Sink 并解码字节缓冲；后台 watcher 等待
//! 播放结束后把 Ended 通知送回引擎。被替换/卸载的 Sink 标记为
//! detached，其 watcher 不再发通知。

use rodio::{Decoder, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::ports::{AudioDevicePort, DeviceError, DeviceEvent};
use crate::application::resource::AudioResource;

/// Rodio 音频设备
///
/// `OutputStream` 不是 Send，由调用方在主线程持有；这里只保留
/// 可跨线程的 `OutputStreamHandle`。
pub struct RodioDevice {
    handle: OutputStreamHandle,
    events: mpsc::UnboundedSender<DeviceEvent>,
    sink: Option<Arc<Sink>>,
    detached: Option<Arc<AtomicBool>>,
}

impl RodioDevice {
    pub fn new(handle: OutputStreamHandle, events: mpsc::UnboundedSender<DeviceEvent>) -> Self {
        Self {
            handle,
            events,
            sink: None,
            detached: None,
        }
    }

    /// 卸载当前 Sink，其 watcher 不再发 Ended
    fn detach_current(&mut self) {
        if let Some(flag) = self.detached.take() {
            flag.store(true, Ordering::SeqCst);
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl AudioDevicePort for RodioDevice {
    fn assign(&mut self, resource: Arc<AudioResource>) -> Result<(), DeviceError> {
        self.detach_current();

        let source = Decoder::new(Cursor::new(resource.bytes().to_vec()))
            .map_err(|e| DeviceError::Decode(format!("{} ({})", e, resource.mime())))?;

        let sink = Sink::try_new(&self.handle).map_err(|e| DeviceError::Output(e.to_string()))?;
        sink.pause();
        sink.append(source);

        let sink = Arc::new(sink);
        let detached = Arc::new(AtomicBool::new(false));

        tracing::debug!(
            audio_size = resource.len(),
            mime = resource.mime(),
            "Audio resource assigned to device"
        );

        // 播放结束 watcher
        let events = self.events.clone();
        let watch_sink = sink.clone();
        let watch_flag = detached.clone();
        tokio::task::spawn_blocking(move || {
            watch_sink.sleep_until_end();
            if !watch_flag.load(Ordering::SeqCst) {
                let _ = events.send(DeviceEvent::Ended);
            }
        });

        self.sink = Some(sink);
        self.detached = Some(detached);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(DeviceError::Output("no source assigned".to_string())),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn clear(&mut self) {
        self.detach_current();
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().map(|s| s.is_paused()).unwrap_or(true)
    }

    fn has_source(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
