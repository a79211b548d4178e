//! Playback Engine - 播放引擎
//!
//! 队列驱动的取音频/播放循环。命令经通道进入，设备通知与在途
//! 请求的完成被并入同一消息流，因此所有状态变更都在引擎自己的
//! 任务里顺序执行；并发只来自独立调度的网络请求。
//!
//! 顺序保证：
//! - 同一时刻至多一个 primary fetch 在途，新请求通过取消信号替代旧请求，
//!   被替代请求的最终结果一律忽略
//! - prefetch 不被 primary 取消，按目标索引独立进行，结果只在队列
//!   纪元未变时落入缓存
//! - 取消不是错误；除 prefetch 外的失败都落入 error 状态字段，
//!   从不作为未捕获错误逃出循环

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::fetch::{AudioFetchClient, FetchError};
use crate::application::ports::{AudioDevicePort, DeviceEvent, HostProxyPort};
use crate::application::queue::{PlaybackState, PlaybackStatus};
use crate::application::resource::AudioResource;
use crate::config::TtsConfigStore;
use crate::domain::TemplateValues;

/// 播放命令
#[derive(Debug)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Stop,
    SetQueue(Vec<String>),
    Next,
    Shutdown,
}

/// 引擎消息流：命令、设备通知、在途请求的完成
enum EngineMsg {
    Command(PlaybackCommand),
    Device(DeviceEvent),
    PrimaryDone {
        seq: u64,
        index: usize,
        result: Result<AudioResource, FetchError>,
    },
    PrefetchDone {
        epoch: u64,
        index: usize,
        result: Result<AudioResource, FetchError>,
    },
}

/// 在途的 primary fetch
struct PrimaryFetch {
    seq: u64,
    index: usize,
    token: CancellationToken,
}

/// 播放引擎句柄
///
/// 可克隆；最后一个句柄释放时引擎自动关停。
#[derive(Clone)]
pub struct PlaybackHandle {
    inner: Arc<HandleInner>,
    status_rx: watch::Receiver<PlaybackStatus>,
}

struct HandleInner {
    tx: mpsc::UnboundedSender<EngineMsg>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        let _ = self.tx.send(EngineMsg::Command(PlaybackCommand::Shutdown));
    }
}

impl PlaybackHandle {
    pub fn play(&self) {
        self.send(PlaybackCommand::Play);
    }

    pub fn pause(&self) {
        self.send(PlaybackCommand::Pause);
    }

    pub fn stop(&self) {
        self.send(PlaybackCommand::Stop);
    }

    /// 整体替换播放队列（不启动播放）
    pub fn set_queue(&self, chunks: Vec<String>) {
        self.send(PlaybackCommand::SetQueue(chunks));
    }

    /// 跳到下一片段
    pub fn next(&self) {
        self.send(PlaybackCommand::Next);
    }

    pub fn shutdown(&self) {
        self.send(PlaybackCommand::Shutdown);
    }

    /// 当前状态快照
    pub fn status(&self) -> PlaybackStatus {
        self.status_rx.borrow().clone()
    }

    /// 订阅状态变更通知
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status_rx.clone()
    }

    fn send(&self, command: PlaybackCommand) {
        if self.inner.tx.send(EngineMsg::Command(command)).is_err() {
            tracing::warn!("Playback engine already stopped, command dropped");
        }
    }
}

/// 播放引擎
///
/// 每个朗读会话创建一个，`run` 消费引擎直到关停。
pub struct PlaybackEngine {
    session_id: Uuid,
    state: PlaybackState,
    profiles: Arc<TtsConfigStore>,
    fetcher: AudioFetchClient,
    device: Box<dyn AudioDevicePort>,
    device_events: Option<mpsc::UnboundedReceiver<DeviceEvent>>,
    msg_tx: mpsc::UnboundedSender<EngineMsg>,
    msg_rx: mpsc::UnboundedReceiver<EngineMsg>,
    status_tx: watch::Sender<PlaybackStatus>,
    primary: Option<PrimaryFetch>,
    next_seq: u64,
    /// 队列纪元：stop/set_queue 时递增，滞后到达的 prefetch 结果据此丢弃
    epoch: u64,
}

impl PlaybackEngine {
    pub fn new(
        profiles: Arc<TtsConfigStore>,
        proxy: Arc<dyn HostProxyPort>,
        device: Box<dyn AudioDevicePort>,
        device_events: mpsc::UnboundedReceiver<DeviceEvent>,
    ) -> (Self, PlaybackHandle) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PlaybackStatus::default());

        let handle = PlaybackHandle {
            inner: Arc::new(HandleInner { tx: msg_tx.clone() }),
            status_rx,
        };

        let engine = Self {
            session_id: Uuid::new_v4(),
            state: PlaybackState::new(),
            profiles,
            fetcher: AudioFetchClient::new(proxy),
            device,
            device_events: Some(device_events),
            msg_tx,
            msg_rx,
            status_tx,
            primary: None,
            next_seq: 0,
            epoch: 0,
        };

        (engine, handle)
    }

    /// 运行引擎直到收到 Shutdown
    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Playback engine started");

        // 设备通知并入消息流，与命令在同一任务内交错执行
        if let Some(mut events) = self.device_events.take() {
            let tx = self.msg_tx.clone();
            tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    if tx.send(EngineMsg::Device(event)).is_err() {
                        break;
                    }
                }
            });
        }

        while let Some(msg) = self.msg_rx.recv().await {
            match msg {
                EngineMsg::Command(PlaybackCommand::Shutdown) => break,
                other => self.handle_msg(other),
            }
        }

        self.stop();
        tracing::info!(session_id = %self.session_id, "Playback engine stopped");
    }

    fn handle_msg(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::Command(PlaybackCommand::Play) => self.play(),
            EngineMsg::Command(PlaybackCommand::Pause) => self.pause(),
            EngineMsg::Command(PlaybackCommand::Stop) => self.stop(),
            EngineMsg::Command(PlaybackCommand::SetQueue(chunks)) => self.set_queue(chunks),
            EngineMsg::Command(PlaybackCommand::Next) => self.next_chunk(),
            EngineMsg::Command(PlaybackCommand::Shutdown) => unreachable!("handled in run"),
            EngineMsg::Device(DeviceEvent::Ended) => self.next_chunk(),
            EngineMsg::Device(DeviceEvent::Error(message)) => {
                tracing::warn!(session_id = %self.session_id, error = %message, "Device error");
                self.fail(message);
            }
            EngineMsg::PrimaryDone { seq, index, result } => {
                self.on_primary_done(seq, index, result)
            }
            EngineMsg::PrefetchDone {
                epoch,
                index,
                result,
            } => self.on_prefetch_done(epoch, index, result),
        }
    }

    /// 开始或恢复播放
    fn play(&mut self) {
        self.state.is_playing = true;
        self.state.error = None;

        if self.device.is_paused() && self.device.has_source() {
            // 设备暂停中且资源仍在：原地恢复，不重新获取
            tracing::debug!(session_id = %self.session_id, "Resuming paused playback");
            if let Err(e) = self.device.play() {
                self.fail(e.to_string());
                return;
            }
            self.publish();
        } else if self.device.has_source() {
            // 已在播放，不重复启动
            self.publish();
        } else {
            self.play_current_chunk();
        }
    }

    /// 原地暂停，保留设备中的资源
    fn pause(&mut self) {
        self.state.is_playing = false;
        self.device.pause();
        self.publish();
    }

    /// 无条件拆除：位置归零、缓存释放、在途请求作废、设备卸载
    fn stop(&mut self) {
        if let Some(prev) = self.primary.take() {
            prev.token.cancel();
        }
        self.epoch += 1;
        self.state.stop_reset();
        self.device.clear();
        self.publish();
    }

    fn set_queue(&mut self, chunks: Vec<String>) {
        if let Some(prev) = self.primary.take() {
            prev.token.cancel();
        }
        self.epoch += 1;
        self.state.set_queue(chunks);
        self.publish();
    }

    /// 前进一个片段；队列耗尽时完整停止（不是暂停）
    fn next_chunk(&mut self) {
        if self.state.advance() {
            self.publish();
            if self.state.is_playing {
                self.play_current_chunk();
            }
        } else {
            self.stop();
        }
    }

    /// 播放当前片段：缓存命中直接用，未命中发起 primary fetch
    fn play_current_chunk(&mut self) {
        let index = self.state.current_index;
        let Some(text) = self.state.current_text().map(str::to_string) else {
            // 索引越过队列末尾
            self.stop();
            return;
        };

        self.state.is_loading = true;
        self.state.error = None;

        if let Some(resource) = self.state.cache.get(index) {
            tracing::debug!(session_id = %self.session_id, index = index, "Audio cache hit");
            self.start_resource(resource);
            return;
        }

        // 激活 Profile 必须可解析，否则以配置错误快速失败
        let profile = match self.profiles.active_profile() {
            Ok(profile) => profile,
            Err(e) => {
                self.fail(e.to_string());
                return;
            }
        };

        // 新请求替代旧的在途 primary fetch
        if let Some(prev) = self.primary.take() {
            tracing::debug!(
                session_id = %self.session_id,
                superseded_index = prev.index,
                "Cancelling superseded fetch"
            );
            prev.token.cancel();
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let token = CancellationToken::new();
        self.primary = Some(PrimaryFetch {
            seq,
            index,
            token: token.clone(),
        });
        self.publish();

        tracing::debug!(
            session_id = %self.session_id,
            index = index,
            chars = text.chars().count(),
            "Fetching current chunk"
        );

        let fetcher = self.fetcher.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let values = chunk_values(&text);
            let result = tokio::select! {
                _ = token.cancelled() => Err(FetchError::Cancelled),
                result = fetcher.fetch(&profile, &values) => result,
            };
            let _ = tx.send(EngineMsg::PrimaryDone { seq, index, result });
        });
    }

    fn on_primary_done(
        &mut self,
        seq: u64,
        index: usize,
        result: Result<AudioResource, FetchError>,
    ) {
        match &self.primary {
            Some(primary) if primary.seq == seq => {}
            // 已被替代或已停止的请求，结果整体作废
            _ => {
                tracing::debug!(
                    session_id = %self.session_id,
                    index = index,
                    "Stale fetch settled, ignoring"
                );
                return;
            }
        }
        self.primary = None;

        match result {
            // 取消不是错误，静默吸收
            Err(FetchError::Cancelled) => {}
            Err(e) => self.fail(e.to_string()),
            Ok(resource) => {
                let resource = Arc::new(resource);
                self.state.cache.insert(index, resource.clone());
                self.start_resource(resource);
            }
        }
    }

    /// 把资源交给设备并启动；获取期间若已退出播放则静默放弃
    fn start_resource(&mut self, resource: Arc<AudioResource>) {
        if !self.state.is_playing {
            self.state.is_loading = false;
            self.publish();
            return;
        }

        if let Err(e) = self.device.assign(resource) {
            self.fail(e.to_string());
            return;
        }
        if let Err(e) = self.device.play() {
            self.fail(e.to_string());
            return;
        }

        self.state.is_loading = false;
        self.publish();

        // 预取下一片段，不等待、不影响本片段的播放
        self.spawn_prefetch(self.state.current_index + 1);
    }

    /// 预取指定索引的音频；越界或已缓存时为空操作
    fn spawn_prefetch(&mut self, index: usize) {
        if index >= self.state.queue_len() || self.state.cache.contains(index) {
            return;
        }
        let Some(text) = self.state.queue.get(index).cloned() else {
            return;
        };

        let profile = match self.profiles.active_profile() {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!(error = %e, "Prefetch skipped: no active profile");
                return;
            }
        };

        tracing::debug!(session_id = %self.session_id, index = index, "Prefetching chunk");

        let epoch = self.epoch;
        let fetcher = self.fetcher.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&profile, &chunk_values(&text)).await;
            let _ = tx.send(EngineMsg::PrefetchDone {
                epoch,
                index,
                result,
            });
        });
    }

    fn on_prefetch_done(
        &mut self,
        epoch: u64,
        index: usize,
        result: Result<AudioResource, FetchError>,
    ) {
        // 队列在预取期间被替换/停止，结果作废
        if epoch != self.epoch {
            tracing::debug!(index = index, "Prefetch result from stale queue, discarding");
            return;
        }

        match result {
            Ok(resource) => {
                if index < self.state.queue_len() && !self.state.cache.contains(index) {
                    self.state.cache.insert(index, Arc::new(resource));
                }
            }
            // 预取失败只记录，绝不打断当前播放
            Err(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    index = index,
                    error = %e,
                    "Prefetch failed"
                );
            }
        }
    }

    /// 进入错误态：错误写入状态字段，设备卸载。之后显式 play()
    /// 会从当前片段（而非队首）重新驱动取数
    fn fail(&mut self, message: String) {
        self.state.set_error(message);
        self.device.clear();
        self.publish();
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.state.status());
    }
}

fn chunk_values(text: &str) -> TemplateValues {
    let mut values = TemplateValues::new();
    values.insert("text".to_string(), text.to_string());
    values
}
