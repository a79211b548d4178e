//! Playback Queue State - 播放队列状态
//!
//! 持有片段队列、当前位置、索引到音频资源的缓存以及播放状态标志。
//! 队列整体替换、从不原地修改；缓存清空随 stop/set_queue 强制发生。

use crate::application::resource::AudioCache;

/// 对外可观察的播放状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_index: usize,
    pub queue_len: usize,
}

/// 播放队列状态
///
/// 由播放引擎独占持有，其他组件只通过状态快照观察。
#[derive(Debug, Default)]
pub struct PlaybackState {
    pub(crate) queue: Vec<String>,
    pub(crate) current_index: usize,
    pub(crate) cache: AudioCache,
    pub(crate) is_playing: bool,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前片段文本；索引越过队列末尾时为 None
    pub fn current_text(&self) -> Option<&str> {
        self.queue.get(self.current_index).map(String::as_str)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 整体替换队列：位置归零、缓存清空，不启动播放
    pub fn set_queue(&mut self, chunks: Vec<String>) {
        tracing::debug!(chunks = chunks.len(), "Playback queue replaced");
        self.queue = chunks;
        self.current_index = 0;
        self.cache.clear();
    }

    /// 前进到下一片段；没有后继时返回 false（队列耗尽）
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.queue.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// 完整停止：位置归零、错误清除、缓存释放
    pub fn stop_reset(&mut self) {
        self.is_playing = false;
        self.is_loading = false;
        self.current_index = 0;
        self.error = None;
        self.cache.clear();
    }

    /// 记录错误并退出播放/加载状态
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(error = %message, "Playback error");
        self.error = Some(message);
        self.is_playing = false;
        self.is_loading = false;
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            error: self.error.clone(),
            current_index: self.current_index,
            queue_len: self.queue.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resource::AudioResource;
    use std::sync::{Arc, Weak};

    fn chunk_resource() -> Arc<AudioResource> {
        Arc::new(AudioResource::new(vec![0u8; 4], "audio/mpeg"))
    }

    #[test]
    fn test_set_queue_resets_index_and_clears_cache() {
        let mut state = PlaybackState::new();
        state.set_queue(vec!["一。".to_string(), "二。".to_string()]);
        state.current_index = 1;
        state.cache.insert(0, chunk_resource());
        state.cache.insert(1, chunk_resource());

        state.set_queue(vec!["三。".to_string()]);

        assert_eq!(state.current_index, 0);
        assert_eq!(state.cache.len(), 0);
        assert_eq!(state.queue_len(), 1);
        // 替换队列不启动播放
        assert!(!state.is_playing);
    }

    #[test]
    fn test_stop_reset_releases_cached_handles() {
        let mut state = PlaybackState::new();
        state.set_queue(vec!["一。".to_string(), "二。".to_string()]);
        state.is_playing = true;
        state.error = Some("old".to_string());

        let resource = chunk_resource();
        let weak: Weak<AudioResource> = Arc::downgrade(&resource);
        state.cache.insert(0, resource);

        state.stop_reset();

        assert!(!state.is_playing);
        assert_eq!(state.current_index, 0);
        assert!(state.error.is_none());
        assert_eq!(state.cache.len(), 0);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_advance_within_queue() {
        let mut state = PlaybackState::new();
        state.set_queue(vec!["一。".to_string(), "二。".to_string()]);

        assert!(state.advance());
        assert_eq!(state.current_index, 1);
        assert_eq!(state.current_text(), Some("二。"));
    }

    #[test]
    fn test_advance_at_end_reports_exhaustion() {
        let mut state = PlaybackState::new();
        state.set_queue(vec!["唯一。".to_string()]);

        assert!(!state.advance());
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_advance_on_empty_queue() {
        let mut state = PlaybackState::new();
        assert!(!state.advance());
        assert!(state.current_text().is_none());
    }

    #[test]
    fn test_set_error_forces_flags_down() {
        let mut state = PlaybackState::new();
        state.is_playing = true;
        state.is_loading = true;

        state.set_error("boom");

        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.is_playing);
        assert!(!state.is_loading);
    }
}
