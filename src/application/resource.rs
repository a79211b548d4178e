//! Audio Resource - 音频资源与所有权缓存
//!
//! 资源句柄由宿主侧字节缓冲支撑，属稀缺资源：放入缓存的句柄
//! 在缓存清空时被释放（引用计数归零即回收字节缓冲），不会二次
//! 释放也不会泄漏。缓存在设置新队列或停止播放时必须清空，
//! 这是正确性不变式，不是优化。

use std::collections::HashMap;
use std::sync::Arc;

/// 可播放的音频资源
///
/// 一段已获取的音频字节加上其 MIME 类型。通过 `Arc` 共享给
/// 设备，缓存侧的最后一个引用释放时缓冲被回收。
#[derive(Debug)]
pub struct AudioResource {
    data: Vec<u8>,
    mime: String,
}

impl AudioResource {
    pub fn new(data: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            data,
            mime: mime.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 片段索引 -> 音频资源 的所有权表
#[derive(Debug, Default)]
pub struct AudioCache {
    entries: HashMap<usize, Arc<AudioResource>>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存入资源句柄（缓存按索引唯一，正常流程不会覆盖）
    pub fn insert(&mut self, index: usize, resource: Arc<AudioResource>) {
        if let Some(old) = self.entries.insert(index, resource) {
            tracing::warn!(
                index = index,
                size_bytes = old.len(),
                "Audio cache entry overwritten"
            );
        }
    }

    pub fn get(&self, index: usize) -> Option<Arc<AudioResource>> {
        self.entries.get(&index).cloned()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 释放所有缓存的资源句柄
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let released = self.entries.len();
        let released_bytes: usize = self.entries.values().map(|r| r.len()).sum();
        self.entries.clear();

        tracing::debug!(
            released = released,
            released_bytes = released_bytes,
            "Audio cache cleared"
        );
    }
}
