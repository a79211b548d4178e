//! Audio Fetch Client - 经代理获取音频
//!
//! 构造请求、经宿主代理执行、把响应字节包装为带 MIME 类型的
//! 音频资源。代理报告的失败原样携带细节向上抛出。

use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{HostProxyPort, ProxyError, ProxyRequest};
use crate::application::request::{build_request, RequestError};
use crate::application::resource::AudioResource;
use crate::config::{TtsProfile, DEFAULT_AUDIO_MIME};
use crate::domain::TemplateValues;

/// 音频获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("TTS proxy request failed: {0}")]
    Proxy(#[from] ProxyError),

    /// 请求被取消（非错误，调用方静默吸收）
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// 是否为取消信号
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Audio Fetch Client
#[derive(Clone)]
pub struct AudioFetchClient {
    proxy: Arc<dyn HostProxyPort>,
}

impl AudioFetchClient {
    pub fn new(proxy: Arc<dyn HostProxyPort>) -> Self {
        Self { proxy }
    }

    /// 为一段文本获取音频资源
    pub async fn fetch(
        &self,
        profile: &TtsProfile,
        values: &TemplateValues,
    ) -> Result<AudioResource, FetchError> {
        let request = build_request(profile, values)?;

        tracing::debug!(
            profile_id = %profile.id,
            url = %request.url,
            method = request.method.as_str(),
            has_body = request.body.is_some(),
            "Fetching TTS audio"
        );

        let data = self
            .proxy
            .fetch(ProxyRequest {
                url: request.url,
                method: request.method,
                headers: request.headers,
                body: request.body,
                timeout_ms: profile.timeout_ms,
            })
            .await?;

        let mime = profile
            .response_type
            .clone()
            .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());

        tracing::debug!(
            profile_id = %profile.id,
            audio_size = data.len(),
            mime = %mime,
            "TTS audio fetched"
        );

        Ok(AudioResource::new(data, mime))
    }
}
