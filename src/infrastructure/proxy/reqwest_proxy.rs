//! Reqwest Proxy - 宿主侧 HTTP 代理实现
//!
//! 实现 HostProxyPort trait，替播放核心执行对 TTS 后端的 HTTP 请求。
//! 播放目标通常是本机的、不认识 CORS 的服务，所以网络访问集中在
//! 这一个适配器里。

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{HostProxyPort, ProxyError, ProxyRequest};
use crate::config::HttpMethod;

/// Reqwest 代理配置
#[derive(Debug, Clone)]
pub struct ReqwestProxyConfig {
    /// 未按请求指定超时时的兜底超时（秒）
    pub default_timeout_secs: u64,
}

impl Default for ReqwestProxyConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 120,
        }
    }
}

/// Reqwest 代理
pub struct ReqwestProxy {
    client: Client,
}

impl ReqwestProxy {
    /// 创建新的代理实例
    pub fn new(config: ReqwestProxyConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.default_timeout_secs))
            .build()
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// 使用默认配置创建
    pub fn with_default_config() -> Result<Self, ProxyError> {
        Self::new(ReqwestProxyConfig::default())
    }
}

#[async_trait]
impl HostProxyPort for ReqwestProxy {
    async fn fetch(&self, request: ProxyRequest) -> Result<Vec<u8>, ProxyError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        tracing::debug!(
            url = %request.url,
            method = %method,
            timeout_ms = ?request.timeout_ms,
            "Proxying TTS request"
        );

        let mut builder = self.client.request(method, request.url.as_str());

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        if let Some(ms) = request.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout
            } else if e.is_connect() {
                ProxyError::Network(format!("Cannot connect to TTS service: {}", e))
            } else {
                ProxyError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProxyError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        tracing::debug!(audio_size = bytes.len(), "TTS request completed");

        Ok(bytes.to_vec())
    }

    async fn read_binary(&self, path: &Path) -> Result<Vec<u8>, ProxyError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| ProxyError::Io(format!("{}: {}", path.display(), e)))
    }
}
