//! Host Proxy Port - 可信宿主代理抽象
//!
//! 核心唯一可用的字节通路：代理 HTTP 请求与二进制文件读取。
//! 播放管线不直接访问网络，具体实现在 infrastructure 层。

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::config::HttpMethod;

/// 代理调用错误
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 代理 HTTP 请求
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// 完整 URL
    pub url: String,
    /// 请求方法
    pub method: HttpMethod,
    /// 请求头
    pub headers: BTreeMap<String, String>,
    /// 请求体（POST 可选）
    pub body: Option<String>,
    /// 超时（毫秒），不设置时由代理自行决定
    pub timeout_ms: Option<u64>,
}

/// Host Proxy Port
///
/// 宿主进程提供的网络/文件字节通路
#[async_trait]
pub trait HostProxyPort: Send + Sync {
    /// 代理执行 HTTP 请求，返回原始响应字节
    async fn fetch(&self, request: ProxyRequest) -> Result<Vec<u8>, ProxyError>;

    /// 读取本地二进制文件
    async fn read_binary(&self, path: &Path) -> Result<Vec<u8>, ProxyError>;
}
