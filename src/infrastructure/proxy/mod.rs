//! Proxy Adapters - 宿主字节通路实现

mod reqwest_proxy;

pub use reqwest_proxy::{ReqwestProxy, ReqwestProxyConfig};
