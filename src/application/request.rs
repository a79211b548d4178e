//! Request Builder - 根据 Profile 构造完整请求
//!
//! GET 把 params 模板渲染后挂为查询参数；POST 渲染 bodyTemplate
//! 作为请求体。Profile 自身从不被修改。

use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::config::{HttpMethod, TtsProfile};
use crate::domain::{render, TemplateValues};

/// 请求构造错误
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// 完整解析后的请求
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

/// 根据 Profile 与替换值构造请求
///
/// - GET：解析 base URL，逐个追加渲染后的查询参数。URL 解析规则
///   决定尾斜杠语义（无路径的 base 归一化为根斜杠，显式路径原样保留）。
/// - POST：URL 原样使用，不追加查询串；有 bodyTemplate 时渲染为请求体，
///   且在未显式设置 Content-Type 时注入 `application/json`。
pub fn build_request(
    profile: &TtsProfile,
    values: &TemplateValues,
) -> Result<ResolvedRequest, RequestError> {
    let mut headers = profile.headers.clone();

    match profile.method {
        HttpMethod::Get => {
            let mut parsed = Url::parse(&profile.url).map_err(|source| RequestError::InvalidUrl {
                url: profile.url.clone(),
                source,
            })?;

            if !profile.params.is_empty() {
                let mut pairs = parsed.query_pairs_mut();
                for (key, template) in &profile.params {
                    pairs.append_pair(key, &render(template, values));
                }
            }

            Ok(ResolvedRequest {
                url: parsed.to_string(),
                method: HttpMethod::Get,
                headers,
                body: None,
            })
        }
        HttpMethod::Post => {
            let body = profile
                .body_template
                .as_ref()
                .map(|template| render(template, values));

            if body.is_some() && !has_content_type(&headers) {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
            }

            Ok(ResolvedRequest {
                url: profile.url.clone(),
                method: HttpMethod::Post,
                headers,
                body,
            })
        }
    }
}

/// HTTP 头名不区分大小写
fn has_content_type(headers: &BTreeMap<String, String>) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case("content-type"))
}
