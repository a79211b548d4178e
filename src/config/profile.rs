//! TTS Provider Profile - TTS 后端配置
//!
//! 用户可编辑的 TTS 服务描述：端点、请求方法、头、模板。
//! 序列化格式与持久化的 JSON 配置保持一致（camelCase 字段名）。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 内置默认 Profile 的 id
pub const DEFAULT_PROFILE_ID: &str = "gpt-sovits-local";

/// 音频响应的默认 MIME 类型
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Profile 解析错误
#[derive(Debug, Error)]
pub enum ProfileError {
    /// activeProfileId 在 profiles 中不存在
    #[error("No active TTS profile: {0}")]
    NoActiveProfile(String),
}

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// TTS 后端 Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsProfile {
    /// 稳定唯一标识
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 请求方法
    pub method: HttpMethod,
    /// 端点 URL
    pub url: String,
    /// 请求头（字面值）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// GET 查询参数模板（key -> 模板串），仅 GET 使用
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// POST 请求体模板（通常为 JSON），仅 POST 使用
    #[serde(
        rename = "bodyTemplate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub body_template: Option<String>,
    /// 请求超时（毫秒），原样转发给代理
    #[serde(rename = "timeout", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// 返回音频的 MIME 类型，缺省为 audio/mpeg
    #[serde(
        rename = "responseType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_type: Option<String>,
}

/// TTS 配置（持久化单元）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    pub enabled: bool,
    #[serde(rename = "activeProfileId")]
    pub active_profile_id: String,
    pub profiles: Vec<TtsProfile>,
}

impl TtsConfig {
    /// 解析当前激活的 Profile
    ///
    /// activeProfileId 指向的 Profile 必须存在，否则播放以配置错误快速失败。
    pub fn active_profile(&self) -> Result<&TtsProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.id == self.active_profile_id)
            .ok_or_else(|| ProfileError::NoActiveProfile(self.active_profile_id.clone()))
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        let profile = default_profile();
        Self {
            enabled: false,
            active_profile_id: profile.id.clone(),
            profiles: vec![profile],
        }
    }
}

/// 内置默认 Profile：本机 GPT-SoVITS 服务
pub fn default_profile() -> TtsProfile {
    TtsProfile {
        id: DEFAULT_PROFILE_ID.to_string(),
        name: "GPT-SoVITS (Local)".to_string(),
        method: HttpMethod::Post,
        url: "http://127.0.0.1:9880/tts".to_string(),
        headers: BTreeMap::new(),
        params: BTreeMap::new(),
        body_template: Some(
            concat!(
                r#"{"text":"{{text}}","text_lang":"zh","ref_audio_path":"vocals.wav","#,
                r#""prompt_text":"","prompt_lang":"zh","text_split_method":"cut0","#,
                r#""seed":"0","media_type":"aac","streaming_mode":"true"}"#
            )
            .to_string(),
        ),
        timeout_ms: None,
        response_type: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = default_profile();
        assert_eq!(profile.id, DEFAULT_PROFILE_ID);
        assert_eq!(profile.name, "GPT-SoVITS (Local)");
        assert_eq!(profile.method, HttpMethod::Post);
        assert!(profile.url.contains("127.0.0.1"));
        assert!(profile.body_template.is_some());
    }

    #[test]
    fn test_default_body_template_is_valid_json_template() {
        let profile = default_profile();
        let template = profile.body_template.unwrap();
        // 占位符替换后应当是合法 JSON
        let mut values = crate::domain::TemplateValues::new();
        values.insert("text".to_string(), "测试".to_string());
        let body = crate::domain::render(&template, &values);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["text"], "测试");
        assert_eq!(parsed["text_lang"], "zh");
        assert_eq!(parsed["media_type"], "aac");
    }

    #[test]
    fn test_default_config_has_single_profile() {
        let config = TtsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.active_profile_id, DEFAULT_PROFILE_ID);
        assert!(config.active_profile().is_ok());
    }

    #[test]
    fn test_active_profile_unknown_id() {
        let mut config = TtsConfig::default();
        config.active_profile_id = "missing".to_string();
        let err = config.active_profile().unwrap_err();
        assert!(err.to_string().contains("No active TTS profile"));
    }

    #[test]
    fn test_serde_camel_case_fields() {
        let mut profile = default_profile();
        profile.timeout_ms = Some(5000);
        profile.response_type = Some("audio/aac".to_string());

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"bodyTemplate\""));
        assert!(json.contains("\"timeout\":5000"));
        assert!(json.contains("\"responseType\":\"audio/aac\""));
        assert!(json.contains("\"method\":\"POST\""));

        let back: TtsProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_deserialize_minimal_get_profile() {
        // headers/params/bodyTemplate 均可缺省
        let json = r#"{
            "id": "edge",
            "name": "Edge TTS",
            "method": "GET",
            "url": "http://localhost:5500/api/tts"
        }"#;
        let profile: TtsProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.method, HttpMethod::Get);
        assert!(profile.headers.is_empty());
        assert!(profile.params.is_empty());
        assert!(profile.body_template.is_none());
        assert!(profile.response_type.is_none());
    }
}
