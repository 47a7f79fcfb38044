//! 请求与响应类型
//!
//! 字段名与线上协议一致；`status` 和 `edit` 可能以数字或字符串形式出现。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::translation::config::TranslationConfig;
use crate::translation::language::LanguageShare;
use crate::translation::provider::is_valid_region;
use crate::translation::storage::CacheKey;

/// 翻译请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslateRequest {
    pub content: String,
    pub to: String,
    pub tld: Option<String>,
    #[serde(deserialize_with = "bool_or_string")]
    pub batch: Option<bool>,
    /// 文档 ID
    #[serde(deserialize_with = "string_or_number")]
    pub status: Option<String>,
    /// 文档最后编辑时间
    #[serde(deserialize_with = "string_or_number")]
    pub edit: Option<String>,
    /// 请求方的界面语言，用于语言显示名称
    pub locale: Option<String>,
}

impl TranslateRequest {
    pub fn new(content: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = Some(batch);
        self
    }

    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = Some(tld.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_document(mut self, status: impl Into<String>, edit: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self.edit = Some(edit.into());
        self
    }

    /// 目标语言，去掉首尾空白
    pub fn target(&self) -> &str {
        self.to.trim()
    }

    /// 请求未指定时使用配置中的服务区域
    pub fn region<'a>(&'a self, config: &'a TranslationConfig) -> &'a str {
        self.tld
            .as_deref()
            .map(str::trim)
            .filter(|tld| !tld.is_empty())
            .unwrap_or(&config.provider_region)
    }

    pub fn batch_enabled(&self, config: &TranslationConfig) -> bool {
        self.batch.unwrap_or(config.batch)
    }

    /// 显示语言名称使用的界面语言，未指定时与目标语言相同
    pub fn display_locale(&self) -> &str {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
            .unwrap_or_else(|| self.target())
    }

    /// 只有带文档 ID 和编辑时间的请求才能缓存
    ///
    /// 显示语言与目标语言不同时，语言名称随界面语言变化，键中附带界面语言。
    pub fn cache_key(&self, config: &TranslationConfig) -> Option<CacheKey> {
        let status = self.status.as_deref().filter(|s| !s.is_empty())?;
        let edit = self.edit.as_deref().filter(|s| !s.is_empty())?;
        let region = self.region(config);
        if !is_valid_region(region) {
            return None;
        }

        let key = CacheKey::new(
            status,
            edit,
            self.target(),
            region,
            self.batch_enabled(config),
        );

        let locale = self.display_locale();
        if locale == self.target() {
            Some(key)
        } else {
            Some(key.with_locale(locale))
        }
    }
}

/// 翻译响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub text: String,
    pub from: Vec<LanguageShare>,
    pub to: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid batch value: {}", s))),
        },
        Some(Value::Number(n)) => Ok(Some(n.as_i64() != Some(0))),
        Some(other) => Err(D::Error::custom(format!("invalid batch value: {}", other))),
    }
}
