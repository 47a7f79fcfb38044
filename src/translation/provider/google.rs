//! Google 网页翻译接口

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use super::{ProviderRequest, TranslationOutput, Translator};
use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

const TRANSLATE_PATH: &str = "/translate_a/single";

/// 通过 `translate.google.{tld}` 翻译
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    /// 显式指定的服务地址，未指定时按区域拼接
    endpoint: Option<String>,
}

impl GoogleTranslator {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
        })
    }

    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Self::new(config.provider_endpoint.clone(), config.request_timeout())
    }

    fn url_for(&self, region: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}{}", endpoint, TRANSLATE_PATH),
            None => format!("https://translate.google.{}{}", region, TRANSLATE_PATH),
        }
    }

    async fn request(&self, request: ProviderRequest) -> TranslationResult<TranslationOutput> {
        let url = self.url_for(&request.region);
        let form = [
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", request.to.as_str()),
            ("dt", "t"),
            ("q", request.query.as_str()),
        ];

        tracing::debug!("请求翻译服务: {} ({} 字符)", url, request.query.chars().count());

        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("翻译服务返回错误: {} - {}", status, body);
            return Err(TranslationError::ProviderError(format!(
                "upstream returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    fn fetch(&self, request: ProviderRequest) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
        self.request(request).boxed()
    }
}

/// 解析 `translate_a/single` 的数组格式响应
///
/// `[[["译文","原文",...],...],null,"en",...]`：译文是第一层各段首元素的拼接，
/// 下标 2 是检测到的源语言。
pub fn parse_response(body: &str) -> TranslationResult<TranslationOutput> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| TranslationError::ProviderError(format!("invalid response body: {}", e)))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::ProviderError("missing translation segments".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let source_language = value
        .get(2)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TranslationOutput {
        text,
        source_language,
    })
}
