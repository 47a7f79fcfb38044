//! Web 模块的数据类型定义

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::translation::error::TranslationError;
use crate::translation::storage::CacheStore;
use crate::translation::TranslationService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    /// 响应缓存，`None` 时每次都重新翻译
    pub cache: Option<Arc<dyn CacheStore>>,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: TranslationService, cache: Option<Arc<dyn CacheStore>>) -> Self {
        let config = service.config();
        let cache_ttl = config.cache_ttl();
        let request_timeout = config.request_timeout();

        Self {
            service: Arc::new(service),
            cache,
            cache_ttl,
            request_timeout,
        }
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub empty_content: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub empty_to: bool,
}

impl From<&TranslationError> for ErrorResponse {
    fn from(error: &TranslationError) -> Self {
        Self {
            message: error.to_string(),
            code: error.code(),
            empty_content: matches!(error, TranslationError::EmptyContent),
            empty_to: matches!(error, TranslationError::EmptyTargetLocale),
        }
    }
}
