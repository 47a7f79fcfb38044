//! 翻译API处理器

use std::sync::Arc;

use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};
use tokio::task;

use crate::translation::core::{TranslateRequest, TranslateResponse};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::web::types::{AppState, ErrorResponse};

type ApiError = (StatusCode, Json<serde_json::Value>);

/// 翻译 HTML 片段
///
/// 带 `status` 和 `edit` 的请求先查缓存；缓存不可用时直接翻译。
pub async fn translate(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<TranslateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cache_key = request
        .cache_key(state.service.config())
        .map(|key| key.to_string());

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        match cache.get(key).await {
            Ok(Some(cached)) => match serde_json::from_str::<serde_json::Value>(&cached) {
                Ok(value) => {
                    tracing::debug!("缓存命中: {}", key);
                    return Ok(Json(value));
                }
                Err(e) => tracing::warn!("缓存内容无法解析，重新翻译: {} - {}", key, e),
            },
            Ok(None) => tracing::debug!("缓存未命中: {}", key),
            Err(e) => tracing::warn!("缓存读取失败，直接翻译: {}", e),
        }
    }

    let response = run_translation(&state, request).await.map_err(|e| {
        crate::translation::error::helpers::log_error(&e);
        error_response(&e)
    })?;

    let value = serde_json::to_value(&response).map_err(|e| {
        let error = TranslationError::from(e);
        error_response(&error)
    })?;

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Err(e) = cache.set(key, value.to_string(), state.cache_ttl).await {
            tracing::warn!("缓存写入失败: {}", e);
        }
    }

    Ok(Json(value))
}

/// 片段在阻塞线程中处理，整体受请求超时限制
async fn run_translation(
    state: &AppState,
    request: TranslateRequest,
) -> TranslationResult<TranslateResponse> {
    let service = state.service.clone();
    let handle = task::spawn_blocking(move || {
        tokio::runtime::Handle::current().block_on(async move { service.translate(&request).await })
    });

    match tokio::time::timeout(state.request_timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(TranslationError::ProviderError(format!("翻译任务失败: {}", e))),
        Err(elapsed) => Err(TranslationError::from(elapsed)),
    }
}

fn status_for(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::TimeoutError(_) => StatusCode::REQUEST_TIMEOUT,
        TranslationError::SerializationError(_) | TranslationError::ConfigError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

fn error_response(error: &TranslationError) -> ApiError {
    let body = serde_json::to_value(ErrorResponse::from(error))
        .unwrap_or_else(|_| serde_json::json!({ "message": error.to_string() }));

    (status_for(error), Json(body))
}
