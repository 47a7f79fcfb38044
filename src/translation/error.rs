//! 翻译模块统一错误处理
//!
//! 核心流水线的错误分类。前三个校验类错误的显示文本同时也是
//! HTTP 响应中 `message` 字段的内容，客户端依赖这些字符串，不要改动。

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 请求正文为空
    #[error("Empty Content")]
    EmptyContent,

    /// 缺少目标语言
    #[error("Empty To")]
    EmptyTargetLocale,

    /// 服务区域不是合法的域名后缀
    #[error("Invalid TLD: {0}")]
    InvalidRegion(String),

    /// 片段中没有可翻译的文本
    #[error("Nothing to translate")]
    NothingToTranslate,

    /// 上游翻译服务调用失败
    #[error("Translation provider error: {0}")]
    ProviderError(String),

    /// 非批量模式下所有请求均失败
    #[error("All translation failed")]
    AllRunsFailed(usize),

    /// 批量译文行数与发送的行数不一致
    #[error("Translated line count mismatch: expected {expected}, got {actual}")]
    AlignmentMismatch { expected: usize, actual: usize },

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::EmptyContent => ErrorSeverity::Info,
            TranslationError::EmptyTargetLocale => ErrorSeverity::Info,
            TranslationError::InvalidRegion(_) => ErrorSeverity::Info,
            TranslationError::NothingToTranslate => ErrorSeverity::Warning,
            TranslationError::ProviderError(_) => ErrorSeverity::Error,
            TranslationError::AllRunsFailed(_) => ErrorSeverity::Error,
            TranslationError::AlignmentMismatch { .. } => ErrorSeverity::Error,
            TranslationError::ParseError(_) => ErrorSeverity::Error,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::CacheError(_) => ErrorSeverity::Warning,
            TranslationError::TimeoutError(_) => ErrorSeverity::Warning,
        }
    }

    /// 稳定的机器可读错误码
    pub fn code(&self) -> &'static str {
        match self {
            TranslationError::EmptyContent => "empty_content",
            TranslationError::EmptyTargetLocale => "empty_to",
            TranslationError::InvalidRegion(_) => "invalid_tld",
            TranslationError::NothingToTranslate => "nothing_to_translate",
            TranslationError::ProviderError(_) => "provider_error",
            TranslationError::AllRunsFailed(_) => "all_runs_failed",
            TranslationError::AlignmentMismatch { .. } => "alignment_mismatch",
            TranslationError::ParseError(_) => "parse_error",
            TranslationError::SerializationError(_) => "serialization_error",
            TranslationError::ConfigError(_) => "config_error",
            TranslationError::CacheError(_) => "cache_error",
            TranslationError::TimeoutError(_) => "timeout",
        }
    }

    /// 是否为请求参数校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TranslationError::EmptyContent
                | TranslationError::EmptyTargetLocale
                | TranslationError::InvalidRegion(_)
        )
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ParseError(format!("TOML解析错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TimeoutError(format!("翻译请求超时: {}", error))
        } else {
            TranslationError::ProviderError(error.to_string())
        }
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    pub fn provider_error<T: std::fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ProviderError(msg.to_string())
    }

    pub fn config_error<T: std::fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    pub fn cache_error<T: std::fmt::Display>(msg: T) -> TranslationError {
        TranslationError::CacheError(msg.to_string())
    }
}
