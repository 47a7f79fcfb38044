//! 翻译模块
//!
//! 保留标记结构的 HTML 片段翻译：
//! - **core**: 请求编排与诊断
//! - **pipeline**: 跳过标注、遍历、文本段提取、批次、回写
//! - **provider**: 上游翻译服务接口
//! - **language**: 源语言统计
//! - **storage**: 响应缓存
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use translation_bridge::translation::{TranslateRequest, TranslationConfig, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::with_google(TranslationConfig::default())?;
//! let response = service
//!     .translate(&TranslateRequest::new("<p>Hello</p>", "fr"))
//!     .await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

/// 配置管理模块
pub mod config;

/// 请求编排
pub mod core;

/// 错误处理模块
pub mod error;

/// 源语言统计
pub mod language;

/// 文本处理流水线
pub mod pipeline;

/// 上游翻译服务
pub mod provider;

/// 响应缓存
pub mod storage;

pub use config::{constants, ConfigManager, TranslationConfig};
pub use core::{TranslateRequest, TranslateResponse, TranslationService};
pub use error::{ErrorSeverity, TranslationError, TranslationResult};
pub use language::{LanguageShare, LanguageTally};
pub use provider::{
    is_valid_region, GoogleTranslator, ProviderRequest, TranslationOutput, Translator,
};
pub use storage::{CacheKey, CacheStore, MemoryCache};
