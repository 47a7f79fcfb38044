//! # Translation Bridge Library
//!
//! 翻译社交平台的富文本（HTML 片段）帖子，同时保留标记结构、行内格式和不应翻译的片段。
//!
//! ## 模块组织
//!
//! - `env` - 环境变量配置
//! - `parsers` - HTML 片段解析、选择器与序列化
//! - `translation` - 翻译流水线、上游接口、语言统计与缓存
//! - `redis_cache` - Redis 缓存后端（可选）
//! - `web` - Web服务器功能（可选）

pub mod env;
pub mod parsers;
#[cfg(feature = "web")]
pub mod redis_cache;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use translation::{
    TranslateRequest, TranslateResponse, TranslationConfig, TranslationError, TranslationResult,
    TranslationService,
};
