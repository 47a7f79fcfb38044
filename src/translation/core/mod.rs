//! 翻译系统核心模块
//!
//! - **请求** (`request.rs`): 线上协议的请求和响应类型
//! - **诊断** (`diagnostics.rs`): 每个请求一行的诊断日志
//! - **服务** (`service.rs`): 串联流水线各阶段
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── BypassAnnotator (pipeline/bypass.rs)
//!     ├── TreeWalker (pipeline/walker.rs)
//!     ├── RunExtractor (pipeline/collector.rs)
//!     ├── BatchStrategy (pipeline/batch.rs)
//!     ├── Reassembler (pipeline/reassembler.rs)
//!     └── LanguageTally (language.rs)
//! ```

pub mod diagnostics;
pub mod request;
pub mod service;

pub use diagnostics::{DiagnosticEntry, Diagnostics};
pub use request::{TranslateRequest, TranslateResponse};

/// 统一翻译服务 - 主要的对外接口
pub use service::TranslationService;
