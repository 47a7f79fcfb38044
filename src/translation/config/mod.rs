//! 翻译配置管理模块
//!
//! 支持环境变量、配置文件和默认值

pub mod manager;

pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 上游服务
    pub const DEFAULT_PROVIDER_REGION: &str = "com";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    // 缓存设置
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    pub const DEFAULT_LOCAL_CACHE_SIZE: usize = 1000;

    /// 不参与翻译的子树
    pub const DEFAULT_BYPASS_SELECTORS: &[&str] = &[
        "a span.invisible",
        "a span.ellipsis",
        "a.u-url.mention",
        ".translation-bypass",
    ];

    /// 需要拆出 `#` 的话题标签链接
    pub const DEFAULT_HASHTAG_SELECTOR: &str = "a.mention.hashtag";

    /// 未知语言分组的显示名称原文
    pub const UNKNOWN_LANGUAGE_PHRASE: &str = "Unknown language";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "translation-bridge.toml",
        "config/translation-bridge.toml",
        "translation-bridge.json",
    ];
}

/// 加载配置，失败时回退到默认值
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
