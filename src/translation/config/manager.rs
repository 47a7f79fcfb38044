//! 配置管理器
//!
//! 加载顺序：`.env` 文件、配置文件、环境变量覆盖，最后统一校验

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::EnvVar;
use crate::parsers::html::selector::Selector;
use crate::translation::provider::is_valid_region;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 上游配置
    pub provider_region: String,
    pub batch: bool,
    pub provider_endpoint: Option<String>,
    pub request_timeout_secs: u64,

    // 缓存配置
    pub cache_ttl_secs: u64,
    pub local_cache_size: usize,

    // 标注规则
    pub bypass_selectors: Vec<String>,
    pub hashtag_selector: String,

    // 开发模式下诊断日志附带正文
    pub development: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider_region: constants::DEFAULT_PROVIDER_REGION.to_string(),
            batch: true,
            provider_endpoint: None,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),
            local_cache_size: constants::DEFAULT_LOCAL_CACHE_SIZE,

            bypass_selectors: constants::DEFAULT_BYPASS_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hashtag_selector: constants::DEFAULT_HASHTAG_SELECTOR.to_string(),

            development: false,
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if !is_valid_region(&self.provider_region) {
            return Err(TranslationError::ConfigError(format!(
                "provider_region 不是合法的域名后缀: '{}'",
                self.provider_region
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时必须大于0".to_string()));
        }

        if self.local_cache_size == 0 {
            return Err(TranslationError::ConfigError("缓存大小不能为0".to_string()));
        }

        for selector in self
            .bypass_selectors
            .iter()
            .chain(std::iter::once(&self.hashtag_selector))
        {
            Selector::parse(selector)
                .map_err(|e| TranslationError::ConfigError(e.to_string()))?;
        }

        Ok(())
    }

    /// 应用环境变量覆盖，只处理已设置的变量
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, core, translation};

        if let Some(mode) = env_override::<core::Mode, _>() {
            self.development = mode == "development";
        }

        if let Some(tld) = env_override::<translation::GoogleTld, _>() {
            self.provider_region = tld;
        }

        if let Some(batch) = env_override::<translation::Batch, _>() {
            self.batch = batch;
        }

        if let Some(endpoint) = env_override::<translation::Endpoint, _>() {
            tracing::info!("环境变量覆盖翻译服务地址: {}", endpoint);
            self.provider_endpoint = Some(endpoint);
        }

        if let Some(timeout) = env_override::<translation::Timeout, _>() {
            self.request_timeout_secs = timeout.as_secs();
        }

        if let Some(ttl) = env_override::<cache::Ttl, _>() {
            self.cache_ttl_secs = ttl.as_secs();
        }

        if let Some(size) = env_override::<cache::LocalCacheSize, _>() {
            self.local_cache_size = size;
        }
    }

    /// 解析后的跳过规则
    pub fn bypass_rules(&self) -> TranslationResult<Vec<Selector>> {
        self.bypass_selectors
            .iter()
            .map(|s| Selector::parse(s).map_err(|e| TranslationError::ConfigError(e.to_string())))
            .collect()
    }

    pub fn hashtag_rule(&self) -> TranslationResult<Selector> {
        Selector::parse(&self.hashtag_selector)
            .map_err(|e| TranslationError::ConfigError(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// 读取已设置的环境变量，无效值记录警告后忽略
fn env_override<V, T>() -> Option<T>
where
    V: EnvVar<T>,
{
    std::env::var(V::NAME).ok()?;

    match V::get() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("忽略无效的环境变量: {}", e);
            None
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件创建（不读取 `.env`）
    pub fn from_file(path: &str) -> TranslationResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            if Path::new(path).exists() {
                tracing::info!("加载配置文件: {}", path);
                return Self::load_from_file(path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        Self::parse_config(path, &content)
    }

    fn parse_config(path: &str, content: &str) -> TranslationResult<TranslationConfig> {
        if path.ends_with(".toml") {
            toml::from_str(content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        } else {
            serde_json::from_str(content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let production = std::env::var("APP_ENV")
            .map(|mode| mode.starts_with("prod"))
            .unwrap_or(false);
        let env_file = if production { ".env.production" } else { ".env" };

        if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
            tracing::info!("已加载环境变量文件: {}", env_file);
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
