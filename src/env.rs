//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，并能生成变量说明文档

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 应用运行模式
    pub struct Mode;
    impl EnvVar<String> for Mode {
        const NAME: &'static str = "APP_ENV";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Application mode: development, production";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("production".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "development" | "dev" => Ok("development".to_string()),
                "production" | "prod" => Ok("production".to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid mode '{}'. Use: development, production", value),
                }),
            }
        }
    }

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 是否为开发模式
    pub fn is_development() -> bool {
        Mode::get().map(|mode| mode == "development").unwrap_or(false)
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 翻译服务域名后缀
    pub struct GoogleTld;
    impl EnvVar<String> for GoogleTld {
        const NAME: &'static str = "TRANSLATION_GOOGLE_TLD";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Provider region (top-level domain of translate.google.*)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("com".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let tld = value.trim().trim_start_matches('.').to_lowercase();
            if !crate::translation::provider::is_valid_region(&tld) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid top-level domain '{}'", value),
                });
            }
            Ok(tld)
        }
    }

    /// 批量翻译开关
    pub struct Batch;
    impl EnvVar<bool> for Batch {
        const NAME: &'static str = "TRANSLATION_BATCH";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Join all text runs into one upstream call";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 翻译服务地址
    pub struct Endpoint;
    impl EnvVar<String> for Endpoint {
        const NAME: &'static str = "TRANSLATION_ENDPOINT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Provider endpoint URL (defaults to https://translate.google.{tld})";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Endpoint URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSLATION_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Overall request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > 300 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 300 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// Redis 连接地址
    pub struct RedisUrl;
    impl EnvVar<String> for RedisUrl {
        const NAME: &'static str = "REDIS_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Redis connection URL (unset = in-process LRU cache)";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("redis://") || url.starts_with("rediss://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Redis URL must start with redis:// or rediss://".to_string(),
                })
            }
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "TRANSLATION_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(86400));
        const DESCRIPTION: &'static str = "Response cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds < 60 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too short (minimum 60 seconds)".to_string(),
                });
            }

            if seconds > 86400 * 7 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too long (maximum 7 days)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// 本地缓存大小
    pub struct LocalCacheSize;
    impl EnvVar<usize> for LocalCacheSize {
        const NAME: &'static str = "TRANSLATION_CACHE_SIZE";
        const DEFAULT: Option<usize> = Some(1000);
        const DESCRIPTION: &'static str = "In-process cache size (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 10, 100000)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "PORT";
        const DEFAULT: Option<u16> = Some(5000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port must be greater than 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub mode: String,
    pub log_level: String,

    // 翻译配置
    pub google_tld: String,
    pub batch: bool,
    pub endpoint: Option<String>,
    pub timeout: Duration,

    // 缓存配置
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub cache_local_size: usize,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            mode: core::Mode::get()?,
            log_level: core::LogLevel::get()?,

            google_tld: translation::GoogleTld::get()?,
            batch: translation::Batch::get()?,
            endpoint: optional(translation::Endpoint::get())?,
            timeout: translation::Timeout::get()?,

            redis_url: optional(cache::RedisUrl::get())?,
            cache_ttl: cache::Ttl::get()?,
            cache_local_size: cache::LocalCacheSize::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
        })
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Mode: {}", self.mode);
        println!("  Log Level: {}", self.log_level);
        println!("  Provider: translate.google.{}", self.google_tld);
        println!("  Batch: {}", if self.batch { "enabled" } else { "disabled" });
        println!(
            "  Cache: {}",
            if self.redis_url.is_some() { "redis" } else { "memory" }
        );
        println!("  Web Server: {}:{}", self.web_bind_address, self.web_port);
    }
}

/// 未设置的可选变量视为 `None`，设置了但无法解析仍然报错
fn optional<T>(result: EnvResult<T>) -> EnvResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.message == "Required environment variable not set" => Ok(None),
        Err(e) => Err(e),
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();

    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::Mode::NAME,
        core::Mode::DESCRIPTION,
        "production"
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        "info"
    ));

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        translation::GoogleTld::NAME,
        translation::GoogleTld::DESCRIPTION,
        "com"
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        translation::Batch::NAME,
        translation::Batch::DESCRIPTION,
        translation::Batch::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        translation::Endpoint::NAME,
        translation::Endpoint::DESCRIPTION,
        translation::Endpoint::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        translation::Timeout::NAME,
        translation::Timeout::DESCRIPTION,
        translation::Timeout::DEFAULT
    ));

    docs.push_str("\n## Cache Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::RedisUrl::NAME,
        cache::RedisUrl::DESCRIPTION,
        cache::RedisUrl::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::Ttl::NAME,
        cache::Ttl::DESCRIPTION,
        cache::Ttl::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cache::LocalCacheSize::NAME,
        cache::LocalCacheSize::DESCRIPTION,
        cache::LocalCacheSize::DEFAULT
    ));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        web::BindAddress::NAME,
        web::BindAddress::DESCRIPTION,
        "127.0.0.1"
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        web::Port::NAME,
        web::Port::DESCRIPTION,
        web::Port::DEFAULT
    ));

    docs
}
