//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use std::time::Duration;

use crate::env::{EnvError, EnvResult, EnvVar};
use crate::translation::config::constants;

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// Redis 地址，未设置时使用进程内缓存
    pub redis_url: Option<String>,
    /// 单个请求的总超时
    pub request_timeout: Duration,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::{cache, translation, web};

        let redis_url = match cache::RedisUrl::get() {
            Ok(url) => Some(url),
            Err(e) if e.message == "Required environment variable not set" => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            bind_addr: web::BindAddress::get()?,
            port: web::Port::get()?,
            redis_url,
            request_timeout: translation::Timeout::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(EnvError {
                variable: "TRANSLATION_TIMEOUT".to_string(),
                message: "Timeout cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// 检查是否为本地开发模式
    pub fn is_development(&self) -> bool {
        crate::env::core::is_development()
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Failed to load web config from environment: {}. Using defaults.", e);
            Self {
                bind_addr: "127.0.0.1".to_string(),
                port: 5000,
                redis_url: None,
                request_timeout: constants::DEFAULT_REQUEST_TIMEOUT,
            }
        })
    }
}
