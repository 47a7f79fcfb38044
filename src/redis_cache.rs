//! Redis 缓存模块
//!
//! 为 web 端提供翻译响应的 Redis 缓存支持

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisResult};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::storage::CacheStore;

/// Redis 缓存配置
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    pub url: String,
    /// 附加在缓存键前的命名空间，多个服务共用一个 Redis 时使用
    pub key_prefix: Option<String>,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: None,
        }
    }
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self::new("redis://127.0.0.1:6379")
    }
}

/// Redis 缓存客户端
///
/// 多路复用连接在第一次使用时建立，之后所有命令（包括克隆出的实例）共用。
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    config: RedisCacheConfig,
    connection: Arc<Mutex<Option<MultiplexedConnection>>>,
}

impl RedisCache {
    /// 创建新的 Redis 缓存实例
    pub fn new(config: RedisCacheConfig) -> RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            config,
            connection: Arc::new(Mutex::new(None)),
        })
    }

    /// 使用默认配置创建 Redis 缓存实例
    pub fn with_default_config() -> RedisResult<Self> {
        Self::new(RedisCacheConfig::default())
    }

    pub fn config(&self) -> &RedisCacheConfig {
        &self.config
    }

    /// 测试 Redis 连接
    pub async fn test_connection(&self) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn cached_connection(&self) -> Option<MultiplexedConnection> {
        self.connection.lock().ok().and_then(|slot| slot.clone())
    }

    async fn connection(&self) -> RedisResult<MultiplexedConnection> {
        if let Some(conn) = self.cached_connection() {
            return Ok(conn);
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        if let Ok(mut slot) = self.connection.lock() {
            // 并发建立时保留先写入的连接
            return Ok(slot.get_or_insert(conn).clone());
        }

        Ok(conn)
    }

    /// 连接断开后丢弃缓存的连接，下次命令重新建立
    fn check(&self, error: redis::RedisError) -> TranslationError {
        if error.is_io_error() || error.is_connection_dropped() {
            tracing::warn!("Redis 连接已断开，下次请求时重连: {}", error);
            if let Ok(mut slot) = self.connection.lock() {
                slot.take();
            }
        }

        cache_error(error)
    }

    fn full_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    async fn fetch(&self, key: &str) -> TranslationResult<Option<String>> {
        let mut conn = self.connection().await.map_err(cache_error)?;
        let cached: Option<String> = redis::cmd("GET")
            .arg(self.full_key(key))
            .query_async(&mut conn)
            .await
            .map_err(|e| self.check(e))?;

        Ok(cached)
    }

    async fn store(&self, key: &str, value: String, ttl: Duration) -> TranslationResult<()> {
        let mut conn = self.connection().await.map_err(cache_error)?;
        // SETEX 不接受 0 秒
        let seconds = ttl.as_secs().max(1);

        let _: () = redis::cmd("SETEX")
            .arg(self.full_key(key))
            .arg(seconds)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.check(e))?;

        Ok(())
    }
}

fn cache_error(e: redis::RedisError) -> TranslationError {
    TranslationError::CacheError(e.to_string())
}

impl CacheStore for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, TranslationResult<Option<String>>> {
        self.fetch(key).boxed()
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
        ttl: Duration,
    ) -> BoxFuture<'a, TranslationResult<()>> {
        self.store(key, value, ttl).boxed()
    }
}
