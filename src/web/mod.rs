//! Web 服务器模块
//!
//! 以 HTTP 接口提供 HTML 片段翻译服务

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::redis_cache::{RedisCache, RedisCacheConfig};
use crate::translation::error::TranslationResult;
use crate::translation::storage::{CacheStore, MemoryCache};
use crate::translation::{TranslationConfig, TranslationService};

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    translation_config: TranslationConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, translation_config: TranslationConfig) -> Self {
        Self {
            config,
            translation_config,
        }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> TranslationResult<()> {
        let cache = self.open_cache().await;
        let service = TranslationService::with_google(self.translation_config.clone())?;

        let app_state =
            Arc::new(AppState::new(service, Some(cache)).with_timeout(self.config.request_timeout));
        let app = create_router(app_state);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address()).await?;

        tracing::info!(
            "Web server starting at http://{}",
            self.config.listen_address()
        );

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Redis 不可用时退回进程内缓存
    async fn open_cache(&self) -> Arc<dyn CacheStore> {
        let local = || -> Arc<dyn CacheStore> {
            Arc::new(MemoryCache::new(self.translation_config.local_cache_size))
        };

        let Some(url) = &self.config.redis_url else {
            tracing::info!("未配置 Redis，使用进程内缓存");
            return local();
        };

        match RedisCache::new(RedisCacheConfig::new(url.as_str())) {
            Ok(cache) => match cache.test_connection().await {
                Ok(_) => {
                    tracing::info!("Redis 缓存连接成功: {}", url);
                    Arc::new(cache)
                }
                Err(e) => {
                    tracing::warn!("Redis 连接失败: {}，使用进程内缓存", e);
                    local()
                }
            },
            Err(e) => {
                tracing::warn!("无法初始化 Redis 缓存: {}，使用进程内缓存", e);
                local()
            }
        }
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
