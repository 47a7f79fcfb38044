//! Web 路由定义

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::web::{handlers::translate, types::AppState};

/// 创建路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(translate))
        .route("/api/translate", post(translate))
}
