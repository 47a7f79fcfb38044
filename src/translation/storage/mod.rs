//! 存储模块
//!
//! 翻译响应缓存的键格式、存储接口和进程内实现。

pub mod cache;

pub use cache::{CacheKey, CacheStats, CacheStore, MemoryCache};
