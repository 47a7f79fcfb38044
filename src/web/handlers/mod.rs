//! Web 路由处理器

pub mod translation;

pub use translation::translate;
