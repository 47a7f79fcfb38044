//! # 解析器模块
//!
//! - `html` - HTML片段解析、DOM操作、选择器匹配与序列化

pub mod html;

pub use html::{Fragment, NodeId, Selector};
