//! HTML解析和处理模块
//!
//! - `utils`: 标签表和类名常量
//! - `dom`: 基础DOM操作
//! - `fragment`: 以索引寻址的片段节点表
//! - `selector`: 简单 CSS 选择器
//! - `serializer`: 序列化功能

pub mod dom;
pub mod fragment;
pub mod selector;
pub mod serializer;
pub mod utils;

pub use dom::{get_node_attr, html_to_dom, set_node_attr};
pub use fragment::{Fragment, NodeId, NodeKind, TagCategory};
pub use selector::{Selector, SelectorError};
pub use serializer::serialize_children;
pub use utils::{is_translatable_tag, BYPASS_CLASS, HASH_CHAR_CLASS, WHITESPACES};
