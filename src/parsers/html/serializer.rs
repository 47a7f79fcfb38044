use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

use crate::translation::error::{TranslationError, TranslationResult};

/// 序列化节点的全部子节点（相当于 innerHTML）
pub fn serialize_children(node: &Handle) -> TranslationResult<String> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = node.clone().into();
    serialize(
        &mut buf,
        &serializable,
        SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        },
    )
    .map_err(|e| TranslationError::SerializationError(format!("DOM 序列化失败: {e}")))?;

    String::from_utf8(buf)
        .map_err(|e| TranslationError::SerializationError(format!("序列化结果不是 UTF-8: {e}")))
}
