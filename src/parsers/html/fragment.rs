//! 文档片段竞技场
//!
//! 把 `markup5ever_rcdom` 解析出的树登记到一个按下标寻址的竞技场里。
//! 标签分类在登记时一次性确定，后续的标注、遍历、回写阶段都通过
//! 稳定的 [`NodeId`] 访问节点，不再对标签名做字符串比较。

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::dom::{
    add_node_class, append_child, create_html_element, create_text_node, get_child_node_by_name,
    get_text_content, html_to_dom, node_has_class, remove_node_class, replace_child_with,
    set_text_content,
};
use super::serializer::serialize_children;
use super::utils::is_translatable_tag;
use crate::translation::error::{TranslationError, TranslationResult};

/// 竞技场中的节点下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 元素标签分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    /// 允许进入遍历的内容容器
    Translatable,
    /// 整个子树都不参与翻译（script、code、br 等）
    Opaque,
}

/// 节点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Element(TagCategory),
    /// 注释、文档类型等
    Other,
}

#[derive(Debug)]
struct Slot {
    handle: Handle,
    kind: NodeKind,
    tag: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// 可变的文档片段
pub struct Fragment {
    // 保持 DOM 存活；所有节点都通过 slot 中的 handle 访问
    dom: RcDom,
    slots: Vec<Slot>,
    root: NodeId,
}

impl Fragment {
    /// 解析 HTML 片段
    pub fn parse(content: &str) -> TranslationResult<Self> {
        let dom = html_to_dom(content);

        let body = get_child_node_by_name(&dom.document, "html")
            .and_then(|html| get_child_node_by_name(&html, "body"))
            .ok_or_else(|| TranslationError::ParseError("片段中缺少 body 容器".to_string()))?;

        let mut fragment = Self {
            dom,
            slots: Vec::new(),
            root: NodeId(0),
        };
        let root = fragment.register(body, None);
        // 根节点充当片段的包装容器
        fragment.slots[root.0].kind = NodeKind::Element(TagCategory::Translatable);
        fragment.root = root;

        tracing::debug!("片段解析完成: {} 个节点", fragment.slots.len());

        Ok(fragment)
    }

    fn register(&mut self, handle: Handle, parent: Option<NodeId>) -> NodeId {
        let (kind, tag) = match &handle.data {
            NodeData::Text { .. } => (NodeKind::Text, None),
            NodeData::Element { name, .. } => {
                let tag = name.local.to_string();
                let category = if is_translatable_tag(&tag) {
                    TagCategory::Translatable
                } else {
                    TagCategory::Opaque
                };
                (NodeKind::Element(category), Some(tag))
            }
            _ => (NodeKind::Other, None),
        };

        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            handle: handle.clone(),
            kind,
            tag,
            parent,
            children: Vec::new(),
        });

        let children: Vec<Handle> = handle.children.borrow().clone();
        let child_ids = children
            .into_iter()
            .map(|child| self.register(child, Some(id)))
            .collect();
        self.slots[id.0].children = child_ids;

        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// 竞技场中登记过的节点数（包括已脱离树的节点）
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[self.root.0].children.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.slots[id.0].kind
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.slots[id.0].tag.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// 先序遍历的后代节点（不含自身）
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }

        result
    }

    /// 文本节点内容
    pub fn text(&self, id: NodeId) -> Option<String> {
        get_text_content(&self.slots[id.0].handle)
    }

    /// 原地替换文本节点内容
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        set_text_content(&self.slots[id.0].handle, text);
    }

    /// 子树中所有文本按文档顺序拼接
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text;
        }

        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        node_has_class(&self.slots[id.0].handle, class_name)
    }

    pub fn add_class(&mut self, id: NodeId, class_name: &str) {
        add_node_class(&self.slots[id.0].handle, class_name);
    }

    pub fn remove_class(&mut self, id: NodeId, class_name: &str) {
        remove_node_class(&self.slots[id.0].handle, class_name);
    }

    /// 把文本节点中的一段包进新元素
    ///
    /// 原文本节点被 `[前段文本] <tag class=...>片段</tag> [后段文本]`
    /// 替换并脱离树，返回新包装元素的下标。区间必须落在字符边界上。
    pub fn wrap_text_range(
        &mut self,
        id: NodeId,
        range: Range<usize>,
        tag: &str,
        class_name: &str,
    ) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let text = self.text(id)?;

        if range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return None;
        }

        let wrapper = create_html_element(&self.dom, tag, vec![("class", class_name)]);
        append_child(&wrapper, &create_text_node(&text[range.clone()]));

        let mut replacements = Vec::with_capacity(3);
        if range.start > 0 {
            replacements.push(create_text_node(&text[..range.start]));
        }
        replacements.push(wrapper.clone());
        if range.end < text.len() {
            replacements.push(create_text_node(&text[range.end..]));
        }

        let parent_handle = self.slots[parent.0].handle.clone();
        let old_handle = self.slots[id.0].handle.clone();
        replace_child_with(&parent_handle, &old_handle, &replacements);

        let new_ids: Vec<NodeId> = replacements
            .iter()
            .map(|handle| self.register(handle.clone(), Some(parent)))
            .collect();

        let siblings = &mut self.slots[parent.0].children;
        if let Some(position) = siblings.iter().position(|child| *child == id) {
            siblings.splice(position..=position, new_ids.iter().copied());
        }
        self.slots[id.0].parent = None;

        new_ids
            .into_iter()
            .find(|new_id| Rc::ptr_eq(&self.slots[new_id.0].handle, &wrapper))
    }

    /// 序列化根容器的内容
    pub fn to_html(&self) -> TranslationResult<String> {
        serialize_children(&self.slots[self.root.0].handle)
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("nodes", &self.slots.len())
            .field("root", &self.root)
            .finish()
    }
}
