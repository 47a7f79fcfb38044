use std::cell::RefCell;
use std::rc::Rc;

use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use super::utils::split_class_list;

/// 将 HTML 片段解析为 DOM
///
/// 片段被放进显式的 `<body>` 中解析，这样 `<style>`、`<meta>` 之类
/// 在 body 中出现的标签不会被移到 `<head>`。
pub fn html_to_dom(content: &str) -> RcDom {
    let document = format!("<!DOCTYPE html><html><head></head><body>{content}</body></html>");

    parse_document(RcDom::default(), Default::default()).one(document)
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    attrs_mut[i].value.clear();
                    attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            if let Some(attr_value) = attr_value {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// 检查元素是否带有指定类名
pub fn node_has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|value| split_class_list(&value).any(|token| token == class_name))
        .unwrap_or(false)
}

/// 为元素追加类名（已存在时不重复添加）
pub fn add_node_class(node: &Handle, class_name: &str) {
    if node_has_class(node, class_name) {
        return;
    }

    let value = match get_node_attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class_name),
        _ => class_name.to_string(),
    };
    set_node_attr(node, "class", Some(value));
}

/// 移除元素的类名，class 属性变空时一并移除
pub fn remove_node_class(node: &Handle, class_name: &str) {
    let Some(existing) = get_node_attr(node, "class") else {
        return;
    };

    let remaining: Vec<&str> = split_class_list(&existing)
        .filter(|token| *token != class_name)
        .collect();

    if remaining.is_empty() {
        set_node_attr(node, "class", None);
    } else {
        set_node_attr(node, "class", Some(remaining.join(" ")));
    }
}

/// 读取文本节点内容
pub fn get_text_content(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// 替换文本节点内容，非文本节点静默忽略
pub fn set_text_content(node: &Handle, text: &str) {
    if let NodeData::Text { contents } = &node.data {
        *contents.borrow_mut() = StrTendril::from(text);
    }
}

/// 创建游离的文本节点
pub fn create_text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(text)),
    })
}

/// 创建游离的 HTML 元素
pub fn create_html_element(dom: &RcDom, tag_name: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let attrs = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: format_tendril!("{}", value),
        })
        .collect();

    create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(tag_name)),
        attrs,
    )
}

/// 用若干新节点替换父节点中的一个子节点
pub fn replace_child_with(parent: &Handle, old: &Handle, replacements: &[Handle]) {
    let mut children = parent.children.borrow_mut();
    let Some(position) = children.iter().position(|child| Rc::ptr_eq(child, old)) else {
        return;
    };

    old.parent.set(None);
    for node in replacements {
        node.parent.set(Some(Rc::downgrade(parent)));
    }
    children.splice(position..=position, replacements.iter().cloned());
}

/// 将子节点追加到父节点末尾
pub fn append_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}
