//! 树遍历
//!
//! 深度优先地选出需要翻译的文本节点。只有允许列表中的元素会被
//! 进入，带跳过标记的元素整棵子树都不会被访问。

use crate::parsers::html::fragment::{Fragment, NodeId, NodeKind, TagCategory};
use crate::parsers::html::utils::BYPASS_CLASS;

/// 遍历统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub nodes_visited: usize,
    pub subtrees_skipped: usize,
    pub text_nodes: usize,
}

/// 树遍历器
#[derive(Debug, Default)]
pub struct TreeWalker {
    stats: WalkStats,
}

impl TreeWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文档顺序返回所有待翻译的文本节点
    pub fn walk(&mut self, fragment: &Fragment) -> Vec<NodeId> {
        let mut nodes = Vec::new();

        for child in fragment.children(fragment.root()) {
            self.walk_recursive(fragment, *child, &mut nodes);
        }

        tracing::debug!(
            "遍历完成: 访问 {} 个节点, 跳过 {} 个子树, 收集 {} 个文本节点",
            self.stats.nodes_visited,
            self.stats.subtrees_skipped,
            self.stats.text_nodes
        );

        nodes
    }

    fn walk_recursive(&mut self, fragment: &Fragment, id: NodeId, nodes: &mut Vec<NodeId>) {
        self.stats.nodes_visited += 1;

        match fragment.kind(id) {
            NodeKind::Text => {
                let has_content = fragment
                    .text(id)
                    .map(|text| !text.trim().is_empty())
                    .unwrap_or(false);

                if has_content {
                    self.stats.text_nodes += 1;
                    nodes.push(id);
                }
            }
            NodeKind::Element(TagCategory::Translatable) => {
                if fragment.has_class(id, BYPASS_CLASS) {
                    self.stats.subtrees_skipped += 1;
                    return;
                }

                for child in fragment.children(id) {
                    self.walk_recursive(fragment, *child, nodes);
                }
            }
            NodeKind::Element(TagCategory::Opaque) => {
                self.stats.subtrees_skipped += 1;
            }
            NodeKind::Other => {}
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_texts(html: &str) -> Vec<String> {
        let fragment = Fragment::parse(html).unwrap();
        TreeWalker::new()
            .walk(&fragment)
            .into_iter()
            .filter_map(|id| fragment.text(id))
            .collect()
    }

    #[test]
    fn test_collects_in_document_order() {
        assert_eq!(
            walk_texts("<p>one <strong>two</strong></p><ul><li>three</li></ul>four"),
            vec!["one ", "two", "three", "four"]
        );
    }

    #[test]
    fn test_skips_opaque_and_whitespace() {
        assert_eq!(
            walk_texts("<p>a<code>let x</code> <br>  <script>x()</script>b</p>"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_bypass_subtree_is_never_visited() {
        let fragment = Fragment::parse(
            r#"<p>keep <span class="translation-bypass">skip <b>deep</b></span></p>"#,
        )
        .unwrap();

        let mut walker = TreeWalker::new();
        let nodes = walker.walk(&fragment);

        assert_eq!(nodes.len(), 1);
        assert_eq!(walker.stats().subtrees_skipped, 1);
        assert_eq!(walker.stats().text_nodes, 1);
    }
}
