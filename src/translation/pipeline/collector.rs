//! 文本段提取
//!
//! 把遍历选出的文本节点切成待翻译的文本段（run）。每段记录来源节点、
//! 去掉的首尾空格以及所属分组，回写时据此还原。

use crate::parsers::html::fragment::{Fragment, NodeId};

/// 切分粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// 每个非空行一段
    PerLine,
    /// 整个节点一段
    PerNode,
}

/// 待翻译文本段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// 来源文本节点
    pub node: NodeId,
    /// 去掉首尾各一个空格后的文本
    pub query: String,
    pub leading_space: bool,
    pub trailing_space: bool,
    /// 来源节点在节点列表中的位置
    pub group_index: usize,
    /// 在来源节点中的行号，整节点切分时为 `None`
    pub line: Option<usize>,
}

impl Run {
    fn new(node: NodeId, text: &str, group_index: usize, line: Option<usize>) -> Self {
        let (query, leading_space, trailing_space) = strip_single_spaces(text);

        Self {
            node,
            query: query.to_string(),
            leading_space,
            trailing_space,
            group_index,
            line,
        }
    }
}

/// 去掉开头和结尾各一个空格
fn strip_single_spaces(text: &str) -> (&str, bool, bool) {
    let (text, leading) = match text.strip_prefix(' ') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    let (text, trailing) = match text.strip_suffix(' ') {
        Some(rest) => (rest, true),
        None => (text, false),
    };

    (text, leading, trailing)
}

/// 文本段提取器
#[derive(Debug, Clone, Copy)]
pub struct RunExtractor {
    granularity: Granularity,
}

impl RunExtractor {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// 提取文本段，保持节点和行的原有顺序
    pub fn extract(&self, fragment: &Fragment, nodes: &[NodeId]) -> Vec<Run> {
        let mut runs = Vec::new();

        for (group_index, node) in nodes.iter().enumerate() {
            let Some(text) = fragment.text(*node) else {
                continue;
            };

            if text.trim().is_empty() {
                continue;
            }

            match self.granularity {
                Granularity::PerNode => runs.push(Run::new(*node, &text, group_index, None)),
                Granularity::PerLine => {
                    // 空白行不发送，回写时原样保留
                    for (line_index, line) in text.split('\n').enumerate() {
                        if line.trim().is_empty() {
                            continue;
                        }
                        runs.push(Run::new(*node, line, group_index, Some(line_index)));
                    }
                }
            }
        }

        tracing::debug!("提取了 {} 个文本段（{} 个节点）", runs.len(), nodes.len());

        runs
    }
}
