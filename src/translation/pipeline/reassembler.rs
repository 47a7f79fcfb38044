//! 译文回写
//!
//! 先根据文本段和译文计算每个节点的新文本，全部计算成功后再一次性写回，
//! 失败时片段保持原样。

use std::sync::OnceLock;

use regex::Regex;

use super::collector::Run;
use crate::parsers::html::fragment::{Fragment, NodeId};
use crate::translation::error::{TranslationError, TranslationResult};

/// 全角冒号后多出的空白
fn colon_artifact() -> &'static Regex {
    static COLON_ARTIFACT: OnceLock<Regex> = OnceLock::new();
    COLON_ARTIFACT.get_or_init(|| Regex::new(r"：\s$").expect("静态正则表达式"))
}

/// 规整单段译文：去掉首尾空白，补回原有的空格，再去掉冒号后的多余空白
pub fn normalize_segment(text: &str, leading_space: bool, trailing_space: bool) -> String {
    let trimmed = text.trim();

    let mut result = String::with_capacity(trimmed.len() + 2);
    if leading_space {
        result.push(' ');
    }
    result.push_str(trimmed);
    if trailing_space {
        result.push(' ');
    }

    colon_artifact().replace(&result, "：").into_owned()
}

/// 一个节点的待写入文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWrite {
    pub node: NodeId,
    pub text: String,
}

/// 译文回写器
pub struct Reassembler;

impl Reassembler {
    /// 计算写入计划，不修改片段
    ///
    /// `translations` 必须与 `runs` 一一对应；`None` 的文本段保留原文。
    pub fn plan(
        fragment: &Fragment,
        runs: &[Run],
        translations: &[Option<String>],
    ) -> TranslationResult<Vec<NodeWrite>> {
        if runs.len() != translations.len() {
            return Err(TranslationError::AlignmentMismatch {
                expected: runs.len(),
                actual: translations.len(),
            });
        }

        let mut writes = Vec::new();
        let mut start = 0;

        // 同一节点的文本段在提取时就是连续的
        while start < runs.len() {
            let group = runs[start].group_index;
            let end = start
                + runs[start..]
                    .iter()
                    .take_while(|run| run.group_index == group)
                    .count();

            if let Some(write) =
                Self::plan_group(fragment, &runs[start..end], &translations[start..end])
            {
                writes.push(write);
            }

            start = end;
        }

        Ok(writes)
    }

    fn plan_group(
        fragment: &Fragment,
        runs: &[Run],
        translations: &[Option<String>],
    ) -> Option<NodeWrite> {
        if translations.iter().all(Option::is_none) {
            return None;
        }

        let node = runs.first()?.node;
        let original = fragment.text(node)?;
        let mut lines: Vec<String> = original.split('\n').map(str::to_string).collect();
        let mut whole = None;

        for (run, translation) in runs.iter().zip(translations) {
            let Some(translation) = translation else {
                continue;
            };
            let text = normalize_segment(translation, run.leading_space, run.trailing_space);

            match run.line {
                Some(line) => {
                    if let Some(slot) = lines.get_mut(line) {
                        *slot = text;
                    }
                }
                None => whole = Some(text),
            }
        }

        Some(NodeWrite {
            node,
            text: whole.unwrap_or_else(|| lines.join("\n")),
        })
    }

    /// 写回片段，返回修改的节点数
    pub fn apply(fragment: &mut Fragment, writes: &[NodeWrite]) -> usize {
        for write in writes {
            fragment.set_text(write.node, &write.text);
        }

        tracing::debug!("回写了 {} 个文本节点", writes.len());

        writes.len()
    }
}
