//! 跳过标注
//!
//! 遍历前给不应翻译的子树加上 `translation-bypass` 类名，
//! 回写完成后再统一移除。话题标签的 `#` 会被拆进独立的包装元素，
//! 只有标签词本身进入翻译。

use crate::parsers::html::fragment::{Fragment, NodeId};
use crate::parsers::html::selector::Selector;
use crate::parsers::html::utils::{BYPASS_CLASS, HASH_CHAR_CLASS};
use crate::translation::config::TranslationConfig;
use crate::translation::error::TranslationResult;

/// 标注统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    pub marked: usize,
    pub hashtags: usize,
}

/// 跳过标注器
#[derive(Debug, Clone)]
pub struct BypassAnnotator {
    selectors: Vec<Selector>,
    hashtag: Selector,
}

impl BypassAnnotator {
    pub fn new(selectors: Vec<Selector>, hashtag: Selector) -> Self {
        Self { selectors, hashtag }
    }

    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Ok(Self::new(config.bypass_rules()?, config.hashtag_rule()?))
    }

    /// 添加跳过标记
    pub fn annotate(&self, fragment: &mut Fragment) -> AnnotationStats {
        let mut stats = AnnotationStats::default();

        for link in self.hashtag.select_all(fragment) {
            if wrap_hash_char(fragment, link) {
                stats.hashtags += 1;
            }
        }

        for selector in &self.selectors {
            for id in selector.select_all(fragment) {
                if !fragment.has_class(id, BYPASS_CLASS) {
                    fragment.add_class(id, BYPASS_CLASS);
                    stats.marked += 1;
                }
            }
        }

        tracing::debug!(
            "跳过标注完成: {} 个子树, {} 个话题标签",
            stats.marked,
            stats.hashtags
        );

        stats
    }

    /// 移除所有跳过标记，返回处理的元素数
    pub fn cleanup(fragment: &mut Fragment) -> usize {
        let marked: Vec<NodeId> = fragment
            .descendants(fragment.root())
            .into_iter()
            .filter(|id| fragment.has_class(*id, BYPASS_CLASS))
            .collect();

        for id in &marked {
            fragment.remove_class(*id, BYPASS_CLASS);
        }

        marked.len()
    }
}

/// 把链接开头的 `#` 包进带跳过标记的 span
///
/// 只看链接中第一个非空白文本节点，它必须以 `#` 开头。
fn wrap_hash_char(fragment: &mut Fragment, link: NodeId) -> bool {
    let first_text = fragment
        .descendants(link)
        .into_iter()
        .find_map(|id| {
            let text = fragment.text(id)?;
            (!text.trim().is_empty()).then_some((id, text))
        });

    let Some((text_node, text)) = first_text else {
        return false;
    };

    let trimmed = text.trim_start();
    if !trimmed.starts_with('#') {
        return false;
    }
    let position = text.len() - trimmed.len();

    let class_name = format!("{} {}", HASH_CHAR_CLASS, BYPASS_CLASS);
    fragment
        .wrap_text_range(text_node, position..position + 1, "span", &class_name)
        .is_some()
}
