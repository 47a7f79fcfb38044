//! 简化的 CSS 选择器
//!
//! 只支持跳过翻译规则需要的子集：标签名、类名以及后代组合符，
//! 例如 `a span.invisible`、`a.u-url.mention`、`.translation-bypass`。

use std::fmt;
use std::str::FromStr;

use super::fragment::{Fragment, NodeId};

/// 选择器解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector '{}': {}", self.selector, self.message)
    }
}

impl std::error::Error for SelectorError {}

/// 复合选择器，如 `a.mention.hashtag`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(source: &str, token: &str) -> Result<Self, SelectorError> {
        let error = |message: &str| SelectorError {
            selector: source.to_string(),
            message: message.to_string(),
        };

        let mut parts = token.split('.');
        let tag = match parts.next() {
            Some("") => None,
            Some("*") => None,
            Some(tag) if is_identifier(tag) => Some(tag.to_ascii_lowercase()),
            Some(tag) => return Err(error(&format!("unsupported tag '{}'", tag))),
            None => None,
        };

        let mut classes = Vec::new();
        for class in parts {
            if !is_identifier(class) {
                return Err(error(&format!("unsupported class '{}'", class)));
            }
            classes.push(class.to_string());
        }

        if tag.is_none() && classes.is_empty() && !token.starts_with('*') {
            return Err(error("empty compound"));
        }

        Ok(Self { tag, classes })
    }

    fn matches(&self, fragment: &Fragment, id: NodeId) -> bool {
        let Some(tag_name) = fragment.tag_name(id) else {
            return false;
        };

        if let Some(ref tag) = self.tag {
            if !tag.eq_ignore_ascii_case(tag_name) {
                return false;
            }
        }

        self.classes
            .iter()
            .all(|class| fragment.has_class(id, class))
    }
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 由后代组合符连接的选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    /// 解析选择器
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let compounds = source
            .split_whitespace()
            .map(|token| Compound::parse(source, token))
            .collect::<Result<Vec<_>, _>>()?;

        if compounds.is_empty() {
            return Err(SelectorError {
                selector: source.to_string(),
                message: "empty selector".to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            compounds,
        })
    }

    /// 原始选择器文本
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 判断节点是否匹配
    ///
    /// 从右向左匹配：最右侧复合选择器必须匹配节点本身，
    /// 其余部分依次匹配最近的满足条件的祖先。
    pub fn matches(&self, fragment: &Fragment, id: NodeId) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };

        if !last.matches(fragment, id) {
            return false;
        }

        let mut current = fragment.parent(id);
        for compound in ancestors.iter().rev() {
            loop {
                match current {
                    Some(ancestor) if compound.matches(fragment, ancestor) => {
                        current = fragment.parent(ancestor);
                        break;
                    }
                    Some(ancestor) => current = fragment.parent(ancestor),
                    None => return false,
                }
            }
        }

        true
    }

    /// 按文档顺序返回所有匹配的元素
    pub fn select_all(&self, fragment: &Fragment) -> Vec<NodeId> {
        fragment
            .descendants(fragment.root())
            .into_iter()
            .filter(|id| self.matches(fragment, *id))
            .collect()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a > span").is_err());
        assert!(Selector::parse("a..x").is_err());
        assert!(Selector::parse("a#id").is_err());
        assert!(Selector::parse("a span.invisible").is_ok());
        assert!(Selector::parse(".translation-bypass").is_ok());
    }

    #[test]
    fn test_descendant_matching() {
        let fragment = Fragment::parse(
            r#"<p><a href="x"><span class="invisible">https://</span><span>example.com</span></a><span class="invisible">kept</span></p>"#,
        )
        .unwrap();
        let selector = Selector::parse("a span.invisible").unwrap();

        let matched = selector.select_all(&fragment);
        assert_eq!(matched.len(), 1);
        assert_eq!(fragment.text_content(matched[0]), "https://");
    }

    #[test]
    fn test_compound_requires_all_classes() {
        let fragment = Fragment::parse(
            r#"<a class="u-url mention">@alice</a><a class="mention hashtag">#rust</a>"#,
        )
        .unwrap();

        let mention = Selector::parse("a.u-url.mention").unwrap();
        let hashtag = Selector::parse("a.mention.hashtag").unwrap();

        assert_eq!(mention.select_all(&fragment).len(), 1);
        assert_eq!(hashtag.select_all(&fragment).len(), 1);
        assert_eq!(Selector::parse(".mention").unwrap().select_all(&fragment).len(), 2);
    }
}
