//! 源语言统计
//!
//! 汇总各次上游调用检测到的源语言，计算占比并生成显示名称。

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// 未检测到语言时使用的代码
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const LANGUAGE_NAMES: &str = include_str!("../../assets/language_names.toml");

type NameTable = HashMap<String, HashMap<String, String>>;

fn name_table() -> &'static NameTable {
    static TABLE: OnceLock<NameTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        toml::from_str(LANGUAGE_NAMES).unwrap_or_else(|e| {
            tracing::error!("语言名称表解析失败: {}", e);
            HashMap::new()
        })
    })
}

/// 响应中的一项语言占比
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    pub language: String,
    pub percentage: String,
    pub display_name: String,
}

impl LanguageShare {
    pub fn is_unknown(&self) -> bool {
        self.language == UNKNOWN_LANGUAGE
    }
}

/// 规范化语言代码，中文的地区变体归入简体或繁体
pub fn normalize_code(code: &str) -> String {
    let code = code.trim().replace('_', "-").to_lowercase();

    match code.as_str() {
        "zh-cn" | "zh-sg" => "zh-hans".to_string(),
        "zh-hk" | "zh-tw" => "zh-hant".to_string(),
        _ => code,
    }
}

/// 完整代码优先，其次是主语言子标签
fn lookup_keys(code: &str) -> Vec<String> {
    let normalized = normalize_code(code);
    let mut keys = vec![normalized.clone()];

    if let Some((primary, _)) = normalized.split_once('-') {
        keys.push(primary.to_string());
    }

    keys
}

/// 以界面语言显示语言名称
///
/// 依次尝试界面语言、英语，都没有时返回原始代码。
pub fn display_name(code: &str, locale: &str) -> String {
    let code = if code.is_empty() { UNKNOWN_LANGUAGE } else { code };
    let table = name_table();

    let Some(names) = lookup_keys(code).iter().find_map(|key| table.get(key)) else {
        return code.to_string();
    };

    let mut locales = lookup_keys(locale);
    if locales.first().map(String::as_str) == Some("zh") {
        locales.push("zh-hans".to_string());
    }
    locales.push("en".to_string());

    locales
        .iter()
        .find_map(|key| names.get(key))
        .cloned()
        .unwrap_or_else(|| code.to_string())
}

/// 千分比，四舍五入，出现过的语言至少为 1
fn permille(count: usize, total: usize) -> usize {
    ((count * 2000 + total) / (2 * total)).max(1)
}

/// 千分比格式化为一位小数的百分比，整数时省略小数
fn format_percentage(permille: usize) -> String {
    if permille % 10 == 0 {
        format!("{}%", permille / 10)
    } else {
        format!("{}.{}%", permille / 10, permille % 10)
    }
}

/// 源语言计数
#[derive(Debug, Clone, Default)]
pub struct LanguageTally {
    // 按首次出现顺序保存
    counts: Vec<(String, usize)>,
    total: usize,
}

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个样本，空代码计入未知语言
    pub fn record(&mut self, code: &str) {
        let key = if code.is_empty() { UNKNOWN_LANGUAGE } else { code };

        match self.counts.iter_mut().find(|(language, _)| language == key) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((key.to_string(), 1)),
        }
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// 按出现次数降序排列的占比，次数相同按首次出现顺序
    ///
    /// 没有任何样本时返回一项 100% 的未知语言。
    pub fn shares(&self, locale: &str) -> Vec<LanguageShare> {
        if self.total == 0 {
            return vec![LanguageShare {
                language: UNKNOWN_LANGUAGE.to_string(),
                percentage: "100%".to_string(),
                display_name: display_name(UNKNOWN_LANGUAGE, locale),
            }];
        }

        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));

        sorted
            .into_iter()
            .map(|(language, count)| LanguageShare {
                percentage: format_percentage(permille(count, self.total)),
                display_name: display_name(&language, locale),
                language,
            })
            .collect()
    }
}

impl<S: AsRef<str>> Extend<S> for LanguageTally {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for code in iter {
            self.record(code.as_ref());
        }
    }
}
