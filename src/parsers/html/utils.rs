/// 允许进入遍历的内容标签（块级与行内）
pub const TRANSLATABLE_TAGS: &[&str] = &[
    "div",
    "em",
    "span",
    "a",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "p",
    "i",
    "strong",
    "b",
    "del",
    "s",
    "blockquote",
];

/// 跳过翻译的标记类名
pub const BYPASS_CLASS: &str = "translation-bypass";

/// 话题标签中 `#` 包装元素的类名
pub const HASH_CHAR_CLASS: &str = "hash_char";

/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 检查标签是否允许遍历
pub fn is_translatable_tag(tag_name: &str) -> bool {
    TRANSLATABLE_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

/// 拆分 class 属性值
pub fn split_class_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(WHITESPACES).filter(|token| !token.is_empty())
}
