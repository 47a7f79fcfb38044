//! 上游翻译服务接口
//!
//! 流水线只依赖 [`Translator`] 特性：给定查询文本、目标语言和服务区域，
//! 返回译文与检测到的源语言。

pub mod google;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use crate::translation::error::TranslationResult;

pub use google::GoogleTranslator;

/// 服务区域只能是域名后缀，如 `com`、`co.jp`
///
/// 区域会被拼进上游主机名，任何其他字符都可能把请求导向别的主机。
pub fn is_valid_region(region: &str) -> bool {
    !region.is_empty()
        && region.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// 一次上游调用的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub query: String,
    pub to: String,
    pub region: String,
}

impl ProviderRequest {
    pub fn new(query: impl Into<String>, to: &str, region: &str) -> Self {
        Self {
            query: query.into(),
            to: to.to_string(),
            region: region.to_string(),
        }
    }
}

/// 上游调用结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub text: String,
    /// 检测到的源语言，未知时为空串
    pub source_language: String,
}

impl TranslationOutput {
    pub fn new(text: impl Into<String>, source_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
        }
    }
}

/// 翻译服务
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    /// 实际发起上游请求
    fn fetch(&self, request: ProviderRequest) -> BoxFuture<'_, TranslationResult<TranslationOutput>>;

    /// 翻译查询文本，空查询不会发起请求
    fn translate(
        &self,
        request: ProviderRequest,
    ) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
        if request.query.is_empty() {
            return future::ready(Ok(TranslationOutput::default())).boxed();
        }

        self.fetch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl Translator for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(
            &self,
            request: ProviderRequest,
        ) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(TranslationOutput::new(request.query.to_uppercase(), "en")) }.boxed()
        }
    }

    #[test]
    fn test_region_rule() {
        for region in ["com", "co.jp", "com.br", "xn--p1ai"] {
            assert!(is_valid_region(region), "{}", region);
        }
        for region in ["", "com@evil", "com/x?", "com@127.0.0.1:6379", "co..jp", ".com", "-com", "com#"] {
            assert!(!is_valid_region(region), "{}", region);
        }
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let translator = Counting {
            calls: AtomicUsize::new(0),
        };

        let output = translator
            .translate(ProviderRequest::new("", "fr", "com"))
            .await
            .unwrap();
        assert_eq!(output, TranslationOutput::new("", ""));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);

        let output = translator
            .translate(ProviderRequest::new(" ", "fr", "com"))
            .await
            .unwrap();
        assert_eq!(output.source_language, "en");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }
}
