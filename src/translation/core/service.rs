//! 翻译服务
//!
//! 协调一次请求的完整流程：
//!
//! ```text
//! 解析 → 跳过标注 → 遍历 → 提取文本段 → 批次翻译 → 回写 → 清理标注 → 语言统计
//! ```
//!
//! 片段只在单个请求内存在，解析后在当前任务中处理完毕再序列化返回。

use std::sync::Arc;

use super::diagnostics::Diagnostics;
use super::request::{TranslateRequest, TranslateResponse};
use crate::parsers::html::fragment::Fragment;
use crate::translation::config::{constants, TranslationConfig};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::language::{LanguageShare, LanguageTally};
use crate::translation::pipeline::{
    select_strategy, BypassAnnotator, Reassembler, RunExtractor, TreeWalker,
};
use crate::translation::provider::{
    is_valid_region, GoogleTranslator, ProviderRequest, Translator,
};

/// 翻译服务
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    annotator: BypassAnnotator,
    config: TranslationConfig,
}

impl TranslationService {
    pub fn new(config: TranslationConfig, translator: Arc<dyn Translator>) -> TranslationResult<Self> {
        config.validate()?;
        let annotator = BypassAnnotator::from_config(&config)?;

        tracing::debug!(
            "翻译服务已创建: provider={}, region={}, batch={}",
            translator.name(),
            config.provider_region,
            config.batch
        );

        Ok(Self {
            translator,
            annotator,
            config,
        })
    }

    /// 使用 Google 翻译作为上游
    pub fn with_google(config: TranslationConfig) -> TranslationResult<Self> {
        let translator = Arc::new(GoogleTranslator::from_config(&config)?);
        Self::new(config, translator)
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// 翻译一个 HTML 片段
    pub async fn translate(&self, request: &TranslateRequest) -> TranslationResult<TranslateResponse> {
        let region = request.region(&self.config).to_string();
        let batch = request.batch_enabled(&self.config);
        let mut diagnostics = Diagnostics::new(request, &region, batch);

        match self.run(request, &region, batch, &mut diagnostics).await {
            Ok(response) => {
                tracing::info!(
                    "翻译完成: to={}, batch={}, 语言={}",
                    response.to,
                    batch,
                    response
                        .from
                        .iter()
                        .map(|share| share.language.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                );
                diagnostics.finish(&request.content, self.config.development);
                Ok(response)
            }
            Err(error) => {
                diagnostics.fail(&error, &request.content);
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        request: &TranslateRequest,
        region: &str,
        batch: bool,
        diagnostics: &mut Diagnostics,
    ) -> TranslationResult<TranslateResponse> {
        if request.content.is_empty() {
            return Err(TranslationError::EmptyContent);
        }
        let to = request.target();
        if to.is_empty() {
            return Err(TranslationError::EmptyTargetLocale);
        }
        if !is_valid_region(region) {
            return Err(TranslationError::InvalidRegion(region.to_string()));
        }

        let mut fragment = Fragment::parse(&request.content)?;
        self.annotator.annotate(&mut fragment);

        let mut walker = TreeWalker::new();
        let nodes = walker.walk(&fragment);

        let strategy = select_strategy(batch);
        let runs = RunExtractor::new(strategy.granularity()).extract(&fragment, &nodes);

        tracing::debug!(
            "提取了 {} 个文本段 (节点 {}, 策略 {})",
            runs.len(),
            nodes.len(),
            strategy.name()
        );

        let mut tally = LanguageTally::new();

        match strategy
            .execute(self.translator.as_ref(), &runs, to, region)
            .await
        {
            Ok(outcome) => {
                for failure in &outcome.failures {
                    diagnostics.record(&failure.error, Some(&failure.query));
                }

                // 全部计算成功后才修改片段
                let writes = Reassembler::plan(&fragment, &runs, &outcome.translations)?;
                Reassembler::apply(&mut fragment, &writes);
                tally.extend(&outcome.languages);
            }
            Err(TranslationError::NothingToTranslate) => {
                tracing::warn!("片段中没有可翻译的文本");
                diagnostics.record(&TranslationError::NothingToTranslate, None);
            }
            Err(error) => return Err(error),
        }

        BypassAnnotator::cleanup(&mut fragment);

        let locale = request.display_locale();
        let mut from = tally.shares(locale);
        self.localize_unknown(&mut from, locale, region, diagnostics)
            .await;

        Ok(TranslateResponse {
            text: fragment.to_html()?,
            from,
            to: to.to_string(),
        })
    }

    /// 未知语言的显示名称由上游翻译得到，失败时保留名称表中的值
    async fn localize_unknown(
        &self,
        shares: &mut [LanguageShare],
        locale: &str,
        region: &str,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(share) = shares.iter_mut().find(|share| share.is_unknown()) else {
            return;
        };

        let request = ProviderRequest::new(constants::UNKNOWN_LANGUAGE_PHRASE, locale, region);
        match self.translator.translate(request).await {
            Ok(output) if !output.text.trim().is_empty() => {
                share.display_name = output.text.trim().to_string();
            }
            Ok(_) => {
                tracing::warn!("未知语言名称的译文为空");
            }
            Err(error) => {
                tracing::warn!("未知语言名称翻译失败: {}", error);
                diagnostics.record(&error, Some(constants::UNKNOWN_LANGUAGE_PHRASE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::provider::TranslationOutput;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::Mutex;

    /// 把查询逐行加上方括号，源语言固定
    struct Bracket {
        language: &'static str,
        queries: Mutex<Vec<String>>,
    }

    impl Bracket {
        fn new(language: &'static str) -> Arc<Self> {
            Arc::new(Self {
                language,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    impl Translator for Bracket {
        fn name(&self) -> &str {
            "bracket"
        }

        fn fetch(
            &self,
            request: ProviderRequest,
        ) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
            self.queries.lock().unwrap().push(request.query.clone());
            let text = request
                .query
                .split('\n')
                .map(|line| format!("[{}]", line))
                .collect::<Vec<_>>()
                .join("\n");
            let language = self.language;
            async move { Ok(TranslationOutput::new(text, language)) }.boxed()
        }
    }

    fn service(translator: Arc<Bracket>) -> TranslationService {
        TranslationService::new(TranslationConfig::default(), translator).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let service = service(Bracket::new("en"));

        let error = service
            .translate(&TranslateRequest::new("", "fr"))
            .await
            .unwrap_err();
        assert_eq!(error, TranslationError::EmptyContent);

        let error = service
            .translate(&TranslateRequest::new("<p>hi</p>", "  "))
            .await
            .unwrap_err();
        assert_eq!(error, TranslationError::EmptyTargetLocale);
    }

    #[tokio::test]
    async fn test_invalid_region_never_reaches_provider() {
        let translator = Bracket::new("en");
        let service = service(translator.clone());

        for tld in ["com@evil", "com/x?", "com@127.0.0.1:6379"] {
            let error = service
                .translate(&TranslateRequest::new("<p>hi</p>", "fr").with_tld(tld))
                .await
                .unwrap_err();
            assert_eq!(error, TranslationError::InvalidRegion(tld.to_string()));
        }
        assert!(translator.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batched_translation() {
        let translator = Bracket::new("en");
        let service = service(translator.clone());

        let response = service
            .translate(&TranslateRequest::new("<p>Hello <b>world</b></p>", "fr"))
            .await
            .unwrap();

        assert_eq!(response.text, "<p>[Hello] <b>[world]</b></p>");
        assert_eq!(response.to, "fr");
        assert_eq!(response.from.len(), 1);
        assert_eq!(response.from[0].language, "en");
        assert_eq!(*translator.queries.lock().unwrap(), vec!["Hello\nworld"]);
    }

    #[tokio::test]
    async fn test_nothing_to_translate_is_soft() {
        let translator = Bracket::new("en");
        let service = service(translator.clone());

        let response = service
            .translate(&TranslateRequest::new("<p> </p>", "fr").with_locale("en"))
            .await
            .unwrap();

        assert_eq!(response.text, "<p> </p>");
        assert_eq!(response.from.len(), 1);
        assert!(response.from[0].is_unknown());
        assert_eq!(response.from[0].display_name, "[Unknown language]");
        assert_eq!(
            *translator.queries.lock().unwrap(),
            vec![constants::UNKNOWN_LANGUAGE_PHRASE]
        );
    }

    #[tokio::test]
    async fn test_bypass_markers_removed() {
        let service = service(Bracket::new("en"));

        let response = service
            .translate(&TranslateRequest::new(
                r#"<p><a href="/tags/rust" class="mention hashtag">#rust</a></p>"#,
                "fr",
            ))
            .await
            .unwrap();

        assert!(!response.text.contains("translation-bypass"));
        assert!(response.text.contains(r#"<span class="hash_char">#</span>[rust]"#));
    }
}
