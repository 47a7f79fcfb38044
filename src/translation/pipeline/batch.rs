//! 批次翻译策略
//!
//! 批量模式把所有文本段按行拼成一次请求；非批量模式每段一次请求并发执行。
//! 策略在每个请求开始时选定一次。

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use super::collector::{Granularity, Run};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::provider::{ProviderRequest, Translator};

/// 单个文本段的失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub run: usize,
    pub query: String,
    pub error: TranslationError,
}

/// 批次执行结果
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// 与输入文本段一一对应，`None` 表示该段翻译失败
    pub translations: Vec<Option<String>>,
    /// 检测到的源语言样本
    pub languages: Vec<String>,
    pub failures: Vec<RunFailure>,
    pub calls: usize,
}

/// 批次策略
pub trait BatchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// 该策略要求的文本段切分粒度
    fn granularity(&self) -> Granularity;

    fn execute<'a>(
        &'a self,
        translator: &'a dyn Translator,
        runs: &'a [Run],
        to: &'a str,
        region: &'a str,
    ) -> BoxFuture<'a, TranslationResult<BatchOutcome>>;
}

/// 批量模式
#[derive(Debug, Clone, Copy, Default)]
pub struct Batched;

impl Batched {
    async fn run(
        &self,
        translator: &dyn Translator,
        runs: &[Run],
        to: &str,
        region: &str,
    ) -> TranslationResult<BatchOutcome> {
        if runs.is_empty() {
            return Err(TranslationError::NothingToTranslate);
        }

        let query = runs
            .iter()
            .map(|run| run.query.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let output = translator
            .translate(ProviderRequest::new(query, to, region))
            .await?;

        let lines: Vec<&str> = output.text.split('\n').collect();
        if lines.len() != runs.len() {
            tracing::warn!(
                "译文行数不匹配: 发送 {} 行, 收到 {} 行",
                runs.len(),
                lines.len()
            );
            return Err(TranslationError::AlignmentMismatch {
                expected: runs.len(),
                actual: lines.len(),
            });
        }

        Ok(BatchOutcome {
            translations: lines.into_iter().map(|line| Some(line.to_string())).collect(),
            // 整个批次只有一个语言样本
            languages: vec![output.source_language],
            failures: Vec::new(),
            calls: 1,
        })
    }
}

impl BatchStrategy for Batched {
    fn name(&self) -> &'static str {
        "batched"
    }

    fn granularity(&self) -> Granularity {
        Granularity::PerLine
    }

    fn execute<'a>(
        &'a self,
        translator: &'a dyn Translator,
        runs: &'a [Run],
        to: &'a str,
        region: &'a str,
    ) -> BoxFuture<'a, TranslationResult<BatchOutcome>> {
        self.run(translator, runs, to, region).boxed()
    }
}

/// 非批量模式
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbatched;

impl Unbatched {
    async fn run(
        &self,
        translator: &dyn Translator,
        runs: &[Run],
        to: &str,
        region: &str,
    ) -> TranslationResult<BatchOutcome> {
        if runs.is_empty() {
            return Err(TranslationError::NothingToTranslate);
        }

        let futures = runs
            .iter()
            .map(|run| translator.translate(ProviderRequest::new(run.query.clone(), to, region)));
        let results = join_all(futures).await;

        let mut outcome = BatchOutcome {
            calls: runs.len(),
            ..Default::default()
        };

        for (index, (run, result)) in runs.iter().zip(results).enumerate() {
            match result {
                Ok(output) => {
                    outcome.languages.push(output.source_language);
                    outcome.translations.push(Some(output.text));
                }
                Err(error) => {
                    tracing::warn!("文本段 {} 翻译失败: {}", index, error);
                    outcome.translations.push(None);
                    outcome.failures.push(RunFailure {
                        run: index,
                        query: run.query.clone(),
                        error,
                    });
                }
            }
        }

        if outcome.failures.len() == runs.len() {
            return Err(TranslationError::AllRunsFailed(runs.len()));
        }

        Ok(outcome)
    }
}

impl BatchStrategy for Unbatched {
    fn name(&self) -> &'static str {
        "unbatched"
    }

    fn granularity(&self) -> Granularity {
        Granularity::PerNode
    }

    fn execute<'a>(
        &'a self,
        translator: &'a dyn Translator,
        runs: &'a [Run],
        to: &'a str,
        region: &'a str,
    ) -> BoxFuture<'a, TranslationResult<BatchOutcome>> {
        self.run(translator, runs, to, region).boxed()
    }
}

/// 根据批量开关选择策略
pub fn select_strategy(batch: bool) -> &'static dyn BatchStrategy {
    if batch {
        &Batched
    } else {
        &Unbatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::fragment::Fragment;
    use crate::translation::pipeline::collector::RunExtractor;
    use crate::translation::pipeline::walker::TreeWalker;
    use crate::translation::provider::TranslationOutput;
    use std::sync::Mutex;

    /// 按查询内容决定结果的测试翻译器
    struct Scripted {
        queries: Mutex<Vec<String>>,
        reply: fn(&str) -> TranslationResult<TranslationOutput>,
    }

    impl Scripted {
        fn new(reply: fn(&str) -> TranslationResult<TranslationOutput>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                reply,
            }
        }
    }

    impl Translator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn fetch(
            &self,
            request: ProviderRequest,
        ) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
            self.queries.lock().unwrap().push(request.query.clone());
            let result = (self.reply)(&request.query);
            async move { result }.boxed()
        }
    }

    fn runs_for(html: &str, granularity: Granularity) -> Vec<Run> {
        let fragment = Fragment::parse(html).unwrap();
        let nodes = TreeWalker::new().walk(&fragment);
        RunExtractor::new(granularity).extract(&fragment, &nodes)
    }

    #[tokio::test]
    async fn test_batched_joins_lines_into_one_call() {
        let translator = Scripted::new(|query| {
            Ok(TranslationOutput::new(query.to_uppercase(), "en"))
        });
        let runs = runs_for("<p>one\ntwo</p><p>three</p>", Granularity::PerLine);

        let outcome = Batched.execute(&translator, &runs, "fr", "com").await.unwrap();

        assert_eq!(outcome.calls, 1);
        assert_eq!(*translator.queries.lock().unwrap(), vec!["one\ntwo\nthree"]);
        assert_eq!(outcome.languages, vec!["en"]);
        assert_eq!(
            outcome.translations,
            vec![
                Some("ONE".to_string()),
                Some("TWO".to_string()),
                Some("THREE".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_batched_detects_misalignment() {
        let translator = Scripted::new(|_| Ok(TranslationOutput::new("only one line", "en")));
        let runs = runs_for("<p>a</p><p>b</p>", Granularity::PerLine);

        let error = Batched
            .execute(&translator, &runs, "fr", "com")
            .await
            .unwrap_err();

        assert_eq!(
            error,
            TranslationError::AlignmentMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[tokio::test]
    async fn test_empty_runs_are_nothing_to_translate() {
        let translator = Scripted::new(|_| Ok(TranslationOutput::default()));

        for strategy in [select_strategy(true), select_strategy(false)] {
            let error = strategy
                .execute(&translator, &[], "fr", "com")
                .await
                .unwrap_err();
            assert_eq!(error, TranslationError::NothingToTranslate);
        }
        assert!(translator.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unbatched_records_partial_failures() {
        let translator = Scripted::new(|query| {
            if query == "bad" {
                Err(TranslationError::ProviderError("boom".to_string()))
            } else {
                Ok(TranslationOutput::new(format!("[{}]", query), "de"))
            }
        });
        let runs = runs_for("<p>good</p><p>bad</p><p>fine</p>", Granularity::PerNode);

        let outcome = Unbatched
            .execute(&translator, &runs, "en", "com")
            .await
            .unwrap();

        assert_eq!(outcome.calls, 3);
        assert_eq!(outcome.languages, vec!["de", "de"]);
        assert_eq!(outcome.translations[1], None);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].run, 1);
        assert_eq!(outcome.failures[0].query, "bad");
    }

    #[tokio::test]
    async fn test_unbatched_all_failed() {
        let translator =
            Scripted::new(|_| Err(TranslationError::ProviderError("down".to_string())));
        let runs = runs_for("<p>a</p><p>b</p>", Granularity::PerNode);

        let error = Unbatched
            .execute(&translator, &runs, "en", "com")
            .await
            .unwrap_err();

        assert_eq!(error, TranslationError::AllRunsFailed(2));
        assert_eq!(error.to_string(), "All translation failed");
    }

    #[test]
    fn test_select_strategy() {
        assert_eq!(select_strategy(true).name(), "batched");
        assert_eq!(select_strategy(true).granularity(), Granularity::PerLine);
        assert_eq!(select_strategy(false).name(), "unbatched");
        assert_eq!(select_strategy(false).granularity(), Granularity::PerNode);
    }
}
