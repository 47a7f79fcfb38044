// 集成测试公共模块
//
// 提供可编排的测试翻译器和 HTML 辅助工具

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use markup5ever_rcdom::{Handle, NodeData};

use translation_bridge::parsers::html::dom::html_to_dom;
use translation_bridge::translation::error::{TranslationError, TranslationResult};
use translation_bridge::translation::language::LanguageShare;
use translation_bridge::translation::provider::{ProviderRequest, TranslationOutput, Translator};
use translation_bridge::translation::{TranslationConfig, TranslationService};

type Reply = dyn Fn(&ProviderRequest) -> TranslationResult<TranslationOutput> + Send + Sync;

/// 按脚本返回结果的翻译器，记录收到的每个请求
pub struct ScriptedTranslator {
    reply: Box<Reply>,
    requests: Mutex<Vec<ProviderRequest>>,
}

#[allow(dead_code)]
impl ScriptedTranslator {
    pub fn from_fn<F>(reply: F) -> Arc<Self>
    where
        F: Fn(&ProviderRequest) -> TranslationResult<TranslationOutput> + Send + Sync + 'static,
    {
        Arc::new(Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 每次返回相同的译文
    pub fn fixed(text: &'static str, language: &'static str) -> Arc<Self> {
        Self::from_fn(move |_| Ok(TranslationOutput::new(text, language)))
    }

    /// 每行加上方括号
    pub fn bracket(language: &'static str) -> Arc<Self> {
        Self::from_fn(move |request| {
            let text = request
                .query
                .split('\n')
                .map(|line| format!("[{}]", line))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(TranslationOutput::new(text, language))
        })
    }

    /// 所有请求都失败
    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::from_fn(move |_| Err(TranslationError::ProviderError(message.to_string())))
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.query.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Translator for ScriptedTranslator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, request: ProviderRequest) -> BoxFuture<'_, TranslationResult<TranslationOutput>> {
        let result = (self.reply)(&request);
        self.requests.lock().unwrap().push(request);
        async move { result }.boxed()
    }
}

/// 测试环境
pub struct TestEnvironment {
    pub translator: Arc<ScriptedTranslator>,
    pub service: TranslationService,
}

#[allow(dead_code)]
impl TestEnvironment {
    pub fn new(translator: Arc<ScriptedTranslator>) -> Self {
        Self::with_config(translator, TranslationConfig::default())
    }

    pub fn with_config(translator: Arc<ScriptedTranslator>, config: TranslationConfig) -> Self {
        let service = TranslationService::new(config, translator.clone())
            .expect("default config should be valid");

        Self {
            translator,
            service,
        }
    }
}

/// HTML 测试辅助工具
pub struct HtmlTestHelper;

#[allow(dead_code)]
impl HtmlTestHelper {
    /// 片段中所有元素的标签和属性，形如 `a[href=/x]`
    pub fn element_signatures(html: &str) -> BTreeSet<String> {
        let dom = html_to_dom(html);
        let mut signatures = BTreeSet::new();
        Self::collect_signatures(&dom.document, &mut signatures);
        signatures
    }

    fn collect_signatures(node: &Handle, signatures: &mut BTreeSet<String>) {
        if let NodeData::Element { name, attrs, .. } = &node.data {
            let mut attributes: Vec<String> = attrs
                .borrow()
                .iter()
                .map(|attr| format!("{}={}", attr.name.local, attr.value))
                .collect();
            attributes.sort();
            signatures.insert(format!("{}[{}]", name.local, attributes.join(",")));
        }

        for child in node.children.borrow().iter() {
            Self::collect_signatures(child, signatures);
        }
    }

    /// 典型的社交平台帖子
    pub fn status_post() -> &'static str {
        concat!(
            r#"<p>Reading about <a href="https://example.social/tags/rust" class="mention hashtag" rel="tag">#<span>rust</span></a> "#,
            r#"with <span class="h-card"><a href="https://example.social/@alice" class="u-url mention">@<span>alice</span></a></span> today</p>"#,
            r#"<p><a href="https://blog.example.com/posts/ownership" rel="nofollow noopener noreferrer" target="_blank">"#,
            r#"<span class="invisible">https://</span><span class="ellipsis">blog.example.com/posts/owne</span><span class="invisible">rship</span></a></p>"#,
        )
    }
}

/// 断言辅助工具
pub struct AssertionHelper;

#[allow(dead_code)]
impl AssertionHelper {
    /// 百分比之和在舍入误差内为 100%，每项至少 0.1%，按次数不增排列
    pub fn assert_valid_shares(shares: &[LanguageShare]) {
        let values: Vec<f64> = shares
            .iter()
            .map(|share| {
                share
                    .percentage
                    .trim_end_matches('%')
                    .parse::<f64>()
                    .expect("percentage should be numeric")
            })
            .collect();

        let sum: f64 = values.iter().sum();
        assert!(
            (sum - 100.0).abs() <= 0.1 * shares.len() as f64,
            "percentages should sum to ~100%, got {}",
            sum
        );
        assert!(values.iter().all(|value| *value >= 0.1));
        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
