//! 翻译管道集成测试
//!
//! 测试整个翻译流程的端到端功能

use translation_bridge::translation::language::LanguageTally;
use translation_bridge::translation::provider::TranslationOutput;
use translation_bridge::translation::TranslateRequest;

mod common {
    include!("common/mod.rs");
}

use common::{AssertionHelper, HtmlTestHelper, ScriptedTranslator, TestEnvironment};

/// 换行分隔的两个文本节点合并为一次请求
#[tokio::test]
async fn test_line_break_fragment_batched() {
    let env = TestEnvironment::new(ScriptedTranslator::fixed("Bonjour\nmonde", "en"));

    let response = env
        .service
        .translate(&TranslateRequest::new("<div>Hello<br/>world</div>", "fr").with_locale("en"))
        .await
        .expect("translation should succeed");

    assert_eq!(response.text, "<div>Bonjour<br>monde</div>");
    assert_eq!(response.to, "fr");
    assert_eq!(response.from.len(), 1);
    assert_eq!(response.from[0].language, "en");
    assert_eq!(response.from[0].percentage, "100%");
    assert_eq!(response.from[0].display_name, "English");

    assert_eq!(env.translator.queries(), vec!["Hello\nworld"]);
    let request = &env.translator.requests()[0];
    assert_eq!(request.to, "fr");
    assert_eq!(request.region, "com");
}

/// 话题标签的 `#` 不进入查询
#[tokio::test]
async fn test_hashtag_symbol_not_sent() {
    let env = TestEnvironment::new(ScriptedTranslator::bracket("en"));

    let response = env
        .service
        .translate(&TranslateRequest::new(
            r#"<p><a href="https://example.social/tags/mastodon" class="mention hashtag">#mastodon</a></p>"#,
            "ja",
        ))
        .await
        .unwrap();

    assert_eq!(env.translator.queries(), vec!["mastodon"]);
    assert!(response.text.contains(r#"<span class="hash_char">#</span>[mastodon]"#));
    assert!(!response.text.contains("translation-bypass"));
}

/// 典型帖子：链接装饰和提及不翻译，其余文本保留空格
#[tokio::test]
async fn test_status_post_bypass() {
    let env = TestEnvironment::new(ScriptedTranslator::bracket("en"));
    let html = HtmlTestHelper::status_post();

    let response = env
        .service
        .translate(&TranslateRequest::new(html, "de"))
        .await
        .unwrap();

    assert_eq!(
        env.translator.queries(),
        vec!["Reading about\nrust\nwith\ntoday"]
    );
    assert!(response.text.starts_with("<p>[Reading about] <a "));
    assert!(response.text.contains("<span>[rust]</span>"));
    assert!(response.text.contains(r#"class="u-url mention">@<span>alice</span></a>"#));
    assert!(response.text.contains(r#"<span class="invisible">https://</span>"#));
    assert!(response
        .text
        .contains(r#"<span class="ellipsis">blog.example.com/posts/owne</span>"#));
    assert!(response.text.contains(" [with] "));
    assert!(response.text.contains(" [today]</p>"));
}

/// 没有跳过内容时只有文本改变
#[tokio::test]
async fn test_structure_preserved() {
    let env = TestEnvironment::new(ScriptedTranslator::bracket("en"));
    let html = concat!(
        r#"<p class="lead">Hello <em>there</em>, <strong data-x="1">friend</strong></p>"#,
        r#"<ul><li>one</li><li>two <a href="/x" title="t">link</a></li></ul>"#,
        r#"<blockquote><p>quoted</p></blockquote><code>let x = 1;</code>"#,
    );

    let response = env
        .service
        .translate(&TranslateRequest::new(html, "fr"))
        .await
        .unwrap();

    assert_eq!(
        HtmlTestHelper::element_signatures(html),
        HtmlTestHelper::element_signatures(&response.text)
    );
    assert!(response.text.contains("<code>let x = 1;</code>"));
    assert!(response.text.contains("<em>[there]</em>"));
}

/// 同一节点的多行分别翻译后在原节点内用换行拼接
#[tokio::test]
async fn test_multiline_node_grouping() {
    let env = TestEnvironment::new(ScriptedTranslator::bracket("en"));

    let response = env
        .service
        .translate(&TranslateRequest::new("<p>line1\nline2</p><p>next</p>", "fr"))
        .await
        .unwrap();

    assert_eq!(env.translator.queries(), vec!["line1\nline2\nnext"]);
    assert_eq!(response.text, "<p>[line1]\n[line2]</p><p>[next]</p>");
}

/// 非批量模式每个节点一次请求，每次请求一个语言样本
#[tokio::test]
async fn test_unbatched_language_per_run() {
    let translator = ScriptedTranslator::from_fn(|request| {
        let language = if request.query.starts_with("Bonjour") {
            "fr"
        } else {
            "en"
        };
        Ok(TranslationOutput::new(
            format!("<{}>", request.query),
            language,
        ))
    });
    let env = TestEnvironment::new(translator);

    let response = env
        .service
        .translate(
            &TranslateRequest::new("<p>Hello</p><p>Bonjour</p><p>Hi</p>", "ja")
                .with_batch(false)
                .with_locale("en"),
        )
        .await
        .unwrap();

    assert_eq!(env.translator.calls(), 3);
    assert_eq!(response.from.len(), 2);
    assert_eq!(response.from[0].language, "en");
    assert_eq!(response.from[0].percentage, "66.7%");
    assert_eq!(response.from[1].language, "fr");
    assert_eq!(response.from[1].percentage, "33.3%");
    assert_eq!(response.from[1].display_name, "French");
    AssertionHelper::assert_valid_shares(&response.from);
}

/// 批量模式下整个批次只有一个语言样本
#[tokio::test]
async fn test_batched_single_language_sample() {
    let translator = ScriptedTranslator::from_fn(|request| {
        Ok(TranslationOutput::new(request.query.clone(), "fr"))
    });
    let env = TestEnvironment::new(translator);

    let response = env
        .service
        .translate(&TranslateRequest::new("<p>Hello</p><p>Bonjour</p><p>Hi</p>", "ja"))
        .await
        .unwrap();

    assert_eq!(env.translator.calls(), 1);
    assert_eq!(response.from.len(), 1);
    assert_eq!(response.from[0].language, "fr");
    assert_eq!(response.from[0].percentage, "100%");
}

/// 非批量模式下部分失败的节点保留原文
#[tokio::test]
async fn test_unbatched_partial_failure() {
    let translator = ScriptedTranslator::from_fn(|request| {
        if request.query == "broken" {
            Err(translation_bridge::TranslationError::ProviderError(
                "503".to_string(),
            ))
        } else {
            Ok(TranslationOutput::new(request.query.to_uppercase(), "en"))
        }
    });
    let env = TestEnvironment::new(translator);

    let response = env
        .service
        .translate(&TranslateRequest::new("<p>fine</p><p>broken</p>", "en").with_batch(false))
        .await
        .unwrap();

    assert_eq!(response.text, "<p>FINE</p><p>broken</p>");
    assert_eq!(response.from.len(), 1);
    assert_eq!(response.from[0].language, "en");
}

/// 没有可翻译文本时返回原文和未知语言
#[tokio::test]
async fn test_nothing_to_translate_returns_unknown() {
    let env = TestEnvironment::new(ScriptedTranslator::fixed("Langue inconnue", ""));

    let response = env
        .service
        .translate(&TranslateRequest::new("<p><code>x</code></p>", "de").with_locale("fr"))
        .await
        .unwrap();

    assert_eq!(response.text, "<p><code>x</code></p>");
    assert_eq!(response.from.len(), 1);
    assert!(response.from[0].is_unknown());
    assert_eq!(response.from[0].percentage, "100%");
    assert_eq!(response.from[0].display_name, "Langue inconnue");

    // 只有未知语言名称这一次请求
    let requests = env.translator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "Unknown language");
    assert_eq!(requests[0].to, "fr");
}

/// 未知语言名称翻译失败时使用名称表
#[tokio::test]
async fn test_unknown_display_name_fallback() {
    let env = TestEnvironment::new(ScriptedTranslator::failing("offline"));

    let response = env
        .service
        .translate(&TranslateRequest::new("<p> </p>", "en"))
        .await
        .unwrap();

    assert!(response.from[0].is_unknown());
    assert_eq!(response.from[0].display_name, "Unknown language");
}

/// 上游未返回语言时计入未知语言
#[tokio::test]
async fn test_missing_source_language_is_unknown() {
    let translator = ScriptedTranslator::from_fn(|request| {
        if request.query == "Unknown language" {
            Ok(TranslationOutput::new("未知の言語", "en"))
        } else {
            Ok(TranslationOutput::new(request.query.clone(), ""))
        }
    });
    let env = TestEnvironment::new(translator);

    let response = env
        .service
        .translate(&TranslateRequest::new("<p>???</p>", "ja"))
        .await
        .unwrap();

    assert!(response.from[0].is_unknown());
    assert_eq!(response.from[0].display_name, "未知の言語");
}

/// 任意非空统计的百分比性质
#[test]
fn test_percentage_properties() {
    let samples: &[&[&str]] = &[
        &["en"],
        &["en", "fr", "de"],
        &["en", "en", "en", "ja", "ja", "ko"],
        &["zh-CN", "zh-TW", "zh-CN", "en", "es", "es", "es"],
    ];

    for codes in samples {
        let mut tally = LanguageTally::new();
        tally.extend(codes.iter());
        AssertionHelper::assert_valid_shares(&tally.shares("en"));
    }

    let mut tally = LanguageTally::new();
    tally.extend(std::iter::repeat("en").take(1999).chain(["fr"]));
    let shares = tally.shares("en");
    assert_eq!(shares[1].percentage, "0.1%");
    AssertionHelper::assert_valid_shares(&shares);
}
