//! 请求诊断记录
//!
//! 每个请求结束时输出一行 JSON：成功时为 debug 级别，失败时为 error 级别。

use serde::Serialize;

use super::request::TranslateRequest;
use crate::translation::error::TranslationError;

/// 单条上游错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEntry {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub to: String,
    pub tld: String,
}

/// 请求诊断
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
    pub batch: bool,
    pub tld: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DiagnosticEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Diagnostics {
    pub fn new(request: &TranslateRequest, tld: &str, batch: bool) -> Self {
        Self {
            to: request.target().to_string(),
            status: request.status.clone(),
            edit: request.edit.clone(),
            batch,
            tld: tld.to_string(),
            errors: Vec::new(),
            error: None,
            content: None,
        }
    }

    /// 记录一次可恢复的错误
    pub fn record(&mut self, error: &TranslationError, query: Option<&str>) {
        self.errors.push(DiagnosticEntry {
            error: error.to_string(),
            query: query.map(str::to_string),
            to: self.to.clone(),
            tld: self.tld.clone(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }

    /// 请求成功，开发模式下附带正文
    pub fn finish(mut self, content: &str, development: bool) {
        if development {
            self.content = Some(content.to_string());
        }
        tracing::debug!("{}", self.to_json());
    }

    /// 请求失败，总是附带正文
    pub fn fail(mut self, error: &TranslationError, content: &str) {
        self.error = Some(error.to_string());
        self.content = Some(content.to_string());
        tracing::error!("{}", self.to_json());
    }
}
