use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tokio::time::sleep;
use tracing::debug;

use crate::config::EditorConfig;
use crate::error::Result;
use crate::flow::{ExtractionConfig, TrainingEmail};

static SEARCH_CORPUS: Lazy<Vec<TrainingEmail>> = Lazy::new(|| {
    vec![
        TrainingEmail::new("1", "Order #12345 confirmation", "store@example.com", "2025-07-10"),
        TrainingEmail::new("2", "Your order has shipped", "shipping@example.com", "2025-07-11"),
        TrainingEmail::new(
            "3",
            "Invoice for your recent purchase",
            "billing@example.com",
            "2025-07-12",
        ),
        TrainingEmail::new("4", "Customer feedback requested", "feedback@example.com", "2025-07-13"),
        TrainingEmail::new("5", "Order status update", "support@example.com", "2025-07-14"),
        TrainingEmail::new("6", "Receipt for order #54321", "receipts@example.com", "2025-07-15"),
    ]
});

/// 邮件搜索能力
#[async_trait]
pub trait EmailSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<TrainingEmail>>;
}

/// 模拟搜索：固定延迟后从内置邮件中按关键词过滤
///
/// 没有任何匹配时返回全部邮件。
#[derive(Clone, Debug)]
pub struct MockEmailSearch {
    delay: Duration,
    corpus: Vec<TrainingEmail>,
}

impl MockEmailSearch {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            corpus: SEARCH_CORPUS.clone(),
        }
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self::new(config.search_delay())
    }

    pub fn with_corpus(mut self, corpus: Vec<TrainingEmail>) -> Self {
        self.corpus = corpus;
        self
    }
}

impl Default for MockEmailSearch {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default())
    }
}

#[async_trait]
impl EmailSearch for MockEmailSearch {
    async fn search(&self, query: &str) -> Result<Vec<TrainingEmail>> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        sleep(self.delay).await;

        let matches: Vec<TrainingEmail> = self
            .corpus
            .iter()
            .filter(|email| {
                let subject = email.subject.to_lowercase();
                let from = email.from.to_lowercase();
                terms
                    .iter()
                    .any(|term| subject.contains(term.as_str()) || from.contains(term.as_str()))
            })
            .cloned()
            .collect();

        debug!(query, hits = matches.len(), "mock search finished");
        if matches.is_empty() {
            Ok(self.corpus.clone())
        } else {
            Ok(matches)
        }
    }
}

/// 搜索结果上的勾选状态
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailSelection {
    results: Vec<TrainingEmail>,
}

impl EmailSelection {
    /// 已在训练集中的邮件会被标记为选中
    pub fn from_results(results: Vec<TrainingEmail>, already_selected: &[TrainingEmail]) -> Self {
        let results = results
            .into_iter()
            .map(|mut email| {
                email.selected = already_selected.iter().any(|chosen| chosen.id == email.id);
                email
            })
            .collect();
        Self { results }
    }

    pub fn results(&self) -> &[TrainingEmail] {
        &self.results
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.results.iter_mut().find(|email| email.id == id) {
            Some(email) => {
                email.selected = !email.selected;
                true
            }
            None => false,
        }
    }

    pub fn all_selected(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|email| email.selected)
    }

    /// 全选；已全选时则全部取消
    pub fn toggle_all(&mut self) {
        let select = !self.all_selected();
        for email in &mut self.results {
            email.selected = select;
        }
    }

    pub fn selected(&self) -> Vec<TrainingEmail> {
        self.results
            .iter()
            .filter(|email| email.selected)
            .cloned()
            .collect()
    }

    /// 写回抽取配置的训练邮件
    pub fn apply_to(&self, extraction: &mut ExtractionConfig) {
        extraction.set_training_emails(self.selected());
    }
}
