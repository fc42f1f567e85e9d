use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::error::SubmissionError;
use crate::flow::constants::prefixes;
use crate::flow::{Flow, FlowId};
use crate::utils::next_id;

/// 提交 Flow 到后端的边界
#[async_trait]
pub trait FlowSubmitter: Send + Sync {
    async fn submit_flow(&self, flow: &Flow) -> Result<FlowId, SubmissionError>;
}

/// 只把 Flow 结构输出到日志
#[derive(Default)]
pub struct ConsoleSubmitter {
    submitted: Mutex<Vec<(FlowId, String)>>,
}

impl ConsoleSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已提交的 (ID, JSON) 记录
    pub fn submissions(&self) -> Vec<(FlowId, String)> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl FlowSubmitter for ConsoleSubmitter {
    async fn submit_flow(&self, flow: &Flow) -> Result<FlowId, SubmissionError> {
        if flow.name.trim().is_empty() {
            return Err(SubmissionError::BlankName);
        }
        if flow.blocks.is_empty() {
            return Err(SubmissionError::Rejected(format!(
                "flow `{}` has no blocks",
                flow.name
            )));
        }
        let dump = serde_json::to_string_pretty(flow)?;
        let id = FlowId(next_id(prefixes::FLOW));
        info!(id = %id, flow = %dump, "saving automation");
        self.submitted.lock().push((id.clone(), dump));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_json_dump() {
        let submitter = ConsoleSubmitter::new();
        let id = submitter.submit_flow(&Flow::new("Invoices")).await.unwrap();
        let submissions = submitter.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].0, id);
        let value: serde_json::Value = serde_json::from_str(&submissions[0].1).unwrap();
        assert_eq!(value["name"], "Invoices");
        assert_eq!(value["blocks"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let submitter = ConsoleSubmitter::new();
        let err = submitter.submit_flow(&Flow::new("  ")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::BlankName));
        assert!(submitter.submissions().is_empty());
    }

    #[tokio::test]
    async fn empty_block_list_is_rejected() {
        let submitter = ConsoleSubmitter::new();
        let mut flow = Flow::new("Hand-built");
        flow.blocks.clear();
        let err = submitter.submit_flow(&flow).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Rejected(reason) if reason.contains("Hand-built")));
        assert!(submitter.submissions().is_empty());
    }
}
