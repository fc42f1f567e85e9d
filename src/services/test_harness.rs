use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::config::EditorConfig;
use crate::error::{MailFlowError, Result};
use crate::flow::constants::test_run;
use crate::flow::Flow;

/// 测试面板中可选的示例邮件
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleEmail {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub time: String,
    pub tag: String,
}

impl SampleEmail {
    fn new(id: &str, subject: &str, from: &str, time: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            subject: subject.to_string(),
            from: from.to_string(),
            time: time.to_string(),
            tag: tag.to_string(),
        }
    }
}

static SAMPLE_INBOX: Lazy<Vec<SampleEmail>> = Lazy::new(|| {
    vec![
        SampleEmail::new("1", "Security alert", "security@example.com", "9h ago", "Support"),
        SampleEmail::new(
            "2",
            "Kiran, finish setting up your OnePlus 9 Pro 5G",
            "support@oneplus.com",
            "2w ago",
            "Support",
        ),
        SampleEmail::new("3", "Account Activation", "noreply@example.com", "2w ago", "Support"),
        SampleEmail::new("4", "Email ID Verification", "verify@example.com", "2w ago", "Support"),
    ]
});

/// 内置的示例收件箱
pub fn sample_inbox() -> &'static [SampleEmail] {
    &SAMPLE_INBOX
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub step: String,
    pub status: StepStatus,
}

fn pending_steps() -> Vec<TestStep> {
    test_run::STEPS
        .iter()
        .map(|step| TestStep {
            step: step.to_string(),
            status: StepStatus::Pending,
        })
        .collect()
}

/// 一次测试运行的结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestRun {
    pub flow_name: String,
    pub email: SampleEmail,
    pub steps: Vec<TestStep>,
}

impl TestRun {
    pub fn passed(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.status == StepStatus::Success)
    }
}

/// 测试运行能力；真实后端可以替换模拟实现
#[async_trait]
pub trait TestHarness: Send + Sync {
    async fn run_test(&self, flow: &Flow, email_id: &str) -> Result<TestRun>;
}

/// 模拟测试：三个步骤依次在固定延迟后变为成功
pub struct SimulatedTestHarness {
    inbox: Vec<SampleEmail>,
    step_delay: Duration,
    progress: watch::Sender<Vec<TestStep>>,
}

impl SimulatedTestHarness {
    pub fn new(step_delay: Duration) -> Self {
        let (progress, _) = watch::channel(pending_steps());
        Self {
            inbox: sample_inbox().to_vec(),
            step_delay,
            progress,
        }
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self::new(config.test_step_delay())
    }

    pub fn with_inbox(mut self, inbox: Vec<SampleEmail>) -> Self {
        self.inbox = inbox;
        self
    }

    pub fn inbox(&self) -> &[SampleEmail] {
        &self.inbox
    }

    /// 订阅步骤进度
    pub fn subscribe(&self) -> watch::Receiver<Vec<TestStep>> {
        self.progress.subscribe()
    }

    /// 以流的形式观察后续的进度快照
    pub fn progress_stream(&self) -> impl Stream<Item = Vec<TestStep>> + Send + 'static {
        futures::stream::unfold(self.progress.subscribe(), |mut rx| async move {
            rx.changed().await.ok()?;
            let snapshot = rx.borrow_and_update().clone();
            Some((snapshot, rx))
        })
    }
}

impl Default for SimulatedTestHarness {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default())
    }
}

#[async_trait]
impl TestHarness for SimulatedTestHarness {
    #[instrument(skip(self, flow), fields(flow = %flow.name))]
    async fn run_test(&self, flow: &Flow, email_id: &str) -> Result<TestRun> {
        let email = self
            .inbox
            .iter()
            .find(|email| email.id == email_id)
            .cloned()
            .ok_or_else(|| MailFlowError::UnknownSampleEmail(email_id.to_string()))?;

        let mut steps = pending_steps();
        self.progress.send_replace(steps.clone());

        for index in 0..steps.len() {
            sleep(self.step_delay).await;
            steps[index].status = StepStatus::Success;
            debug!(step = %steps[index].step, "test step finished");
            self.progress.send_replace(steps.clone());
        }

        Ok(TestRun {
            flow_name: flow.name.clone(),
            email,
            steps,
        })
    }
}
