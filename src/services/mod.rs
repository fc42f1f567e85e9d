// 模拟服务：测试运行、助手对话、邮件搜索、洞察与提交
//
// 每个能力都是一个异步 trait，模拟实现可以直接替换为真实后端。

pub mod assist;
pub mod insights;
pub mod search;
pub mod submit;
pub mod test_harness;

pub use assist::{AssistChat, AssistSession, CannedAssistant, ChatMessage, ChatRole, Suggestion};
pub use insights::{Insights, InsightsPanel};
pub use search::{EmailSearch, EmailSelection, MockEmailSearch};
pub use submit::{ConsoleSubmitter, FlowSubmitter};
pub use test_harness::{
    sample_inbox, SampleEmail, SimulatedTestHarness, StepStatus, TestHarness, TestRun, TestStep,
};
