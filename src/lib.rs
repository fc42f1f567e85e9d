pub mod config;
pub mod error;
pub mod flow;
pub mod services;
pub mod utils;

pub use config::{EditorConfig, EnvConfig};
pub use error::{MailFlowError, Result, SubmissionError};
pub use flow::{
    ActionBlock, ActionMode, ActionPatch, Advisory, AgentKind, AgentPatch, AgentSettings,
    AiAction, AiModel, Block, BlockBody, BlockId, BlockKind, BlockPatch, ClassificationConfig,
    ConditionBlock, ConditionMode, ConditionPatch, ExtractionConfig, ExtractionField,
    ExtractionSource, ExtractionSources, Flow, FlowAdvisor, FlowBuilder, FlowEditor, FlowId,
    Predicate, PredicateField, SentimentBand, SentimentConfig, StandardAction, TrainingEmail,
    Trigger,
};
pub use services::{
    sample_inbox, AssistChat, AssistSession, CannedAssistant, ConsoleSubmitter, EmailSearch,
    EmailSelection, FlowSubmitter, MockEmailSearch, SimulatedTestHarness, StepStatus,
    TestHarness, TestRun,
};
pub use utils::{logging, validation};
