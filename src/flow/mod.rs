// Flow 模块 - 自动化流程的数据模型与编辑器

pub mod advisor;
pub mod agents;
pub mod blocks;
pub mod builder;
pub mod constants;
pub mod editor;
pub mod patch;
pub mod types;

// 重新导出核心类型
pub use advisor::{Advisory, FlowAdvisor};
pub use agents::{
    AgentKind, AgentSettings, ClassificationConfig, ExtractionConfig, ExtractionField,
    ExtractionSource, ExtractionSources, SentimentBand, SentimentConfig, SuggestedQuery,
    TrainingEmail,
};
pub use blocks::{
    ActionBlock, ActionMode, AiAction, AiModel, Block, BlockBody, BlockId, BlockKind,
    ConditionBlock, ConditionMode, Predicate, PredicateField, StandardAction,
};
pub use builder::FlowBuilder;
pub use editor::{BlockListener, FlowEditor};
pub use patch::{ActionPatch, AgentPatch, BlockPatch, ConditionPatch};
pub use types::{Flow, FlowId, Trigger};
