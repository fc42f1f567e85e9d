use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::agents::{AgentKind, AgentSettings};
use super::constants::{predicates, prefixes};
use crate::utils::next_id;

// Block 类型定义：条件（If）与动作（Then）

pub type BlockId = String;

/// Block 种类
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Condition,
    Action,
}

/// Flow 中的一个 Block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub body: BlockBody,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockBody {
    Condition(ConditionBlock),
    Action(ActionBlock),
}

impl Block {
    /// 按种类创建带默认值的新 Block
    pub fn new(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Condition => Self::condition(ConditionBlock::default()),
            BlockKind::Action => Self::action(ActionBlock::default()),
        }
    }

    pub fn condition(block: ConditionBlock) -> Self {
        Self {
            id: next_id(prefixes::CONDITION_BLOCK),
            body: BlockBody::Condition(block),
        }
    }

    pub fn action(block: ActionBlock) -> Self {
        Self {
            id: next_id(prefixes::ACTION_BLOCK),
            body: BlockBody::Action(block),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self.body {
            BlockBody::Condition(_) => BlockKind::Condition,
            BlockBody::Action(_) => BlockKind::Action,
        }
    }

    pub fn as_condition(&self) -> Option<&ConditionBlock> {
        match &self.body {
            BlockBody::Condition(block) => Some(block),
            BlockBody::Action(_) => None,
        }
    }

    pub fn as_action(&self) -> Option<&ActionBlock> {
        match &self.body {
            BlockBody::Action(block) => Some(block),
            BlockBody::Condition(_) => None,
        }
    }

    pub fn as_condition_mut(&mut self) -> Option<&mut ConditionBlock> {
        match &mut self.body {
            BlockBody::Condition(block) => Some(block),
            BlockBody::Action(_) => None,
        }
    }

    pub fn as_action_mut(&mut self) -> Option<&mut ActionBlock> {
        match &mut self.body {
            BlockBody::Action(block) => Some(block),
            BlockBody::Condition(_) => None,
        }
    }
}

/// 条件字段
///
/// 序列化为 `subject-contains`、`from-email`、`body-contains` 或 `extracted:<name>`。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PredicateField {
    SubjectContains,
    FromEmail,
    BodyContains,
    Extracted(String),
}

impl PredicateField {
    pub const STANDARD: [PredicateField; 3] = [
        PredicateField::SubjectContains,
        PredicateField::FromEmail,
        PredicateField::BodyContains,
    ];

    pub fn label(&self) -> String {
        match self {
            PredicateField::SubjectContains => "Subject contains".to_string(),
            PredicateField::FromEmail => "From email".to_string(),
            PredicateField::BodyContains => "Body contains".to_string(),
            PredicateField::Extracted(name) => format!("Extracted {name} contains"),
        }
    }
}

impl fmt::Display for PredicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateField::SubjectContains => f.write_str(predicates::SUBJECT_CONTAINS),
            PredicateField::FromEmail => f.write_str(predicates::FROM_EMAIL),
            PredicateField::BodyContains => f.write_str(predicates::BODY_CONTAINS),
            PredicateField::Extracted(name) => {
                write!(f, "{}{}", predicates::EXTRACTED_PREFIX, name)
            }
        }
    }
}

impl FromStr for PredicateField {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            predicates::SUBJECT_CONTAINS => Ok(PredicateField::SubjectContains),
            predicates::FROM_EMAIL => Ok(PredicateField::FromEmail),
            predicates::BODY_CONTAINS => Ok(PredicateField::BodyContains),
            other => other
                .strip_prefix(predicates::EXTRACTED_PREFIX)
                .map(|name| PredicateField::Extracted(name.to_string()))
                .ok_or_else(|| format!("unknown predicate field `{other}`")),
        }
    }
}

impl From<PredicateField> for String {
    fn from(field: PredicateField) -> Self {
        field.to_string()
    }
}

impl TryFrom<String> for PredicateField {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// 单条匹配条件
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: String,
    pub field: Option<PredicateField>,
    pub value: String,
}

impl Predicate {
    pub fn blank() -> Self {
        Self {
            id: next_id(prefixes::PREDICATE),
            field: None,
            value: String::new(),
        }
    }

    pub fn new(field: PredicateField, value: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            value: value.into(),
            ..Self::blank()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionMode {
    #[default]
    Standard,
    AiAgent,
}

/// 条件 Block
///
/// `mode` 只决定展示哪一组配置；切换模式不会清除另一组的内容。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionBlock {
    pub mode: ConditionMode,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
    #[serde(default)]
    pub agent: AgentSettings,
}

impl ConditionBlock {
    pub fn standard<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        Self {
            predicates: predicates.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn ai_agent(kind: AgentKind) -> Self {
        let mut block = Self {
            mode: ConditionMode::AiAgent,
            ..Self::default()
        };
        block.agent.kind = Some(kind);
        block
    }

    pub fn set_mode(&mut self, mode: ConditionMode) {
        self.mode = mode;
    }

    /// 追加一条空条件，返回其 ID
    pub fn add_predicate(&mut self) -> String {
        let predicate = Predicate::blank();
        let id = predicate.id.clone();
        self.predicates.push(predicate);
        id
    }

    pub fn remove_predicate(&mut self, id: &str) -> bool {
        let before = self.predicates.len();
        self.predicates.retain(|predicate| predicate.id != id);
        self.predicates.len() != before
    }

    pub fn set_predicate_field(&mut self, id: &str, field: PredicateField) -> bool {
        self.predicate_mut(id)
            .map(|predicate| predicate.field = Some(field))
            .is_some()
    }

    pub fn set_predicate_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.predicate_mut(id)
            .map(|predicate| predicate.value = value.into())
            .is_some()
    }

    pub fn select_agent(&mut self, kind: AgentKind) {
        self.agent.kind = Some(kind);
    }

    fn predicate_mut(&mut self, id: &str) -> Option<&mut Predicate> {
        self.predicates.iter_mut().find(|predicate| predicate.id == id)
    }
}

/// 标准动作
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardAction {
    SendEmail,
    AddLabel,
    AssignTo,
    CreateTask,
}

impl StandardAction {
    pub const ALL: [StandardAction; 4] = [
        StandardAction::SendEmail,
        StandardAction::AddLabel,
        StandardAction::AssignTo,
        StandardAction::CreateTask,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StandardAction::SendEmail => "Send email",
            StandardAction::AddLabel => "Add label",
            StandardAction::AssignTo => "Assign to",
            StandardAction::CreateTask => "Create task",
        }
    }
}

/// AI 动作
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiAction {
    Summarize,
    DraftResponse,
    Categorize,
    Sentiment,
    CustomPrompt,
}

impl AiAction {
    pub const ALL: [AiAction; 5] = [
        AiAction::Summarize,
        AiAction::DraftResponse,
        AiAction::Categorize,
        AiAction::Sentiment,
        AiAction::CustomPrompt,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AiAction::Summarize => "Summarize",
            AiAction::DraftResponse => "Draft Response",
            AiAction::Categorize => "Categorize",
            AiAction::Sentiment => "Sentiment Analysis",
            AiAction::CustomPrompt => "Custom Prompt",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AiAction::Summarize => "Create a concise summary of the conversation",
            AiAction::DraftResponse => "Generate a response based on conversation context",
            AiAction::Categorize => "Analyze and categorize the conversation type",
            AiAction::Sentiment => "Detect customer sentiment from conversation",
            AiAction::CustomPrompt => "Create your own AI instruction",
        }
    }
}

/// 自定义提示使用的模型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiModel {
    #[default]
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "claude-3")]
    Claude3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionMode {
    #[default]
    Standard,
    Ai,
}

/// 动作 Block
///
/// 标准模式只保存一个动作。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionBlock {
    pub mode: ActionMode,
    #[serde(default)]
    pub standard_action: Option<StandardAction>,
    #[serde(default)]
    pub ai_action: Option<AiAction>,
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default)]
    pub model: AiModel,
    #[serde(default)]
    pub agent: AgentSettings,
}

impl ActionBlock {
    pub fn standard(action: StandardAction) -> Self {
        Self {
            standard_action: Some(action),
            ..Self::default()
        }
    }

    pub fn ai(action: AiAction) -> Self {
        Self {
            mode: ActionMode::Ai,
            ai_action: Some(action),
            ..Self::default()
        }
    }

    /// AI 模式下的抽取 Agent
    pub fn extraction_agent(fields: super::agents::ExtractionConfig) -> Self {
        let mut block = Self {
            mode: ActionMode::Ai,
            ..Self::default()
        };
        block.agent.kind = Some(AgentKind::Extraction);
        block.agent.extraction = fields;
        block
    }

    pub fn set_mode(&mut self, mode: ActionMode) {
        self.mode = mode;
    }

    pub fn select_standard_action(&mut self, action: StandardAction) {
        self.standard_action = Some(action);
    }

    pub fn select_ai_action(&mut self, action: AiAction) {
        self.ai_action = Some(action);
    }

    pub fn set_custom_prompt(&mut self, prompt: impl Into<String>) {
        self.custom_prompt = prompt.into();
    }

    pub fn select_agent(&mut self, kind: AgentKind) {
        self.agent.kind = Some(kind);
    }

    /// 仅在选择了自定义提示时返回提示文本
    pub fn prompt(&self) -> Option<&str> {
        match self.ai_action {
            Some(AiAction::CustomPrompt) => Some(self.custom_prompt.as_str()),
            _ => None,
        }
    }

    /// 该 Block 声明的抽取字段名（仅 AI 模式下的抽取 Agent）
    pub fn declared_extraction_fields(&self) -> impl Iterator<Item = &str> {
        let active = self.mode == ActionMode::Ai && self.agent.is_extraction();
        self.agent
            .extraction
            .field_names()
            .filter(move |_| active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::agents::{ExtractionConfig, ExtractionField};

    #[test]
    fn predicate_field_wire_names() {
        assert_eq!(PredicateField::SubjectContains.to_string(), "subject-contains");
        assert_eq!(
            "extracted:OrderNumber".parse::<PredicateField>().unwrap(),
            PredicateField::Extracted("OrderNumber".into())
        );
        assert!("to-email".parse::<PredicateField>().is_err());
        assert_eq!(
            PredicateField::Extracted("OrderNumber".into()).label(),
            "Extracted OrderNumber contains"
        );
    }

    #[test]
    fn block_serializes_with_kind_tag() {
        let block = Block::action(ActionBlock::standard(StandardAction::AddLabel));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["kind"], "action");
        assert_eq!(value["mode"], "standard");
        assert_eq!(value["standard_action"], "add-label");

        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn mode_switch_keeps_predicates() {
        let mut block = ConditionBlock::standard([Predicate::new(
            PredicateField::SubjectContains,
            "invoice",
        )]);
        let before = block.predicates.clone();
        block.set_mode(ConditionMode::AiAgent);
        block.select_agent(AgentKind::Sentiment);
        block.set_mode(ConditionMode::Standard);
        assert_eq!(block.predicates, before);
        assert_eq!(block.agent.kind, Some(AgentKind::Sentiment));
    }

    #[test]
    fn predicate_edits_target_by_id() {
        let mut block = ConditionBlock::default();
        let first = block.add_predicate();
        let second = block.add_predicate();
        assert!(block.set_predicate_field(&second, PredicateField::FromEmail));
        assert!(block.set_predicate_value(&second, "billing@example.com"));
        assert!(block.predicates[0].field.is_none());
        assert!(block.remove_predicate(&first));
        assert!(!block.remove_predicate(&first));
        assert_eq!(block.predicates.len(), 1);
        assert_eq!(block.predicates[0].value, "billing@example.com");
    }

    #[test]
    fn prompt_only_for_custom_prompt_action() {
        let mut block = ActionBlock::ai(AiAction::Summarize);
        block.set_custom_prompt("Reply politely");
        assert_eq!(block.prompt(), None);
        block.select_ai_action(AiAction::CustomPrompt);
        assert_eq!(block.prompt(), Some("Reply politely"));
    }

    #[test]
    fn extraction_fields_only_declared_in_ai_mode() {
        let mut block = ActionBlock::extraction_agent(ExtractionConfig::with_fields([
            ExtractionField::named("OrderNumber"),
        ]));
        assert_eq!(
            block.declared_extraction_fields().collect::<Vec<_>>(),
            vec!["OrderNumber"]
        );
        block.set_mode(ActionMode::Standard);
        assert_eq!(block.declared_extraction_fields().count(), 0);
        block.set_mode(ActionMode::Ai);
        block.select_agent(AgentKind::Classification);
        assert_eq!(block.declared_extraction_fields().count(), 0);
    }
}
