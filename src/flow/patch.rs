use serde::{Deserialize, Serialize};

use super::agents::{AgentKind, ClassificationConfig, ExtractionConfig, SentimentConfig};
use super::blocks::{
    ActionBlock, ActionMode, AiAction, AiModel, BlockBody, BlockKind, ConditionBlock,
    ConditionMode, Predicate, StandardAction,
};

// 局部更新：只覆盖 `Some` 的字段（浅合并）

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockPatch {
    Condition(ConditionPatch),
    Action(ActionPatch),
}

impl BlockPatch {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPatch::Condition(_) => BlockKind::Condition,
            BlockPatch::Action(_) => BlockKind::Action,
        }
    }

    /// 合并到 Block；种类不匹配时返回 `false` 且不修改
    pub fn apply_to(self, body: &mut BlockBody) -> bool {
        match (self, body) {
            (BlockPatch::Condition(patch), BlockBody::Condition(block)) => {
                patch.apply_to(block);
                true
            }
            (BlockPatch::Action(patch), BlockBody::Action(block)) => {
                patch.apply_to(block);
                true
            }
            _ => false,
        }
    }
}

impl From<ConditionPatch> for BlockPatch {
    fn from(patch: ConditionPatch) -> Self {
        BlockPatch::Condition(patch)
    }
}

impl From<ActionPatch> for BlockPatch {
    fn from(patch: ActionPatch) -> Self {
        BlockPatch::Action(patch)
    }
}

/// Agent 子表单的局部更新，条件与动作共用
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_kind: Option<AgentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instruction: Option<String>,
}

impl AgentPatch {
    fn apply_to(self, agent: &mut super::agents::AgentSettings) {
        if let Some(kind) = self.agent_kind {
            agent.kind = Some(kind);
        }
        if let Some(extraction) = self.extraction {
            agent.extraction = extraction;
        }
        if let Some(classification) = self.classification {
            agent.classification = classification;
        }
        if let Some(sentiment) = self.sentiment {
            agent.sentiment = sentiment;
        }
        if let Some(instruction) = self.custom_instruction {
            agent.custom_instruction = instruction;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ConditionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicates: Option<Vec<Predicate>>,
    #[serde(flatten)]
    pub agent: AgentPatch,
}

impl ConditionPatch {
    pub fn mode(mode: ConditionMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn predicates(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates: Some(predicates),
            ..Self::default()
        }
    }

    pub fn agent(agent: AgentPatch) -> Self {
        Self {
            agent,
            ..Self::default()
        }
    }

    pub fn apply_to(self, block: &mut ConditionBlock) {
        if let Some(mode) = self.mode {
            block.mode = mode;
        }
        if let Some(predicates) = self.predicates {
            block.predicates = predicates;
        }
        self.agent.apply_to(&mut block.agent);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ActionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_action: Option<StandardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_action: Option<AiAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<AiModel>,
    #[serde(flatten)]
    pub agent: AgentPatch,
}

impl ActionPatch {
    pub fn mode(mode: ActionMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn standard_action(action: StandardAction) -> Self {
        Self {
            standard_action: Some(action),
            ..Self::default()
        }
    }

    pub fn ai_action(action: AiAction) -> Self {
        Self {
            ai_action: Some(action),
            ..Self::default()
        }
    }

    pub fn agent(agent: AgentPatch) -> Self {
        Self {
            agent,
            ..Self::default()
        }
    }

    pub fn apply_to(self, block: &mut ActionBlock) {
        if let Some(mode) = self.mode {
            block.mode = mode;
        }
        if let Some(action) = self.standard_action {
            block.standard_action = Some(action);
        }
        if let Some(action) = self.ai_action {
            block.ai_action = Some(action);
        }
        if let Some(prompt) = self.custom_prompt {
            block.custom_prompt = prompt;
        }
        if let Some(model) = self.model {
            block.model = model;
        }
        self.agent.apply_to(&mut block.agent);
    }
}
