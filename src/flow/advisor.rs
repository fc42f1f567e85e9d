use std::fmt;

use serde::Serialize;

use super::agents::AgentSettings;
use super::blocks::{ActionMode, Block, BlockBody, BlockKind, ConditionMode};
use super::types::Flow;

/// 提示性检查：只报告，不阻止任何编辑或保存
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "hint", rename_all = "kebab-case")]
pub enum Advisory {
    BlankName,
    NoConditionBeforeAction,
    NoActionSelected { block: String },
    BlankExtractionField { block: String, index: usize },
    NoExtractionSources { block: String },
    TooFewTrainingEmails { block: String, selected: usize, recommended: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::BlankName => f.write_str("automation name is blank"),
            Advisory::NoConditionBeforeAction => {
                f.write_str("an action runs before any condition")
            }
            Advisory::NoActionSelected { block } => {
                write!(f, "block `{block}` has no action selected")
            }
            Advisory::BlankExtractionField { block, index } => {
                write!(f, "block `{block}` extraction field {} has no name", index + 1)
            }
            Advisory::NoExtractionSources { block } => {
                write!(f, "block `{block}` extracts from no source")
            }
            Advisory::TooFewTrainingEmails {
                block,
                selected,
                recommended,
            } => write!(
                f,
                "block `{block}` has {selected}/{recommended} training emails"
            ),
        }
    }
}

pub struct FlowAdvisor;

impl FlowAdvisor {
    pub fn review(flow: &Flow) -> Vec<Advisory> {
        let mut hints = Vec::new();

        if flow.name.trim().is_empty() {
            hints.push(Advisory::BlankName);
        }

        let first_condition = flow.blocks.iter().position(|b| b.kind() == BlockKind::Condition);
        let first_action = flow.blocks.iter().position(|b| b.kind() == BlockKind::Action);
        if let Some(action) = first_action {
            if first_condition.map_or(true, |condition| condition > action) {
                hints.push(Advisory::NoConditionBeforeAction);
            }
        }

        for block in &flow.blocks {
            Self::review_block(block, &mut hints);
        }
        hints
    }

    fn review_block(block: &Block, hints: &mut Vec<Advisory>) {
        match &block.body {
            BlockBody::Condition(condition) => {
                if condition.mode == ConditionMode::AiAgent {
                    Self::review_agent(&block.id, &condition.agent, hints);
                }
            }
            BlockBody::Action(action) => {
                let selected = match action.mode {
                    ActionMode::Standard => action.standard_action.is_some(),
                    ActionMode::Ai => action.ai_action.is_some() || action.agent.kind.is_some(),
                };
                if !selected {
                    hints.push(Advisory::NoActionSelected {
                        block: block.id.clone(),
                    });
                }
                if action.mode == ActionMode::Ai {
                    Self::review_agent(&block.id, &action.agent, hints);
                }
            }
        }
    }

    fn review_agent(block: &str, agent: &AgentSettings, hints: &mut Vec<Advisory>) {
        if !agent.is_extraction() {
            return;
        }
        let extraction = &agent.extraction;
        for (index, field) in extraction.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                hints.push(Advisory::BlankExtractionField {
                    block: block.to_string(),
                    index,
                });
            }
        }
        if extraction.sources.none_selected() {
            hints.push(Advisory::NoExtractionSources {
                block: block.to_string(),
            });
        }
        if !extraction.has_enough_training_emails() {
            hints.push(Advisory::TooFewTrainingEmails {
                block: block.to_string(),
                selected: extraction.training_emails.len(),
                recommended: extraction.min_training_emails,
            });
        }
    }
}
