use std::fmt;

use serde::{Deserialize, Serialize};

use super::blocks::{Block, BlockKind};

// Flow 核心类型定义

/// 触发器
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    #[default]
    NewConversation,
    OutboundEmail,
    TagAdded,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [
        Trigger::NewConversation,
        Trigger::OutboundEmail,
        Trigger::TagAdded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Trigger::NewConversation => "New conversation (inbound) is received",
            Trigger::OutboundEmail => "Outbound email is sent",
            Trigger::TagAdded => "Tag is added",
        }
    }
}

/// Flow：名称 + 触发器 + 有序 Block 列表
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    pub trigger: Trigger,
    pub blocks: Vec<Block>,
}

impl Flow {
    /// 新建的 Flow 默认包含一个条件 Block 和一个动作 Block
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: Trigger::default(),
            blocks: vec![
                Block::new(BlockKind::Condition),
                Block::new(BlockKind::Action),
            ],
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |block| block.kind() == kind)
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new("")
    }
}

/// 提交后端返回的 Flow 标识
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub String);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flow_has_condition_then_action() {
        let flow = Flow::new("Invoices");
        assert_eq!(flow.trigger, Trigger::NewConversation);
        let kinds: Vec<BlockKind> = flow.blocks.iter().map(Block::kind).collect();
        assert_eq!(kinds, vec![BlockKind::Condition, BlockKind::Action]);
        assert_ne!(flow.blocks[0].id, flow.blocks[1].id);
        assert_eq!(flow.blocks_of(BlockKind::Action).count(), 1);
    }

    #[test]
    fn trigger_wire_names() {
        assert_eq!(
            serde_json::to_value(Trigger::NewConversation).unwrap(),
            "new-conversation"
        );
        assert_eq!(Trigger::TagAdded.label(), "Tag is added");
    }
}
