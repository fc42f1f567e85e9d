use super::blocks::{ActionBlock, Block, ConditionBlock};
use super::types::{Flow, Trigger};
use crate::utils::validation::{FlowValidator, MAX_NAME_LEN};

/// Flow 构建器
pub struct FlowBuilder {
    name: String,
    trigger: Trigger,
    blocks: Vec<Block>,
}

impl FlowBuilder {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            trigger: Trigger::default(),
            blocks: Vec::new(),
        }
    }

    pub fn trigger(&mut self, trigger: Trigger) -> &mut Self {
        self.trigger = trigger;
        self
    }

    pub fn add_condition(&mut self, block: ConditionBlock) -> &mut Self {
        self.blocks.push(Block::condition(block));
        self
    }

    pub fn add_action(&mut self, block: ActionBlock) -> &mut Self {
        self.blocks.push(Block::action(block));
        self
    }

    pub fn add_block(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// 未添加任何 Block 时使用默认的条件 + 动作
    pub fn build(self) -> Flow {
        let mut flow = Flow::new(FlowValidator::clamp_name(&self.name, MAX_NAME_LEN));
        flow.trigger = self.trigger;
        if !self.blocks.is_empty() {
            flow.blocks = self.blocks;
        }
        flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::blocks::{BlockKind, StandardAction};

    #[test]
    fn empty_builder_falls_back_to_defaults() {
        let flow = FlowBuilder::new("defaults").build();
        assert_eq!(flow.blocks.len(), 2);
    }

    #[test]
    fn builder_keeps_block_order() {
        let mut builder = FlowBuilder::new("ordered");
        builder
            .trigger(Trigger::TagAdded)
            .add_action(ActionBlock::standard(StandardAction::CreateTask))
            .add_condition(ConditionBlock::default());
        let flow = builder.build();
        assert_eq!(flow.trigger, Trigger::TagAdded);
        assert_eq!(flow.blocks[0].kind(), BlockKind::Action);
        assert_eq!(flow.blocks[1].kind(), BlockKind::Condition);
    }
}
