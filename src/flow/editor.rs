use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use super::agents::ExtractionConfig;
use super::blocks::{
    ActionBlock, Block, BlockBody, BlockId, BlockKind, ConditionBlock, PredicateField,
};
use super::patch::BlockPatch;
use super::types::{Flow, FlowId, Trigger};
use crate::config::EditorConfig;
use crate::error::{MailFlowError, Result, SubmissionError};
use crate::services::FlowSubmitter;
use crate::utils::validation::{FlowValidator, MAX_NAME_LEN};

/// Block 列表变更回调
pub type BlockListener = Arc<dyn Fn(&[Block]) + Send + Sync>;

/// Flow 编辑器
///
/// 持有唯一的 Block 列表，所有修改都经过这里；每次成功修改后通知监听者。
/// Block 列表永远不会为空。
pub struct FlowEditor {
    flow: Flow,
    max_name_len: usize,
    min_training_emails: usize,
    listener: Option<BlockListener>,
}

impl FlowEditor {
    pub fn new() -> Self {
        Self {
            flow: Flow::default(),
            max_name_len: MAX_NAME_LEN,
            min_training_emails: ExtractionConfig::default().min_training_emails,
            listener: None,
        }
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let mut editor = Self {
            max_name_len: config.max_name_len,
            min_training_emails: config.min_training_emails,
            ..Self::new()
        };
        let min = editor.min_training_emails;
        for block in &mut editor.flow.blocks {
            Self::apply_training_minimum(block, min);
        }
        editor
    }

    /// 从已有 Flow 创建；空 Block 列表会被拒绝
    pub fn from_flow(flow: Flow) -> Result<Self> {
        let mut editor = Self::new();
        editor.load(flow)?;
        Ok(editor)
    }

    /// 替换当前 Flow；空 Block 列表会被拒绝
    pub fn load(&mut self, mut flow: Flow) -> Result<()> {
        if flow.blocks.is_empty() {
            return Err(MailFlowError::Other(anyhow!(
                "flow `{}` must contain at least one block",
                flow.name
            )));
        }
        flow.name = FlowValidator::clamp_name(&flow.name, self.max_name_len);
        self.flow = flow;
        self.notify();
        Ok(())
    }

    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&[Block]) + Send + Sync + 'static,
    {
        self.set_listener(listener);
        self
    }

    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: Fn(&[Block]) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn into_flow(self) -> Flow {
        self.flow
    }

    pub fn blocks(&self) -> &[Block] {
        &self.flow.blocks
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.flow.block(id)
    }

    pub fn try_block(&self, id: &str) -> Result<&Block> {
        self.block(id)
            .ok_or_else(|| MailFlowError::UnknownBlock(id.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.flow.name
    }

    /// 超出长度上限的部分会被截断
    pub fn set_name(&mut self, name: &str) {
        self.flow.name = FlowValidator::clamp_name(name, self.max_name_len);
    }

    pub fn trigger(&self) -> Trigger {
        self.flow.trigger
    }

    pub fn set_trigger(&mut self, trigger: Trigger) {
        self.flow.trigger = trigger;
    }

    /// 在 `after_index` 之后插入新 Block；越界时追加到末尾
    pub fn insert_block(&mut self, after_index: usize, kind: BlockKind) -> BlockId {
        let mut block = Block::new(kind);
        Self::apply_training_minimum(&mut block, self.min_training_emails);
        let id = block.id.clone();
        let position = after_index.saturating_add(1).min(self.flow.blocks.len());
        self.flow.blocks.insert(position, block);
        debug!(block = %id, ?kind, position, "block inserted");
        self.notify();
        id
    }

    /// 删除 Block；删除最后一个 Block 会被拒绝
    pub fn delete_block(&mut self, id: &str) -> bool {
        let Some(position) = self.flow.position(id) else {
            return false;
        };
        if self.flow.blocks.len() == 1 {
            warn!(block = %id, "refusing to delete the last block");
            return false;
        }
        self.flow.blocks.remove(position);
        debug!(block = %id, "block deleted");
        self.notify();
        true
    }

    /// 浅合并局部字段；找不到 Block 或种类不匹配时不做任何修改
    pub fn update_block(&mut self, id: &str, patch: impl Into<BlockPatch>) -> bool {
        let patch = patch.into();
        let Some(block) = self.flow.blocks.iter_mut().find(|block| block.id == id) else {
            return false;
        };
        let patch_kind = patch.kind();
        if !patch.apply_to(&mut block.body) {
            warn!(block = %id, ?patch_kind, "patch kind does not match block");
            return false;
        }
        self.notify();
        true
    }

    pub fn edit_condition<R>(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut ConditionBlock) -> R,
    ) -> Option<R> {
        let block = self
            .flow
            .blocks
            .iter_mut()
            .find(|block| block.id == id)?
            .as_condition_mut()?;
        let result = edit(block);
        self.notify();
        Some(result)
    }

    pub fn edit_action<R>(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut ActionBlock) -> R,
    ) -> Option<R> {
        let block = self
            .flow
            .blocks
            .iter_mut()
            .find(|block| block.id == id)?
            .as_action_mut()?;
        let result = edit(block);
        self.notify();
        Some(result)
    }

    /// 所有动作 Block 声明的抽取字段名，按出现顺序去重
    pub fn extracted_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for action in self.flow.blocks.iter().filter_map(Block::as_action) {
            for name in action.declared_extraction_fields() {
                if !names.iter().any(|existing| existing == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// 条件字段下拉选项：标准字段 + 抽取字段；每次调用都重新计算
    pub fn field_options(&self) -> Vec<PredicateField> {
        PredicateField::STANDARD
            .into_iter()
            .chain(
                self.extracted_field_names()
                    .into_iter()
                    .map(PredicateField::Extracted),
            )
            .collect()
    }

    /// 保存按钮是否可用：名称非空
    pub fn can_save(&self) -> bool {
        FlowValidator::validate_flow_name(&self.flow.name, self.max_name_len).is_ok()
    }

    /// 保存并启用：提交当前 Flow
    pub async fn save_and_enable<S>(
        &self,
        submitter: &S,
    ) -> std::result::Result<FlowId, SubmissionError>
    where
        S: FlowSubmitter + ?Sized,
    {
        if !self.can_save() {
            return Err(SubmissionError::BlankName);
        }
        let id = submitter.submit_flow(&self.flow).await?;
        info!(flow = %self.flow.name, id = %id, "automation saved and enabled");
        Ok(id)
    }

    fn apply_training_minimum(block: &mut Block, min: usize) {
        let agent = match &mut block.body {
            BlockBody::Condition(condition) => &mut condition.agent,
            BlockBody::Action(action) => &mut action.agent,
        };
        agent.extraction.min_training_emails = min;
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.flow.blocks);
        }
    }
}

impl Default for FlowEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FlowEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEditor")
            .field("flow", &self.flow)
            .field("max_name_len", &self.max_name_len)
            .field("min_training_emails", &self.min_training_emails)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
