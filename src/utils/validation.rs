use crate::error::{MailFlowError, Result};

/// 最长的自动化名称（字符数）
pub const MAX_NAME_LEN: usize = 100;

/// 流程字段验证器
pub struct FlowValidator;

impl FlowValidator {
    /// 验证自动化名称：非空且不超过上限
    pub fn validate_flow_name(name: &str, max_len: usize) -> Result<()> {
        if name.trim().is_empty() {
            return Err(MailFlowError::InvalidName("name must not be blank".into()));
        }

        let len = name.chars().count();
        if len > max_len {
            return Err(MailFlowError::InvalidName(format!(
                "name is {len} characters long (max {max_len})"
            )));
        }

        Ok(())
    }

    /// 截断名称到上限（按字符，不按字节）
    pub fn clamp_name(name: &str, max_len: usize) -> String {
        name.chars().take(max_len).collect()
    }

    /// 验证情感阈值
    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(MailFlowError::InvalidThreshold(threshold.to_string()));
        }
        Ok(())
    }
}
