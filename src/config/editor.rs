use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::EnvConfig;
use crate::error::{MailFlowError, Result};
use crate::utils::validation::MAX_NAME_LEN;

/// 编辑器与模拟服务的配置
///
/// 所有字段都有默认值，JSON 中缺省的字段取默认值。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// 模拟邮件搜索的延迟
    pub search_delay_ms: u64,
    /// 模拟助手回复的延迟
    pub chat_delay_ms: u64,
    /// 测试运行中每一步的延迟
    pub test_step_delay_ms: u64,
    /// 抽取训练邮件的建议数量（仅提示）
    pub min_training_emails: usize,
    pub max_name_len: usize,
    /// 详细日志（也可由 `MAILFLOW_DEBUG` 打开）
    pub debug: bool,
    /// 日志过滤器，优先于 `RUST_LOG`
    pub log_filter: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            search_delay_ms: 1000,
            chat_delay_ms: 1000,
            test_step_delay_ms: 1500,
            min_training_emails: 5,
            max_name_len: MAX_NAME_LEN,
            debug: false,
            log_filter: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            MailFlowError::Config(format!("failed to read `{}`: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// 用 `MAILFLOW_*` 环境变量覆盖当前值
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = EnvConfig::get_parsed("MAILFLOW_SEARCH_DELAY_MS")? {
            self.search_delay_ms = v;
        }
        if let Some(v) = EnvConfig::get_parsed("MAILFLOW_CHAT_DELAY_MS")? {
            self.chat_delay_ms = v;
        }
        if let Some(v) = EnvConfig::get_parsed("MAILFLOW_TEST_STEP_DELAY_MS")? {
            self.test_step_delay_ms = v;
        }
        if let Some(v) = EnvConfig::get_parsed("MAILFLOW_MIN_TRAINING_EMAILS")? {
            self.min_training_emails = v;
        }
        if EnvConfig::is_debug_mode() {
            self.debug = true;
        }
        if let Some(filter) = EnvConfig::get_env_optional("MAILFLOW_LOG") {
            self.log_filter = Some(filter);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_name_len == 0 {
            return Err(MailFlowError::Config(
                "max_name_len must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn chat_delay(&self) -> Duration {
        Duration::from_millis(self.chat_delay_ms)
    }

    pub fn test_step_delay(&self) -> Duration {
        Duration::from_millis(self.test_step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "test_step_delay_ms": 10 }"#).unwrap();
        assert_eq!(config.test_step_delay_ms, 10);
        assert_eq!(config.search_delay_ms, 1000);
        assert_eq!(config.min_training_emails, 5);
        assert_eq!(config.max_name_len, 100);
    }

    #[test]
    fn logging_settings_come_from_json() {
        let config =
            EditorConfig::from_json_str(r#"{ "debug": true, "log_filter": "mailflow=trace" }"#)
                .unwrap();
        assert!(config.debug);
        assert_eq!(config.log_filter.as_deref(), Some("mailflow=trace"));
        assert!(!EditorConfig::default().debug);
    }

    #[test]
    fn zero_name_length_is_rejected() {
        assert!(EditorConfig::from_json_str(r#"{ "max_name_len": 0 }"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "chat_delay_ms": 5 }}"#).unwrap();
        let config = EditorConfig::from_path(file.path()).unwrap();
        assert_eq!(config.chat_delay(), Duration::from_millis(5));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = EditorConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, MailFlowError::Config(_)));
    }
}
