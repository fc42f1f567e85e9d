use crate::error::{MailFlowError, Result};
use std::env;
use std::str::FromStr;

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 获取可选的环境变量
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok()
    }

    /// 读取并解析可选的数值变量；未设置时返回 `Ok(None)`
    pub fn get_parsed<T>(key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::get_env_optional(key) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                MailFlowError::Config(format!("`{key}` has invalid value `{raw}`: {e}"))
            }),
        }
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var("MAILFLOW_DEBUG").is_ok()
    }
}
