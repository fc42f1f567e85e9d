use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EditorConfig;

const QUIET_FILTER: &str = "mailflow=info,warn";
const VERBOSE_FILTER: &str = "mailflow=debug,info";

/// 日志配置
///
/// 过滤器优先级：显式 `filter` > `RUST_LOG` > 按 `verbose` 选择的默认值。
/// 详细模式下同时输出 target、文件与行号。
///
/// ```no_run
/// use mailflow::{logging::LoggingConfig, EditorConfig};
///
/// let config = EditorConfig::default();
/// LoggingConfig::from_config(&config).init();
/// tracing::info!("editor ready");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            filter: config.log_filter.clone(),
            verbose: config.debug,
        }
    }

    /// 覆盖过滤器，例如命令行的 `--log`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn env_filter(&self) -> EnvFilter {
        if let Some(filter) = &self.filter {
            return EnvFilter::new(filter);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if self.verbose {
                VERBOSE_FILTER
            } else {
                QUIET_FILTER
            })
        })
    }

    /// 安装全局订阅者；已经安装过时返回 `false`
    pub fn init(&self) -> bool {
        let layer = fmt::layer()
            .with_target(self.verbose)
            .with_file(self.verbose)
            .with_line_number(self.verbose);

        let installed = tracing_subscriber::registry()
            .with(self.env_filter())
            .with(layer)
            .try_init()
            .is_ok();

        if installed && self.verbose {
            tracing::debug!(filter = ?self.filter, "verbose logging enabled");
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_editor_config() {
        let config = EditorConfig {
            debug: true,
            log_filter: Some("mailflow=trace".into()),
            ..EditorConfig::default()
        };
        let logging = LoggingConfig::from_config(&config);
        assert!(logging.verbose);
        assert_eq!(logging.filter.as_deref(), Some("mailflow=trace"));

        let logging = LoggingConfig::from_config(&EditorConfig::default()).with_filter("warn");
        assert!(!logging.verbose);
        assert_eq!(logging.filter.as_deref(), Some("warn"));
    }

    #[test]
    fn second_init_is_ignored() {
        let logging = LoggingConfig::default().with_filter("mailflow=debug");
        logging.init();
        assert!(!logging.init());
    }
}
