use serde::{Deserialize, Serialize};

use super::constants::sentiment::{
    DEFAULT_THRESHOLD, NEGATIVE_BELOW, POSITIVE_ABOVE, STEP,
};
use crate::error::{MailFlowError, Result};
use crate::utils::validation::FlowValidator;

// AI Agent 配置：抽取、分类、情感、自定义
//
// 各子表单的状态是并列字段，切换 `kind` 不会清除其他子表单的内容。

/// AI Agent 类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Extraction,
    Classification,
    Sentiment,
    Custom,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Extraction,
        AgentKind::Classification,
        AgentKind::Sentiment,
        AgentKind::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgentKind::Extraction => "Extraction",
            AgentKind::Classification => "Classification",
            AgentKind::Sentiment => "Sentiment Analysis",
            AgentKind::Custom => "Custom AI Agent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AgentKind::Extraction => "Extract specific data points from emails or messages",
            AgentKind::Classification => "Categorize messages into predefined classes",
            AgentKind::Sentiment => "Detect positive, negative, or neutral sentiment",
            AgentKind::Custom => "Create a custom AI agent for specific tasks",
        }
    }
}

/// 单个 Block 上的 AI Agent 设置
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub kind: Option<AgentKind>,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub custom_instruction: String,
}

impl AgentSettings {
    pub fn is_extraction(&self) -> bool {
        self.kind == Some(AgentKind::Extraction)
    }
}

/// 抽取字段
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionField {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 逗号分隔的示例值
    #[serde(default)]
    pub examples: String,
}

impl ExtractionField {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_examples(mut self, examples: impl Into<String>) -> Self {
        self.examples = examples.into();
        self
    }

    pub fn first_example(&self) -> Option<&str> {
        self.examples
            .split(',')
            .next()
            .map(str::trim)
            .filter(|example| !example.is_empty())
    }
}

/// 抽取来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionSource {
    Subject,
    Body,
    Attachments,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSources {
    pub subject: bool,
    pub body: bool,
    pub attachments: bool,
}

impl Default for ExtractionSources {
    fn default() -> Self {
        Self {
            subject: true,
            body: true,
            attachments: false,
        }
    }
}

impl ExtractionSources {
    pub fn toggle(&mut self, source: ExtractionSource) {
        let flag = match source {
            ExtractionSource::Subject => &mut self.subject,
            ExtractionSource::Body => &mut self.body,
            ExtractionSource::Attachments => &mut self.attachments,
        };
        *flag = !*flag;
    }

    pub fn is_enabled(&self, source: ExtractionSource) -> bool {
        match source {
            ExtractionSource::Subject => self.subject,
            ExtractionSource::Body => self.body,
            ExtractionSource::Attachments => self.attachments,
        }
    }

    /// 全部关闭是允许的状态，这里只用于提示
    pub fn none_selected(&self) -> bool {
        !(self.subject || self.body || self.attachments)
    }
}

/// 用作抽取训练样本的邮件
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEmail {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    #[serde(default)]
    pub selected: bool,
}

impl TrainingEmail {
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        from: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            from: from.into(),
            date: date.into(),
            selected: false,
        }
    }
}

/// 根据抽取字段推荐的搜索词
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuggestedQuery {
    pub field: String,
    pub query: String,
}

fn default_min_training_emails() -> usize {
    5
}

/// 抽取子表单
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub fields: Vec<ExtractionField>,
    #[serde(default)]
    pub sources: ExtractionSources,
    #[serde(default)]
    pub training_emails: Vec<TrainingEmail>,
    #[serde(default = "default_min_training_emails")]
    pub min_training_emails: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fields: vec![ExtractionField::default()],
            sources: ExtractionSources::default(),
            training_emails: Vec::new(),
            min_training_emails: default_min_training_emails(),
        }
    }
}

impl ExtractionConfig {
    pub fn with_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = ExtractionField>,
    {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn add_field(&mut self) {
        self.fields.push(ExtractionField::default());
    }

    pub fn remove_field(&mut self, index: usize) -> bool {
        if index >= self.fields.len() {
            return false;
        }
        self.fields.remove(index);
        true
    }

    pub fn update_field(&mut self, index: usize, field: ExtractionField) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = field;
                true
            }
            None => false,
        }
    }

    pub fn rename_field(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                slot.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn set_training_emails(&mut self, emails: Vec<TrainingEmail>) {
        self.training_emails = emails;
    }

    pub fn has_enough_training_emails(&self) -> bool {
        self.training_emails.len() >= self.min_training_emails
    }

    pub fn suggested_queries(&self) -> Vec<SuggestedQuery> {
        self.fields
            .iter()
            .map(|field| SuggestedQuery {
                field: field.name.clone(),
                query: field
                    .first_example()
                    .map(str::to_string)
                    .unwrap_or_else(|| field.name.clone()),
            })
            .collect()
    }
}

/// 分类子表单
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub categories: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            categories: vec![String::new()],
        }
    }
}

impl ClassificationConfig {
    pub fn add_category(&mut self) {
        self.categories.push(String::new());
    }

    /// 至少保留一个分类
    pub fn remove_category(&mut self, index: usize) -> bool {
        if self.categories.len() <= 1 || index >= self.categories.len() {
            return false;
        }
        self.categories.remove(index);
        true
    }

    pub fn set_category(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.categories.get_mut(index) {
            Some(slot) => {
                *slot = label.into();
                true
            }
            None => false,
        }
    }
}

/// 情感展示区间
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentimentBand {
    Negative,
    Neutral,
    Positive,
}

/// 情感子表单：滑块与数字输入共享同一个阈值
///
/// 反序列化同样校验阈值，超出 [0,1] 的 JSON 会被拒绝。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSentiment", into = "RawSentiment")]
pub struct SentimentConfig {
    threshold: f64,
}

#[derive(Serialize, Deserialize)]
struct RawSentiment {
    threshold: f64,
}

impl TryFrom<RawSentiment> for SentimentConfig {
    type Error = MailFlowError;

    fn try_from(raw: RawSentiment) -> Result<Self> {
        FlowValidator::validate_threshold(raw.threshold)?;
        Ok(Self {
            threshold: positive_zero(raw.threshold),
        })
    }
}

impl From<SentimentConfig> for RawSentiment {
    fn from(config: SentimentConfig) -> Self {
        Self {
            threshold: config.threshold,
        }
    }
}

/// `-0` 统一成 `0`，避免输入框显示 "-0"
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SentimentConfig {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 滑块输入：截断到 [0,1] 并对齐到 0.05 步长
    pub fn set_from_slider(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let steps = (1.0 / STEP).round();
        self.threshold = positive_zero((value.clamp(0.0, 1.0) * steps).round() / steps);
    }

    /// 数字输入：不对齐步长，超出范围报错
    pub fn set_from_input(&mut self, text: &str) -> Result<()> {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| MailFlowError::InvalidThreshold(text.to_string()))?;
        FlowValidator::validate_threshold(value)?;
        self.threshold = positive_zero(value);
        Ok(())
    }

    /// 数字输入框中显示的文本
    pub fn input_text(&self) -> String {
        self.threshold.to_string()
    }

    pub fn band(&self) -> SentimentBand {
        if self.threshold < NEGATIVE_BELOW {
            SentimentBand::Negative
        } else if self.threshold > POSITIVE_ABOVE {
            SentimentBand::Positive
        } else {
            SentimentBand::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_field_keeps_order_of_the_rest() {
        let mut config = ExtractionConfig::with_fields(
            ["A", "B", "C", "D"].into_iter().map(ExtractionField::named),
        );
        assert!(config.remove_field(1));
        let names: Vec<&str> = config.field_names().collect();
        assert_eq!(names, vec!["A", "C", "D"]);
        assert!(!config.remove_field(7));
        assert_eq!(config.fields.len(), 3);
    }

    #[test]
    fn duplicate_and_blank_names_are_allowed() {
        let mut config = ExtractionConfig::with_fields([
            ExtractionField::named("Order"),
            ExtractionField::named("Order"),
        ]);
        config.add_field();
        assert_eq!(config.fields.len(), 3);
        assert_eq!(config.fields[2].name, "");
    }

    #[test]
    fn sources_toggle_independently_and_may_all_be_off() {
        let mut sources = ExtractionSources::default();
        assert!(sources.subject && sources.body && !sources.attachments);
        sources.toggle(ExtractionSource::Subject);
        sources.toggle(ExtractionSource::Body);
        assert!(sources.none_selected());
        sources.toggle(ExtractionSource::Attachments);
        assert!(sources.is_enabled(ExtractionSource::Attachments));
        assert!(!sources.is_enabled(ExtractionSource::Subject));
    }

    #[test]
    fn training_email_minimum_is_advisory() {
        let mut config = ExtractionConfig::default();
        assert!(!config.has_enough_training_emails());
        let emails = (0..5)
            .map(|i| TrainingEmail::new(i.to_string(), "s", "f", "d"))
            .collect();
        config.set_training_emails(emails);
        assert!(config.has_enough_training_emails());
    }

    #[test]
    fn suggested_queries_prefer_first_example() {
        let config = ExtractionConfig::with_fields([
            ExtractionField::named("OrderNumber").with_examples(" #12345 , #54321"),
            ExtractionField::named("Customer"),
        ]);
        let queries = config.suggested_queries();
        assert_eq!(queries[0].query, "#12345");
        assert_eq!(queries[1].query, "Customer");
    }

    #[test]
    fn classification_keeps_one_category() {
        let mut config = ClassificationConfig::default();
        assert!(!config.remove_category(0));
        config.add_category();
        assert!(config.set_category(1, "Complaint"));
        assert!(config.remove_category(0));
        assert_eq!(config.categories, vec!["Complaint".to_string()]);
    }

    #[test]
    fn slider_and_input_share_the_threshold() {
        let mut config = SentimentConfig::default();
        config.set_from_slider(0.8);
        assert_eq!(config.threshold(), 0.8);
        assert_eq!(config.input_text(), "0.8");

        config.set_from_input("0.33").unwrap();
        assert_eq!(config.threshold(), 0.33);
    }

    #[test]
    fn slider_snaps_and_clamps() {
        let mut config = SentimentConfig::default();
        config.set_from_slider(0.37);
        assert_eq!(config.input_text(), "0.35");
        config.set_from_slider(4.0);
        assert_eq!(config.threshold(), 1.0);
        config.set_from_slider(f64::NAN);
        assert_eq!(config.threshold(), 1.0);
    }

    #[test]
    fn input_rejects_garbage_and_out_of_range() {
        let mut config = SentimentConfig::default();
        assert!(config.set_from_input("abc").is_err());
        assert!(config.set_from_input("1.5").is_err());
        assert_eq!(config.threshold(), 0.5);
    }

    #[test]
    fn negative_zero_reads_back_as_zero() {
        let mut config = SentimentConfig::default();
        config.set_from_input("-0").unwrap();
        assert_eq!(config.input_text(), "0");
        config.set_from_slider(-0.01);
        assert_eq!(config.input_text(), "0");
    }

    #[test]
    fn deserialize_validates_threshold() {
        let config: SentimentConfig = serde_json::from_str(r#"{ "threshold": 0.75 }"#).unwrap();
        assert_eq!(config.threshold(), 0.75);
        assert_eq!(serde_json::to_value(config).unwrap()["threshold"], 0.75);

        assert!(serde_json::from_str::<SentimentConfig>(r#"{ "threshold": 7.5 }"#).is_err());
        assert!(serde_json::from_str::<SentimentConfig>(r#"{ "threshold": -0.2 }"#).is_err());
    }

    #[test]
    fn band_uses_loose_neutral_range() {
        let mut config = SentimentConfig::default();
        config.set_from_slider(0.35);
        assert_eq!(config.band(), SentimentBand::Negative);
        config.set_from_slider(0.4);
        assert_eq!(config.band(), SentimentBand::Neutral);
        config.set_from_slider(0.6);
        assert_eq!(config.band(), SentimentBand::Neutral);
        config.set_from_slider(0.65);
        assert_eq!(config.band(), SentimentBand::Positive);
    }
}
