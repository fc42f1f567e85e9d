use thiserror::Error;

pub type Result<T> = std::result::Result<T, MailFlowError>;

#[derive(Debug, Error)]
pub enum MailFlowError {
    #[error("block `{0}` not found in flow")]
    UnknownBlock(String),
    #[error("sample email `{0}` not found")]
    UnknownSampleEmail(String),
    #[error("invalid sentiment threshold `{0}`")]
    InvalidThreshold(String),
    #[error("invalid flow name: {0}")]
    InvalidName(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 提交边界错误
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("flow name must not be blank")]
    BlankName,
    #[error("flow could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("submission rejected: {0}")]
    Rejected(String),
}
