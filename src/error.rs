use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Load error: {0}")]
    Load(String),

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for WizardError {
    fn from(err: polars::error::PolarsError) -> Self {
        WizardError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
