use crate::error::{Result, WizardError};
use std::path::PathBuf;

pub const DEFAULT_DROPDOWN_FILE: &str = "Dropdown.csv";
pub const DEFAULT_REFERENCE_FILE: &str = "Final_OP.csv";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Runtime settings for one wizard process.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub data_dir: PathBuf,
    pub dropdown_file: String,
    pub reference_file: String,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl WizardConfig {
    /// Build a config, filling the credential, model and endpoint from the
    /// environment when they are not given explicitly.
    pub fn resolve(
        data_dir: PathBuf,
        dropdown_file: String,
        reference_file: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                WizardError::Config(
                    "no API key: pass --api-key or set OPENAI_API_KEY".to_string(),
                )
            })?;

        let model = model
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            data_dir,
            dropdown_file,
            reference_file,
            api_key,
            model,
            base_url,
        })
    }

    pub fn dropdown_path(&self) -> PathBuf {
        self.data_dir.join(&self.dropdown_file)
    }

    pub fn reference_path(&self) -> PathBuf {
        self.data_dir.join(&self.reference_file)
    }
}
