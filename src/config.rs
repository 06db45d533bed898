// src/config.rs
use crate::utils::AppError;
use serde::{Deserialize, Serialize};

/// Environment variable that switches the pipeline to [`UnterminatedPolicy::AcceptPartial`].
pub const ACCEPT_UNTERMINATED_ENV: &str = "ANNUAL_REPORTS_ACCEPT_UNTERMINATED";

/// What to do with a section that starts but is never closed by a later heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedPolicy {
    /// Treat the section as absent: no requirements, every flag false.
    #[default]
    Skip,
    /// Segment and classify whatever was collected before input ended.
    AcceptPartial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub unterminated: UnterminatedPolicy,
}

impl PipelineConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ACCEPT_UNTERMINATED_ENV) {
            if parse_switch(ACCEPT_UNTERMINATED_ENV, &value)? {
                config.unterminated = UnterminatedPolicy::AcceptPartial;
            }
            tracing::debug!("Using {}={} from environment", ACCEPT_UNTERMINATED_ENV, value);
        }

        Ok(config)
    }

    /// Applies the command-line flag; a set flag wins over the environment.
    pub fn with_accept_unterminated(mut self, accept: bool) -> Self {
        if accept {
            self.unterminated = UnterminatedPolicy::AcceptPartial;
        }
        self
    }
}

fn parse_switch(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "Invalid value '{}' for {} (expected true/false)",
            other, name
        ))),
    }
}
