use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default no-input window before a listen gives up, matching the
/// recognizer default of the speech subsystem.
pub const DEFAULT_NO_INPUT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}

/// Which interpretation strategy the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Lexical,
    Nlu,
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub no_input_timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            no_input_timeout: Duration::from_millis(DEFAULT_NO_INPUT_TIMEOUT_MS),
        }
    }
}

/// Connection settings for the conversation-analysis deployment.
/// Credentials stay in the environment; nothing here is checked in.
#[derive(Debug, Clone)]
pub struct NluConfig {
    pub endpoint: String,
    pub key: String,
    pub project: String,
    pub deployment: String,
}

impl NluConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: require("PARLEY_NLU_ENDPOINT")?,
            key: require("PARLEY_NLU_KEY")?,
            project: require("PARLEY_NLU_PROJECT")?,
            deployment: require("PARLEY_NLU_DEPLOYMENT")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
