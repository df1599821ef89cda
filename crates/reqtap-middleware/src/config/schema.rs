use serde::Deserialize;

use reqtap_core::error::{ReqTapError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TapConfig {
    pub version: u32,

    pub service: ServiceSection,

    /// Which host integration shape the embedding service uses.
    #[serde(default)]
    pub style: IntegrationStyle,

    /// Paths to skip instrumentation for. Accepted but currently inert;
    /// see DESIGN.md.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl TapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqTapError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.service.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    pub name: String,

    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ReqTapError::Config("service.name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_env() -> String {
    "development".into()
}

/// Log level floor for the internally constructed logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Host integration shape. A configuration-time choice, not a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStyle {
    /// Response object signals completion via a finished event.
    Event,
    /// Handler returns a future.
    #[default]
    Future,
}
