//! Middleware config loader (strict parsing).

pub mod schema;

use std::fs;

use reqtap_core::error::{ReqTapError, Result};

pub use schema::{IntegrationStyle, LogLevel, ServiceSection, TapConfig};

pub fn load_from_file(path: &str) -> Result<TapConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReqTapError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TapConfig> {
    let cfg: TapConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqTapError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
