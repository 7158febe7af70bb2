use crate::conf::{ConfigError, StreamConfig};
use std::fs;
use std::path::Path;

/// Read, parse and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<StreamConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    parse_config(path, &raw)
}

/// Parse and validate TOML text; `origin` is only used in error messages.
pub fn parse_config(origin: &Path, raw: &str) -> Result<StreamConfig, ConfigError> {
    let cfg: StreamConfig = toml::from_str(raw).map_err(|e| ConfigError::parse(origin, e))?;
    cfg.validate()?;
    Ok(cfg)
}
