//! CLI argument validation functions
//!
//! Custom value parsers for arguments clap cannot validate on its own.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Parse a `key=value` data pair
///
/// The value is read as JSON when it parses (`count=3`, `tags=["a"]`) and as
/// a plain string otherwise (`name=Bob`).
pub fn parse_data_pair(pair: &str) -> Result<(String, Value), String> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got: '{}'", pair))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Data key cannot be empty in '{}'", pair));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Validate the timeout override in seconds (0 disables the timeout)
pub fn validate_timeout(timeout_str: &str) -> Result<u64, String> {
    let timeout: u64 = timeout_str
        .parse()
        .map_err(|_| format!("Timeout must be a whole number of seconds, got: '{}'", timeout_str))?;

    if timeout > 3600 {
        return Err("Timeout cannot exceed 3600 seconds".to_string());
    }

    Ok(timeout)
}
