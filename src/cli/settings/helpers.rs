//! Helper functions for settings operations.

use crate::core::config::data::Config;
use crate::core::config::orchestrator::ConfigOrchestrator;

use super::error::SettingError;

/// Wrapper around [`ConfigOrchestrator::mutate`] that maps errors to
/// `SettingError::ConfigError`.
pub fn mutate_config<F>(orchestrator: &ConfigOrchestrator, f: F) -> Result<(), SettingError>
where
    F: FnOnce(&mut Config) -> Result<(), Box<dyn std::error::Error>>,
{
    orchestrator
        .mutate(f)
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Format a boolean value for display.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
