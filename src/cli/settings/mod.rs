//! Settings management for CLI set/unset commands.
//!
//! Each configuration key is served by a [`SettingHandler`]; the
//! [`SettingRegistry`] maps keys to handlers and fixes their display order.
//!
//! - `mcp` toggles per-server flags (`enabled`, `startup`, `chat-menu`)
//! - `auto-select` chooses which conversations receive startup servers

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;
use crate::core::config::orchestrator::ConfigOrchestrator;

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    /// Snapshot taken before the command ran, used for validation.
    pub config: &'a Config,
    /// Where changes are written.
    pub orchestrator: &'a ConfigOrchestrator,
}

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value from the arguments following the key.
    ///
    /// Returns a success message to display.
    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// Unset (reset to default) the configuration value.
    fn unset(&self, args: Option<&str>, ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// Format the current value for display in `mcp-selection set` output.
    fn format(&self, config: &Config) -> String;
}
