//! Handler for the `auto-select` policy setting.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::mutate_config;
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{AutoSelectPolicy, Config};

pub struct AutoSelectHandler;

impl SettingHandler for AutoSelectHandler {
    fn key(&self) -> &'static str {
        "auto-select"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To choose when startup servers are selected:",
                example: "mcp-selection set auto-select new-conversation\n\
mcp-selection set auto-select unconfigured",
            });
        }

        let policy: AutoSelectPolicy = args
            .join(" ")
            .parse()
            .map_err(|message| SettingError::InvalidValue {
                key: "auto-select",
                message,
            })?;

        mutate_config(ctx.orchestrator, move |config| {
            config.auto_select = Some(policy);
            Ok(())
        })?;

        Ok(format!("✅ Set auto-select to: {policy}"))
    }

    fn unset(&self, _args: Option<&str>, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        mutate_config(ctx.orchestrator, |config| {
            config.auto_select = None;
            Ok(())
        })?;

        Ok(format!(
            "✅ Unset auto-select (will use default: {})",
            AutoSelectPolicy::default()
        ))
    }

    fn format(&self, config: &Config) -> String {
        match config.auto_select {
            Some(policy) => format!("  auto-select: {policy}"),
            None => format!("  auto-select: {} (default)", AutoSelectPolicy::default()),
        }
    }
}
