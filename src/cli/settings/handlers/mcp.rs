//! MCP server setting handlers.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, mutate_config, parse_bool};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{Config, McpServerConfig};

const SET_EXAMPLE: &str = "mcp-selection set mcp <server> on/off\n\
mcp-selection set mcp <server> startup on/off\n\
mcp-selection set mcp <server> chat-menu on/off";

const UNSET_EXAMPLE: &str = "mcp-selection unset mcp <server>\n\
mcp-selection unset mcp \"<server> startup\"\n\
mcp-selection unset mcp \"<server> chat-menu\"";

/// Which per-server flag a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerFlag {
    Enabled,
    Startup,
    ChatMenu,
}

impl ServerFlag {
    fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "startup" => Some(ServerFlag::Startup),
            "chat-menu" | "chat_menu" | "menu" => Some(ServerFlag::ChatMenu),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ServerFlag::Enabled => "enabled state",
            ServerFlag::Startup => "startup",
            ServerFlag::ChatMenu => "chat-menu",
        }
    }

    fn default_display(self) -> &'static str {
        match self {
            ServerFlag::Enabled | ServerFlag::ChatMenu => "on",
            ServerFlag::Startup => "off",
        }
    }

    fn field(self, server: &mut McpServerConfig) -> &mut Option<bool> {
        match self {
            ServerFlag::Enabled => &mut server.enabled,
            ServerFlag::Startup => &mut server.startup,
            ServerFlag::ChatMenu => &mut server.chat_menu,
        }
    }
}

/// Handler for the `mcp` setting.
///
/// Supports:
/// - `set mcp <server> on/off` - advertise the server or hide it entirely
/// - `set mcp <server> startup on/off` - select it by default
/// - `set mcp <server> chat-menu on/off` - list it in the chat menu
pub struct McpHandler;

impl McpHandler {
    fn validate_server(ctx: &SetContext<'_>, server_id: &str) -> Result<(), SettingError> {
        if ctx.config.get_mcp_server(server_id).is_some() {
            return Ok(());
        }

        let available: Vec<_> = ctx
            .config
            .list_mcp_servers()
            .iter()
            .map(|s| s.id.as_str())
            .collect();

        let hint = if available.is_empty() {
            Some("No MCP servers are configured. Add servers to config.toml first.".into())
        } else {
            Some(format!("Available servers: {}", available.join(", ")))
        };

        Err(SettingError::UnknownItem {
            kind: "MCP server",
            input: server_id.to_string(),
            hint,
        })
    }

    fn write_flag(
        ctx: &SetContext<'_>,
        server_id: &str,
        flag: ServerFlag,
        value: Option<bool>,
    ) -> Result<(), SettingError> {
        let server_id = server_id.to_string();
        mutate_config(ctx.orchestrator, move |config| {
            if let Some(server) = config.get_mcp_server_mut(&server_id) {
                *flag.field(server) = value;
            }
            Ok(())
        })
    }
}

impl SettingHandler for McpHandler {
    fn key(&self) -> &'static str {
        "mcp"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        if args.len() < 2 {
            return Err(SettingError::MissingArgs {
                hint: "To configure an MCP server:",
                example: SET_EXAMPLE,
            });
        }

        let server_id = &args[0];
        Self::validate_server(ctx, server_id)?;

        let (flag, value_args) = match ServerFlag::parse(&args[1]) {
            Some(flag) if args.len() >= 3 => (flag, &args[2..]),
            Some(_) => {
                return Err(SettingError::MissingArgs {
                    hint: "Missing on/off value for MCP server flag:",
                    example: SET_EXAMPLE,
                })
            }
            None => (ServerFlag::Enabled, &args[1..]),
        };

        let value_input = value_args.join(" ");
        let value = parse_bool(&value_input).ok_or(SettingError::InvalidBoolean(value_input))?;
        Self::write_flag(ctx, server_id, flag, Some(value))?;

        Ok(match flag {
            ServerFlag::Enabled => {
                format!("✅ Set MCP server '{}' to: {}", server_id, format_bool(value))
            }
            _ => format!(
                "✅ Set MCP server '{}' {} to: {}",
                server_id,
                flag.label(),
                format_bool(value)
            ),
        })
    }

    fn unset(&self, args: Option<&str>, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let missing = || SettingError::MissingArgs {
            hint: "To reset an MCP server setting:",
            example: UNSET_EXAMPLE,
        };

        let parts: Vec<&str> = args.ok_or_else(missing)?.split_whitespace().collect();
        let Some(server_id) = parts.first().copied() else {
            return Err(missing());
        };
        Self::validate_server(ctx, server_id)?;

        let flag = parts
            .get(1)
            .and_then(|word| ServerFlag::parse(word))
            .unwrap_or(ServerFlag::Enabled);
        Self::write_flag(ctx, server_id, flag, None)?;

        Ok(format!(
            "✅ Unset MCP server '{}' {} (will use default: {})",
            server_id,
            flag.label(),
            flag.default_display()
        ))
    }

    fn format(&self, config: &Config) -> String {
        let servers = config.list_mcp_servers();
        if servers.is_empty() {
            return "  mcp: (no servers configured)".to_string();
        }

        let mut output = String::from("  mcp:\n");
        for server in servers {
            let startup = if server.is_startup() { " [startup]" } else { "" };
            let hidden = if server.is_in_chat_menu() { "" } else { " [hidden]" };
            output.push_str(&format!(
                "    {}: {}{}{}\n",
                server.id,
                format_bool(server.is_enabled()),
                startup,
                hidden
            ));
        }
        output.pop();
        output
    }
}
