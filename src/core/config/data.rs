use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A configured MCP server as it appears in `config.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct McpServerConfig {
    pub id: String,
    pub display_name: Option<String>,
    /// Disabled servers are not advertised by the registry at all
    pub enabled: Option<bool>,
    /// Selected automatically when a conversation starts without a selection
    pub startup: Option<bool>,
    /// Whether the server is listed in the chat menu
    pub chat_menu: Option<bool>,
}

impl McpServerConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_startup(&self) -> bool {
        self.startup.unwrap_or(false)
    }

    pub fn is_in_chat_menu(&self) -> bool {
        self.chat_menu.unwrap_or(true)
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Which conversations receive startup servers when their selection is empty.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AutoSelectPolicy {
    /// Only the not-yet-created conversation, and only servers shown in the chat menu.
    #[default]
    NewConversation,
    /// The new conversation plus any conversation whose draft holds an empty
    /// selection; menu visibility is ignored.
    Unconfigured,
}

impl AutoSelectPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoSelectPolicy::NewConversation => "new-conversation",
            AutoSelectPolicy::Unconfigured => "unconfigured",
        }
    }
}

impl fmt::Display for AutoSelectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoSelectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new-conversation" | "new" | "narrow" => Ok(AutoSelectPolicy::NewConversation),
            "unconfigured" | "broad" => Ok(AutoSelectPolicy::Unconfigured),
            other => Err(format!(
                "unknown auto-select policy '{other}' (expected new-conversation or unconfigured)"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// How startup servers are applied to empty selections
    pub auto_select: Option<AutoSelectPolicy>,
    /// Where session drafts, the pinned flag, and recency records are stored
    pub session_file: Option<PathBuf>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn auto_select_policy(&self) -> AutoSelectPolicy {
        self.auto_select.unwrap_or_default()
    }

    pub fn get_mcp_server(&self, id: &str) -> Option<&McpServerConfig> {
        self.mcp_servers
            .iter()
            .find(|server| server.id.eq_ignore_ascii_case(id))
    }

    pub fn get_mcp_server_mut(&mut self, id: &str) -> Option<&mut McpServerConfig> {
        self.mcp_servers
            .iter_mut()
            .find(|server| server.id.eq_ignore_ascii_case(id))
    }

    pub fn list_mcp_servers(&self) -> Vec<&McpServerConfig> {
        self.mcp_servers.iter().collect()
    }
}
