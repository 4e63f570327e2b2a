//! Selection commands: load config and session, reconcile, persist.

use std::error::Error;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::config::data::{path_display, Config};
use crate::core::selection::{ConversationKey, ReconcileReport, ToolSelection};
use crate::core::session::{McpDraft, SessionFile};
use crate::mcp::registry::McpRegistry;

/// Result of a `select` command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SelectOutcome {
    pub accepted: bool,
    /// Requested names the registry does not advertise.
    pub dropped: Vec<String>,
}

/// Everything one CLI invocation works with.
pub struct Workspace {
    config: Config,
    registry: Option<McpRegistry>,
    session: SessionFile,
    session_path: PathBuf,
    selection: ToolSelection,
}

impl Workspace {
    /// Loads config and session. Without a config file the registry counts as
    /// not loaded, so nothing is filtered and nothing auto-selected.
    pub fn open(config_path: &Path) -> Result<Self, Box<dyn Error>> {
        let config = Config::load_from_path(config_path)?;
        let registry = config_path
            .exists()
            .then(|| McpRegistry::from_config(&config));
        let session_path = SessionFile::resolve_path(&config)?;
        Self::from_parts(config, registry, session_path)
    }

    pub fn from_parts(
        config: Config,
        registry: Option<McpRegistry>,
        session_path: PathBuf,
    ) -> Result<Self, Box<dyn Error>> {
        let session = SessionFile::load_from_path(&session_path)?;
        let selection =
            ToolSelection::new(config.auto_select_policy()).with_pinned(session.pinned);
        Ok(Self {
            config,
            registry,
            session,
            session_path,
            selection,
        })
    }

    pub fn registry(&self) -> Option<&McpRegistry> {
        self.registry.as_ref()
    }

    pub fn session(&self) -> &SessionFile {
        &self.session
    }

    pub fn reconcile(&mut self, key: &ConversationKey) -> ReconcileReport {
        let draft = self.session.drafts.draft_mut(key);
        self.selection
            .reconcile(key, self.registry.as_ref(), draft, &mut self.session.recency)
    }

    pub fn selection(&self, key: &ConversationKey) -> Vec<String> {
        self.selection.selection(key, self.registry.as_ref())
    }

    /// Applies a raw JSON selection. Input that is not a JSON array of strings
    /// leaves everything as it was.
    pub fn select_json(&mut self, key: &ConversationKey, raw: &str) -> SelectOutcome {
        self.reconcile(key);

        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return SelectOutcome::default();
        };
        if !self.selection.set_selection_value(key, &value) {
            return SelectOutcome::default();
        }
        self.reconcile(key);

        let dropped = match (&value, &self.registry) {
            (Value::Array(items), Some(registry)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| !registry.contains(name))
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        SelectOutcome {
            accepted: true,
            dropped,
        }
    }

    pub fn clear(&mut self, key: &ConversationKey) {
        self.reconcile(key);
        self.selection.set_selection(key, Vec::new());
        self.reconcile(key);
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.selection.set_pinned(pinned);
    }

    pub fn is_pinned(&self) -> bool {
        self.selection.is_pinned()
    }

    pub fn save(&mut self) -> Result<(), Box<dyn Error>> {
        self.session.pinned = self.selection.is_pinned();
        self.session.save_to_path(&self.session_path)
    }

    /// One-line summary of a conversation's selection.
    pub fn describe(&self, key: &ConversationKey) -> String {
        let names = self.selection(key);
        let listed = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };
        let pinned = if self.is_pinned() { " [pinned]" } else { "" };
        format!("{key}: {listed}{pinned}")
    }
}

pub fn format_servers(registry: Option<&McpRegistry>) -> String {
    let Some(registry) = registry else {
        return "No config file found; no MCP servers are registered.".to_string();
    };
    if registry.is_empty() {
        return "No enabled MCP servers.".to_string();
    }

    let mut output = String::from("MCP servers:");
    for entry in registry.entries() {
        let startup = if entry.startup_enabled { " [startup]" } else { "" };
        let hidden = if entry.visible_in_menu { "" } else { " [hidden]" };
        let _ = write!(output, "\n  {}{}{}", entry.name, startup, hidden);
    }
    output
}

pub fn format_status(workspace: &Workspace) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Pinned: {}",
        if workspace.is_pinned() { "on" } else { "off" }
    );
    let _ = writeln!(output, "Auto-select: {}", workspace.config.auto_select_policy());
    let _ = write!(output, "Session: {}", path_display(&workspace.session_path));

    for (id, draft) in workspace.session.drafts.iter() {
        let key = ConversationKey::from(id);
        let mcp = match &draft.mcp {
            McpDraft::Unset => "(unset)".to_string(),
            McpDraft::Clear => "(cleared)".to_string(),
            McpDraft::Names(names) if names.is_empty() => "(empty)".to_string(),
            McpDraft::Names(names) => names.join(", "),
        };
        let _ = write!(output, "\n  {key}: {mcp}");
        if let Some(at) = workspace.session.recency.last_selection(&key) {
            let _ = write!(output, " (last selected {})", at.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::data::McpServerConfig;
    use tempfile::TempDir;

    fn config() -> Config {
        let mut config = Config::default();
        config.mcp_servers.push(McpServerConfig {
            startup: Some(true),
            ..McpServerConfig::new("search")
        });
        config.mcp_servers.push(McpServerConfig::new("files"));
        config
    }

    fn open(dir: &TempDir) -> Workspace {
        let config = config();
        let registry = Some(McpRegistry::from_config(&config));
        Workspace::from_parts(config, registry, dir.path().join("session.toml"))
            .expect("open workspace")
    }

    #[test]
    fn show_new_conversation_auto_selects_and_persists() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);

        workspace.reconcile(&ConversationKey::New);
        assert_eq!(workspace.describe(&ConversationKey::New), "new: search");
        workspace.save().expect("save");

        let reopened = open(&dir);
        assert_eq!(
            reopened
                .session()
                .drafts
                .get(&ConversationKey::New)
                .map(|d| d.mcp.clone()),
            Some(McpDraft::Names(vec!["search".into()]))
        );
        assert!(reopened
            .session()
            .recency
            .last_selection(&ConversationKey::New)
            .is_some());
    }

    #[test]
    fn clear_survives_reopen() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);
        workspace.clear(&ConversationKey::New);
        workspace.save().expect("save");

        let mut reopened = open(&dir);
        let report = reopened.reconcile(&ConversationKey::New);

        assert!(!report.auto_selected);
        assert_eq!(reopened.describe(&ConversationKey::New), "new: (none)");
    }

    #[test]
    fn select_json_reports_dropped_names() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);
        let key = ConversationKey::from("c1");

        let outcome = workspace.select_json(&key, r#"["files", "ghost"]"#);

        assert_eq!(
            outcome,
            SelectOutcome {
                accepted: true,
                dropped: vec!["ghost".into()],
            }
        );
        assert_eq!(workspace.selection(&key), vec!["files"]);
    }

    #[test]
    fn select_json_ignores_malformed_input() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);
        let key = ConversationKey::from("c1");
        workspace.select_json(&key, r#"["search"]"#);

        for raw in ["search", r#""search""#, r#"{"mcp": []}"#, "[1, 2]"] {
            let outcome = workspace.select_json(&key, raw);
            assert!(!outcome.accepted, "{raw} should be rejected");
        }
        assert_eq!(workspace.selection(&key), vec!["search"]);
    }

    #[test]
    fn pinned_flag_is_persisted() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);
        workspace.set_pinned(true);
        workspace.save().expect("save");

        assert!(open(&dir).is_pinned());
    }

    #[test]
    fn missing_config_means_unloaded_registry() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = dir.path().join("absent.toml");
        let config = Config {
            session_file: Some(dir.path().join("session.toml")),
            ..Default::default()
        };
        let workspace =
            Workspace::from_parts(config, None, dir.path().join("session.toml")).expect("open");

        assert!(!config_path.exists());
        assert!(workspace.registry().is_none());
        assert_eq!(
            format_servers(workspace.registry()),
            "No config file found; no MCP servers are registered."
        );
    }

    #[test]
    fn servers_listing_marks_flags() {
        let mut config = config();
        config.mcp_servers.push(McpServerConfig {
            chat_menu: Some(false),
            ..McpServerConfig::new("hidden")
        });
        let registry = McpRegistry::from_config(&config);

        assert_eq!(
            format_servers(Some(&registry)),
            "MCP servers:\n  search [startup]\n  files\n  hidden [hidden]"
        );
    }

    #[test]
    fn status_lists_conversations() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = open(&dir);
        workspace.reconcile(&ConversationKey::New);
        workspace.clear(&ConversationKey::from("c1"));

        let status = format_status(&workspace);

        assert!(status.starts_with("Pinned: off\nAuto-select: new-conversation\nSession: "));
        assert!(status.contains("\n  c1: (cleared)"));
        assert!(status.contains("\n  new: search (last selected "));
    }
}
