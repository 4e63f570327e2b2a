use crate::core::config::data::{AutoSelectPolicy, Config, McpServerConfig};

/// What the selection logic needs to know about one advertised MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub startup_enabled: bool,
    pub visible_in_menu: bool,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, startup_enabled: bool, visible_in_menu: bool) -> Self {
        Self {
            name: name.into(),
            startup_enabled,
            visible_in_menu,
        }
    }

    fn from_server(server: &McpServerConfig) -> Self {
        Self::new(
            server.id.clone(),
            server.is_startup(),
            server.is_in_chat_menu(),
        )
    }

    fn is_startup_candidate(&self, policy: AutoSelectPolicy) -> bool {
        match policy {
            AutoSelectPolicy::NewConversation => self.startup_enabled && self.visible_in_menu,
            AutoSelectPolicy::Unconfigured => self.startup_enabled,
        }
    }
}

/// Read-only snapshot of the MCP servers currently advertised.
///
/// Callers hold it as `Option<&McpRegistry>`: `None` means the registry has not
/// been loaded yet, which disables both filtering and startup defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McpRegistry {
    entries: Vec<RegistryEntry>,
}

impl McpRegistry {
    pub fn from_config(config: &Config) -> Self {
        Self::from_entries(
            config
                .mcp_servers
                .iter()
                .filter(|server| server.is_enabled())
                .map(RegistryEntry::from_server),
        )
    }

    /// Later duplicates of a name are dropped; names are unique in a snapshot.
    pub fn from_entries(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
        let mut unique: Vec<RegistryEntry> = Vec::new();
        for entry in entries {
            if !unique.iter().any(|existing| existing.name == entry.name) {
                unique.push(entry);
            }
        }
        Self { entries: unique }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Servers to select by default, in registry order.
    pub fn startup_servers(&self, policy: AutoSelectPolicy) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.is_startup_candidate(policy))
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Keeps the advertised names of `names`, preserving their order and
    /// dropping repeats.
    pub fn filter_known<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let known = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| self.contains(name));
        dedup_in_order(known)
    }
}

/// First-seen order, repeats removed.
pub(crate) fn dedup_in_order<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    out
}
