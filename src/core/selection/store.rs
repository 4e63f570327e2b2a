use crate::core::constants::MCP_CLEAR_SENTINEL;
use crate::core::selection::ConversationKey;
use crate::core::session::McpDraft;
use crate::mcp::registry::dedup_in_order;
use std::collections::HashMap;

/// Draft and registry contents as the inbound rule last saw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InboundInputs {
    pub(crate) draft: McpDraft,
    pub(crate) registry: Option<Vec<String>>,
}

/// Selected server names for one conversation.
///
/// `revision` moves whenever the names or the configured flag change; the
/// outbound and recency rules each remember the revision they last handled so
/// they only react to real changes.
///
/// `caller_write` is set while a setter change has not reached the draft yet.
/// Until it does, the inbound rule does not apply the draft over it.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    names: Vec<String>,
    configured: bool,
    revision: u64,
    pub(crate) last_inbound: Option<InboundInputs>,
    pub(crate) last_outbound: Option<u64>,
    pub(crate) last_stamped: Option<u64>,
    pub(crate) caller_write: bool,
}

impl SelectionState {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True once anything has deliberately set this selection, even to empty.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the names and marks the state configured. Returns whether
    /// anything observable changed.
    pub(crate) fn replace(&mut self, names: Vec<String>) -> bool {
        let names = if names.iter().any(|name| name == MCP_CLEAR_SENTINEL) {
            Vec::new()
        } else {
            dedup_in_order(names.iter().map(String::as_str))
        };

        if self.configured && self.names == names {
            return false;
        }

        self.names = names;
        self.configured = true;
        self.revision += 1;
        true
    }
}

/// Selection state per conversation, created on first access.
#[derive(Debug, Default)]
pub struct SelectionStore {
    states: HashMap<ConversationKey, SelectionState>,
}

impl SelectionStore {
    pub fn get(&self, key: &ConversationKey) -> Option<&SelectionState> {
        self.states.get(key)
    }

    pub fn state_mut(&mut self, key: &ConversationKey) -> &mut SelectionState {
        self.states.entry(key.clone()).or_default()
    }

    /// Drops the state of a conversation nothing refers to anymore.
    pub fn release(&mut self, key: &ConversationKey) -> bool {
        self.states.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Whether the selection panel stays open. Shared by every conversation and
/// only ever changed by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinnedFlag(bool);

impl PinnedFlag {
    pub fn new(pinned: bool) -> Self {
        Self(pinned)
    }

    pub fn get(&self) -> bool {
        self.0
    }

    pub fn set(&mut self, pinned: bool) {
        self.0 = pinned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_dedups_and_bumps_revision() {
        let mut state = SelectionState::default();
        assert!(!state.is_configured());

        assert!(state.replace(vec!["a".into(), "b".into(), "a".into()]));
        assert_eq!(state.names(), ["a", "b"]);
        assert_eq!(state.revision(), 1);

        assert!(!state.replace(vec!["a".into(), "b".into()]));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn replacing_untouched_state_with_empty_still_counts() {
        let mut state = SelectionState::default();

        assert!(state.replace(Vec::new()));
        assert!(state.is_configured());
        assert!(state.names().is_empty());
        assert!(!state.replace(Vec::new()));
    }

    #[test]
    fn sentinel_in_names_empties_the_selection() {
        let mut state = SelectionState::default();
        state.replace(vec!["a".into()]);

        state.replace(vec!["b".into(), MCP_CLEAR_SENTINEL.into()]);
        assert!(state.names().is_empty());
    }

    #[test]
    fn store_isolates_conversations() {
        let mut store = SelectionStore::default();
        store
            .state_mut(&ConversationKey::from("a"))
            .replace(vec!["x".into()]);

        assert!(store.get(&ConversationKey::from("b")).is_none());
        assert!(store.state_mut(&ConversationKey::from("b")).names().is_empty());
        assert_eq!(store.len(), 2);

        assert!(store.release(&ConversationKey::from("a")));
        assert!(!store.release(&ConversationKey::from("a")));
        assert_eq!(store.len(), 1);
    }
}
