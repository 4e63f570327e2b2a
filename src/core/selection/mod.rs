//! Keeps a conversation's MCP server selection in step with its session draft
//! and the server registry.
//!
//! Three surfaces are involved and none of them owns the others:
//!
//! - the session draft (`EphemeralDraft::mcp`), written by the wider session
//!   flow and, through the outbound rule only, by us;
//! - the [`SelectionStore`], our own per-conversation state;
//! - the [`McpRegistry`] snapshot, refreshed out of band.
//!
//! [`ToolSelection::reconcile`] runs the rules in [`rules`] until nothing
//! changes. Each rule only fires when the inputs it depends on moved since it
//! last ran, so calling `reconcile` again with the same inputs is a no-op.

pub mod key;
pub mod rules;
pub mod store;


pub use key::ConversationKey;
pub use store::{PinnedFlag, SelectionState, SelectionStore};

use crate::core::config::data::AutoSelectPolicy;
use crate::core::constants::MAX_RECONCILE_PASSES;
use crate::core::recency::{recency_key, RecencyStore};
use crate::core::session::EphemeralDraft;
use crate::mcp::registry::McpRegistry;
use chrono::{DateTime, Utc};
use serde_json::Value;
use store::InboundInputs;
use tracing::{debug, warn};

/// What a [`ToolSelection::reconcile`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rule passes run, including the final pass that changed nothing.
    pub passes: usize,
    pub draft_written: bool,
    pub auto_selected: bool,
    pub stamped: bool,
}

#[derive(Debug, Default)]
pub struct ToolSelection {
    store: SelectionStore,
    pinned: PinnedFlag,
    policy: AutoSelectPolicy,
}

impl ToolSelection {
    pub fn new(policy: AutoSelectPolicy) -> Self {
        Self {
            store: SelectionStore::default(),
            pinned: PinnedFlag::default(),
            policy,
        }
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned.set(pinned);
        self
    }

    pub fn policy(&self) -> AutoSelectPolicy {
        self.policy
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// The selection for `key`, restricted to servers the registry still
    /// advertises.
    pub fn selection(&self, key: &ConversationKey, registry: Option<&McpRegistry>) -> Vec<String> {
        let Some(state) = self.store.get(key) else {
            return Vec::new();
        };
        match registry {
            Some(registry) => registry.filter_known(state.names()),
            None => state.names().to_vec(),
        }
    }

    /// Replaces the selection outright. The draft picks it up on the next
    /// [`reconcile`](Self::reconcile).
    pub fn set_selection(&mut self, key: &ConversationKey, names: Vec<String>) {
        let state = self.store.state_mut(key);
        if state.replace(names) {
            state.caller_write = true;
            debug!(conversation = %key, "MCP selection set by caller");
        }
    }

    /// Like [`set_selection`](Self::set_selection) for untyped input. Anything
    /// other than an array of strings is ignored; returns whether the value
    /// was accepted.
    pub fn set_selection_value(&mut self, key: &ConversationKey, value: &Value) -> bool {
        let Value::Array(items) = value else {
            debug!(conversation = %key, "ignoring non-array MCP selection");
            return false;
        };
        let names: Option<Vec<String>> = items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect();
        match names {
            Some(names) => {
                self.set_selection(key, names);
                true
            }
            None => {
                debug!(conversation = %key, "ignoring MCP selection with non-string entries");
                false
            }
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.get()
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned.set(pinned);
    }

    /// Forgets a conversation's selection state.
    pub fn release(&mut self, key: &ConversationKey) -> bool {
        self.store.release(key)
    }

    pub fn reconcile(
        &mut self,
        key: &ConversationKey,
        registry: Option<&McpRegistry>,
        draft: &mut EphemeralDraft,
        recency: &mut dyn RecencyStore,
    ) -> ReconcileReport {
        self.reconcile_at(key, registry, draft, recency, Utc::now())
    }

    /// Brings the selection for `key` and `draft.mcp` to a fixpoint, then
    /// stamps recency if the selection moved and is non-empty.
    pub fn reconcile_at(
        &mut self,
        key: &ConversationKey,
        registry: Option<&McpRegistry>,
        draft: &mut EphemeralDraft,
        recency: &mut dyn RecencyStore,
        now: DateTime<Utc>,
    ) -> ReconcileReport {
        let policy = self.policy;
        let registry_names = registry.map(McpRegistry::names);
        let state = self.store.state_mut(key);
        let mut report = ReconcileReport::default();

        loop {
            if report.passes == MAX_RECONCILE_PASSES {
                warn!(
                    conversation = %key,
                    passes = report.passes,
                    "MCP selection did not settle"
                );
                break;
            }
            report.passes += 1;
            let mut changed = false;

            let inputs = InboundInputs {
                draft: draft.mcp.clone(),
                registry: registry_names.clone(),
            };
            if state.last_inbound.as_ref() != Some(&inputs) {
                if state.caller_write {
                    debug!(conversation = %key, "draft superseded by caller selection");
                } else if let Some(names) = rules::inbound(&draft.mcp, registry) {
                    if state.replace(names) {
                        // The draft is the source here; never write the filtered names back.
                        state.last_outbound = Some(state.revision());
                        debug!(conversation = %key, selection = ?state.names(), "selection taken from draft");
                        changed = true;
                    }
                }
                state.last_inbound = Some(inputs);
            }

            if let Some(startup) = rules::auto_select(key, state, &draft.mcp, registry, policy) {
                debug!(conversation = %key, servers = ?startup, "auto-selected startup servers");
                state.replace(startup);
                report.auto_selected = true;
                changed = true;
            }

            if state.last_outbound != Some(state.revision()) {
                state.last_outbound = Some(state.revision());
                state.caller_write = false;
                if let Some(next) = rules::outbound(state, &draft.mcp) {
                    debug!(conversation = %key, draft = ?next, "draft updated from selection");
                    draft.mcp = next;
                    report.draft_written = true;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        if !state.names().is_empty() && state.last_stamped != Some(state.revision()) {
            state.last_stamped = Some(state.revision());
            match recency.record(&recency_key(key), now) {
                Ok(()) => report.stamped = true,
                Err(err) => debug!(conversation = %key, error = %err, "recency stamp dropped"),
            }
        }

        report
    }
}
