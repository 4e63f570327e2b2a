//! The reconciliation rules, each a pure function of its inputs.
//!
//! [`ToolSelection::reconcile`](super::ToolSelection::reconcile) decides when
//! each rule runs and applies the result; nothing here mutates state.

use crate::core::config::data::AutoSelectPolicy;
use crate::core::selection::store::SelectionState;
use crate::core::selection::ConversationKey;
use crate::core::session::McpDraft;
use crate::mcp::registry::{dedup_in_order, McpRegistry};

/// Draft → selection. `None` means the draft has nothing to say.
///
/// A cleared draft empties the selection whatever the registry holds. A list
/// keeps only advertised names, in draft order; with no registry loaded yet
/// every name is kept.
pub fn inbound(draft: &McpDraft, registry: Option<&McpRegistry>) -> Option<Vec<String>> {
    match draft {
        McpDraft::Clear => Some(Vec::new()),
        McpDraft::Names(names) if !names.is_empty() => Some(match registry {
            Some(registry) => registry.filter_known(names),
            None => dedup_in_order(names.iter().map(String::as_str)),
        }),
        McpDraft::Names(_) | McpDraft::Unset => None,
    }
}

/// The draft value that mirrors `state`.
pub fn project(state: &SelectionState) -> McpDraft {
    if !state.names().is_empty() {
        McpDraft::Names(state.names().to_vec())
    } else if state.is_configured() {
        McpDraft::Clear
    } else {
        McpDraft::Names(Vec::new())
    }
}

/// Selection → draft. Only returns a value when the draft differs, which is
/// what stops inbound and outbound from feeding each other forever.
pub fn outbound(state: &SelectionState, draft: &McpDraft) -> Option<McpDraft> {
    let projected = project(state);
    (projected != *draft).then_some(projected)
}

/// Startup servers for a selection that has never been set.
pub fn auto_select(
    key: &ConversationKey,
    state: &SelectionState,
    draft: &McpDraft,
    registry: Option<&McpRegistry>,
    policy: AutoSelectPolicy,
) -> Option<Vec<String>> {
    if state.is_configured() || !state.names().is_empty() {
        return None;
    }
    let registry = registry?;

    let triggered = match policy {
        AutoSelectPolicy::NewConversation => key.is_new(),
        AutoSelectPolicy::Unconfigured => key.is_new() || draft.is_empty_list(),
    };
    if !triggered {
        return None;
    }

    let startup = registry.startup_servers(policy);
    (!startup.is_empty()).then_some(startup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::registry::RegistryEntry;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn registry() -> McpRegistry {
        McpRegistry::from_entries([
            RegistryEntry::new("search", true, true),
            RegistryEntry::new("files", false, true),
            RegistryEntry::new("hidden", true, false),
        ])
    }

    fn configured(values: &[&str]) -> SelectionState {
        let mut state = SelectionState::default();
        state.replace(names(values));
        state
    }

    #[test]
    fn inbound_filters_unknown_names_in_order() {
        let draft = McpDraft::Names(names(&["files", "removed", "search"]));
        assert_eq!(
            inbound(&draft, Some(&registry())),
            Some(names(&["files", "search"]))
        );
    }

    #[test]
    fn inbound_keeps_everything_without_a_registry() {
        let draft = McpDraft::Names(names(&["removed", "search"]));
        assert_eq!(inbound(&draft, None), Some(names(&["removed", "search"])));
    }

    #[test]
    fn inbound_clear_ignores_registry() {
        assert_eq!(inbound(&McpDraft::Clear, Some(&registry())), Some(Vec::new()));
        assert_eq!(inbound(&McpDraft::Clear, None), Some(Vec::new()));
    }

    #[test]
    fn inbound_ignores_absent_and_empty_drafts() {
        assert_eq!(inbound(&McpDraft::Unset, Some(&registry())), None);
        assert_eq!(inbound(&McpDraft::Names(Vec::new()), Some(&registry())), None);
    }

    #[test]
    fn inbound_is_idempotent() {
        let registry = registry();
        let draft = McpDraft::Names(names(&["search", "removed", "search"]));

        let once = inbound(&draft, Some(&registry)).unwrap();
        let mut state = SelectionState::default();
        state.replace(once.clone());
        let twice = inbound(&draft, Some(&registry)).unwrap();

        assert_eq!(once, twice);
        assert!(!state.replace(twice));
    }

    #[test]
    fn projection_distinguishes_cleared_from_untouched() {
        assert_eq!(
            project(&SelectionState::default()),
            McpDraft::Names(Vec::new())
        );
        assert_eq!(project(&configured(&[])), McpDraft::Clear);
        assert_eq!(
            project(&configured(&["search"])),
            McpDraft::Names(names(&["search"]))
        );
    }

    #[test]
    fn outbound_skips_equal_drafts() {
        let state = configured(&["search"]);
        assert_eq!(outbound(&state, &McpDraft::Names(names(&["search"]))), None);
        assert_eq!(
            outbound(&state, &McpDraft::Unset),
            Some(McpDraft::Names(names(&["search"])))
        );
        assert_eq!(outbound(&configured(&[]), &McpDraft::Clear), None);
    }

    #[test]
    fn inbound_then_outbound_settles_within_two_rounds() {
        let registry = registry();
        let drafts = [
            McpDraft::Unset,
            McpDraft::Clear,
            McpDraft::Names(Vec::new()),
            McpDraft::Names(names(&["search"])),
            McpDraft::Names(names(&["removed"])),
            McpDraft::Names(names(&["files", "removed", "files"])),
        ];
        let states = [
            SelectionState::default(),
            configured(&[]),
            configured(&["search", "files"]),
        ];

        for initial_draft in &drafts {
            for initial_state in &states {
                let mut draft = initial_draft.clone();
                let mut state = initial_state.clone();
                let mut settled_at = None;

                for round in 1..=3 {
                    let mut changed = false;
                    if let Some(next) = inbound(&draft, Some(&registry)) {
                        changed |= state.replace(next);
                    }
                    if let Some(next) = outbound(&state, &draft) {
                        draft = next;
                        changed = true;
                    }
                    if !changed {
                        settled_at = Some(round);
                        break;
                    }
                }

                let settled_at = settled_at.expect("rules kept changing state");
                assert!(
                    settled_at <= 2,
                    "draft {initial_draft:?} with {:?} took {settled_at} rounds",
                    initial_state.names()
                );
            }
        }
    }

    #[test]
    fn auto_select_new_conversation_policy() {
        let registry = registry();
        let fresh = SelectionState::default();

        assert_eq!(
            auto_select(
                &ConversationKey::New,
                &fresh,
                &McpDraft::Unset,
                Some(&registry),
                AutoSelectPolicy::NewConversation
            ),
            Some(names(&["search"]))
        );
        assert_eq!(
            auto_select(
                &ConversationKey::from("c1"),
                &fresh,
                &McpDraft::Names(Vec::new()),
                Some(&registry),
                AutoSelectPolicy::NewConversation
            ),
            None
        );
    }

    #[test]
    fn auto_select_unconfigured_policy() {
        let registry = registry();
        let fresh = SelectionState::default();

        assert_eq!(
            auto_select(
                &ConversationKey::from("c1"),
                &fresh,
                &McpDraft::Names(Vec::new()),
                Some(&registry),
                AutoSelectPolicy::Unconfigured
            ),
            Some(names(&["search", "hidden"]))
        );
        assert_eq!(
            auto_select(
                &ConversationKey::from("c1"),
                &fresh,
                &McpDraft::Unset,
                Some(&registry),
                AutoSelectPolicy::Unconfigured
            ),
            None
        );
    }

    #[test]
    fn auto_select_never_overrides_a_deliberate_choice() {
        let registry = registry();
        for policy in [
            AutoSelectPolicy::NewConversation,
            AutoSelectPolicy::Unconfigured,
        ] {
            assert_eq!(
                auto_select(
                    &ConversationKey::New,
                    &configured(&[]),
                    &McpDraft::Clear,
                    Some(&registry),
                    policy
                ),
                None
            );
        }
    }

    #[test]
    fn auto_select_needs_a_registry_with_candidates() {
        let fresh = SelectionState::default();
        let no_startup =
            McpRegistry::from_entries([RegistryEntry::new("files", false, true)]);

        assert_eq!(
            auto_select(
                &ConversationKey::New,
                &fresh,
                &McpDraft::Unset,
                None,
                AutoSelectPolicy::NewConversation
            ),
            None
        );
        assert_eq!(
            auto_select(
                &ConversationKey::New,
                &fresh,
                &McpDraft::Unset,
                Some(&no_startup),
                AutoSelectPolicy::NewConversation
            ),
            None
        );
    }
}
