use crate::core::constants::MCP_CLEAR_SENTINEL;
use crate::core::selection::ConversationKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// The MCP field of a session draft.
///
/// On the wire this is an optional list of server names where the single
/// element [`MCP_CLEAR_SENTINEL`] means "explicitly cleared". In memory the
/// three cases are kept apart so a cleared selection can never be mistaken
/// for one that was never made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum McpDraft {
    /// The field is absent.
    #[default]
    Unset,
    /// The user emptied the selection on purpose.
    Clear,
    /// A concrete list of names. May be empty: present but holding nothing.
    Names(Vec<String>),
}

impl McpDraft {
    /// Builds a draft value from a raw name list. The clear sentinel wins over
    /// any names it appears alongside.
    pub fn from_names(names: Vec<String>) -> Self {
        if names.iter().any(|name| name == MCP_CLEAR_SENTINEL) {
            McpDraft::Clear
        } else {
            McpDraft::Names(names)
        }
    }

    pub fn from_wire(value: Option<Vec<String>>) -> Self {
        match value {
            None => McpDraft::Unset,
            Some(names) => Self::from_names(names),
        }
    }

    pub fn to_wire(&self) -> Option<Vec<String>> {
        match self {
            McpDraft::Unset => None,
            McpDraft::Clear => Some(vec![MCP_CLEAR_SENTINEL.to_string()]),
            McpDraft::Names(names) => Some(names.clone()),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, McpDraft::Unset)
    }

    /// Present with zero names, as opposed to absent or cleared.
    pub fn is_empty_list(&self) -> bool {
        matches!(self, McpDraft::Names(names) if names.is_empty())
    }

    /// Names the draft asks for; clearing and absence both ask for none.
    pub fn requested_names(&self) -> &[String] {
        match self {
            McpDraft::Names(names) => names,
            McpDraft::Unset | McpDraft::Clear => &[],
        }
    }
}

impl Serialize for McpDraft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for McpDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Vec<String>>::deserialize(deserializer).map(McpDraft::from_wire)
    }
}

/// Session-scoped choices for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemeralDraft {
    #[serde(default, skip_serializing_if = "McpDraft::is_unset")]
    pub mcp: McpDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_code: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<String>,
}

/// Drafts keyed by conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDrafts {
    drafts: BTreeMap<String, EphemeralDraft>,
}

impl SessionDrafts {
    pub fn get(&self, key: &ConversationKey) -> Option<&EphemeralDraft> {
        self.drafts.get(key.as_str())
    }

    /// The draft for `key`, created empty on first use.
    pub fn draft_mut(&mut self, key: &ConversationKey) -> &mut EphemeralDraft {
        self.drafts.entry(key.as_str().to_string()).or_default()
    }

    pub fn remove(&mut self, key: &ConversationKey) -> Option<EphemeralDraft> {
        self.drafts.remove(key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EphemeralDraft)> {
        self.drafts.iter().map(|(key, draft)| (key.as_str(), draft))
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_alone_is_clear() {
        let draft = McpDraft::from_wire(Some(vec![MCP_CLEAR_SENTINEL.to_string()]));
        assert_eq!(draft, McpDraft::Clear);
    }

    #[test]
    fn sentinel_alongside_names_still_clears() {
        let draft = McpDraft::from_names(vec![
            "search".to_string(),
            MCP_CLEAR_SENTINEL.to_string(),
        ]);
        assert_eq!(draft, McpDraft::Clear);
        assert!(draft.requested_names().is_empty());
    }

    #[test]
    fn empty_list_differs_from_absent() {
        let absent = McpDraft::from_wire(None);
        let empty = McpDraft::from_wire(Some(Vec::new()));

        assert!(absent.is_unset());
        assert!(!absent.is_empty_list());
        assert!(empty.is_empty_list());
        assert_ne!(absent, empty);
    }

    #[test]
    fn draft_serializes_sentinel_on_the_wire() {
        let draft = EphemeralDraft {
            mcp: McpDraft::Clear,
            web_search: Some(true),
            ..Default::default()
        };

        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "mcp": [MCP_CLEAR_SENTINEL], "web_search": true })
        );

        let back: EphemeralDraft = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, draft);
    }

    #[test]
    fn missing_mcp_field_deserializes_as_unset() {
        let draft: EphemeralDraft =
            serde_json::from_str(r#"{ "execute_code": false }"#).expect("deserialize");
        assert_eq!(draft.mcp, McpDraft::Unset);
        assert_eq!(draft.execute_code, Some(false));
    }

    #[test]
    fn drafts_are_created_per_conversation() {
        let mut drafts = SessionDrafts::default();
        drafts.draft_mut(&ConversationKey::New).mcp = McpDraft::Names(vec!["a".into()]);
        drafts.draft_mut(&ConversationKey::from("abc")).web_search = Some(true);

        assert_eq!(drafts.len(), 2);
        assert_eq!(
            drafts.get(&ConversationKey::New).map(|d| &d.mcp),
            Some(&McpDraft::Names(vec!["a".into()]))
        );
        assert!(drafts.get(&ConversationKey::from("abc")).unwrap().mcp.is_unset());
    }
}
