use crate::core::constants::NEW_CONVERSATION_KEY;
use std::fmt;

/// Identifies whose selection state is being read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConversationKey {
    /// A conversation that has not been created yet.
    New,
    Id(String),
}

impl ConversationKey {
    /// Maps a missing, blank, or `"new"` id to [`ConversationKey::New`].
    pub fn from_conversation_id(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            None | Some("") => ConversationKey::New,
            Some(id) if id == NEW_CONVERSATION_KEY => ConversationKey::New,
            Some(id) => ConversationKey::Id(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConversationKey::New => NEW_CONVERSATION_KEY,
            ConversationKey::Id(id) => id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ConversationKey::New)
    }
}

impl From<&str> for ConversationKey {
    fn from(id: &str) -> Self {
        Self::from_conversation_id(Some(id))
    }
}

impl From<String> for ConversationKey {
    fn from(id: String) -> Self {
        Self::from_conversation_id(Some(&id))
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_reserved_ids_map_to_new() {
        assert_eq!(ConversationKey::from_conversation_id(None), ConversationKey::New);
        assert_eq!(ConversationKey::from("  "), ConversationKey::New);
        assert_eq!(ConversationKey::from("new"), ConversationKey::New);
        assert!(ConversationKey::from("new").is_new());
    }

    #[test]
    fn real_ids_round_trip_through_display() {
        let key = ConversationKey::from("7f3a".to_string());
        assert_eq!(key, ConversationKey::Id("7f3a".into()));
        assert_eq!(key.to_string(), "7f3a");
        assert!(!key.is_new());
    }
}
