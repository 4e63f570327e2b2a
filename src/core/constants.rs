//! Shared constants used across the application

/// Conversation identifier reserved for a conversation that has not been created yet.
pub const NEW_CONVERSATION_KEY: &str = "new";

/// Reserved marker written into a session draft when the user explicitly empties
/// the MCP selection. Only ever appears on the wire; in memory it becomes
/// [`McpDraft::Clear`](crate::core::session::McpDraft::Clear).
pub const MCP_CLEAR_SENTINEL: &str = "sys__clear__sys";

/// Prefix for recency records, followed by the conversation key.
pub const LAST_SELECTION_PREFIX: &str = "last-selection:";

/// Upper bound on reconcile passes. Two passes settle inbound/outbound; the
/// remainder covers an auto-select pass after a first outbound write.
pub const MAX_RECONCILE_PASSES: usize = 4;
