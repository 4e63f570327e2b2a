//! Per-conversation session drafts and their on-disk home.
//!
//! A draft belongs to the wider session-editing flow: it carries several
//! session-scoped switches, of which selection sync only ever touches `mcp`.

pub mod draft;
pub mod file;

pub use draft::{EphemeralDraft, McpDraft, SessionDrafts};
pub use file::{SessionError, SessionFile};
