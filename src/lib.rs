//! Keeps a chat user's selected MCP servers consistent per conversation.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns configuration, session drafts, recency stamps, and the
//!   selection synchronizer ([`core::selection::ToolSelection`]) that reconciles
//!   drafts with the per-conversation selection store.
//! - [`mcp`] turns configured servers into the registry snapshot the
//!   synchronizer filters against and takes startup defaults from.
//! - [`cli`] parses arguments, runs set/unset settings handlers, and drives
//!   selection commands against the persisted session.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod logging;
pub mod mcp;
