//! MCP server registry: which servers exist and which start selected.

pub mod registry;

pub use registry::{McpRegistry, RegistryEntry};
