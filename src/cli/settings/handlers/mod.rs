//! Setting handlers for the individual configuration keys.

pub mod auto_select;
pub mod mcp;

pub use auto_select::*;
pub use mcp::*;
