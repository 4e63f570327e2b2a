pub mod data;
pub mod io;
pub mod orchestrator;

pub use data::{AutoSelectPolicy, Config, McpServerConfig};
pub use io::ConfigError;
