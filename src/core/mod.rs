pub mod config;
pub mod constants;
pub mod recency;
pub mod selection;
pub mod session;
