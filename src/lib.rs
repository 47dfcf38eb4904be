pub mod client;
pub mod config;
pub mod gate;
pub mod search;
pub mod tools;
pub mod types;

pub use types::{Tool, ToolSet};
