mod client;
mod io;

pub use client::{CliClient, is_exit_command};
pub use io::{Console, Palette};
