//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyforge binary.

mod commands;
mod produce;
mod render;
mod session;

pub use commands::{Cli, Commands};
pub use produce::{describe, produce, script};
pub use session::{regenerate, sessions, show};
