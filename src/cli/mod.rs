//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, MirrorArgs};
pub use commands::{
    handle_config_action, list_events, play, render_dump, run_mirror, CliError, MirrorSettings,
    DEFAULT_DEVICE_NAME,
};
pub use enums::DensityArg;
