//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::DensityArg;

/// Mirror, drive, record and replay a 128x64 handheld screen in the terminal
#[derive(Parser, Debug)]
#[command(name = "flipper-term")]
#[command(version, about = "Terminal remote control and screen mirror", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mirror the device screen and send keyboard input to it
    Mirror(MirrorArgs),
    /// Play back a recorded text transcript
    Play {
        /// Transcript written with `mirror --txt`
        file: PathBuf,
    },
    /// List the button events of a recording
    Events {
        /// Text transcript or GIF recording
        file: PathBuf,
        /// Keep events without buttons
        #[arg(long)]
        all: bool,
    },
    /// Render a raw 1024-byte frame dump
    Render {
        dump: PathBuf,
        #[arg(long, short)]
        density: Option<DensityArg>,
        /// Bold glyphs
        #[arg(long)]
        bold: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct MirrorArgs {
    /// Stream the bridge writes raw frames to
    #[arg(long)]
    pub frames: Option<PathBuf>,

    /// Stream the bridge reads button commands from
    #[arg(long)]
    pub buttons: Option<PathBuf>,

    /// Device name shown above the picture
    #[arg(long)]
    pub name: Option<String>,

    /// Glyph density
    #[arg(long, short)]
    pub density: Option<DensityArg>,

    /// Bold glyphs
    #[arg(long)]
    pub bold: bool,

    /// Record the session as a text transcript
    #[arg(long, value_name = "FILE")]
    pub txt: Option<PathBuf>,

    /// Record the session as an animated GIF
    #[arg(long, value_name = "FILE")]
    pub gif: Option<PathBuf>,

    /// Replay the button presses of a recording instead of reading the keyboard
    #[arg(long, short, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Print sent buttons instead of the picture
    #[arg(long)]
    pub no_display: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
