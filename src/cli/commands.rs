//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::args::{ConfigAction, MirrorArgs};
use super::enums::DensityArg;
use crate::config::{self, default_path, Config, ConfigError};
use crate::device::StreamLink;
use crate::glyph::{self, Density};
use crate::input::InputCapture;
use crate::marker::Marker;
use crate::record::{GifSink, RecordError, SessionRecorder, TextSink};
use crate::replay::{self, play_transcript, ReplayError, ReplaySchedule};
use crate::screen::{FrameBuffer, FRAME_BYTES};
use crate::session::{setup_ctrlc_handler, InputSource, Session, SessionError, SessionSummary};
use crate::terminal::{DisplayOptions, LiveDisplay, RawModeGuard};

/// Device name used when neither the CLI nor the config names one.
pub const DEFAULT_DEVICE_NAME: &str = "Flipper Zero";

/// Errors reported by the binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("no {0} stream given (use --{0} or set `{0}` under [link] in the config file)")]
    MissingLink(&'static str),

    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: frame dump is {len} bytes, expected {FRAME_BYTES}", path.display())]
    FrameDump { path: PathBuf, len: usize },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Mirror settings after merging flags over the config file.
#[derive(Debug, Clone)]
pub struct MirrorSettings {
    pub frames: PathBuf,
    pub buttons: PathBuf,
    pub display: DisplayOptions,
}

impl MirrorSettings {
    pub fn resolve(args: &MirrorArgs, config: &Config) -> Result<Self, CliError> {
        let frames = args
            .frames
            .clone()
            .or_else(|| config.link.frames.clone())
            .ok_or(CliError::MissingLink("frames"))?;
        let buttons = args
            .buttons
            .clone()
            .or_else(|| config.link.buttons.clone())
            .ok_or(CliError::MissingLink("buttons"))?;
        let device_name = args
            .name
            .clone()
            .or_else(|| config.link.name.clone())
            .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string());

        let mut style = config.display.style();
        style.bold |= args.bold;

        Ok(Self {
            frames,
            buttons,
            display: DisplayOptions {
                density: resolve_density(args.density, config),
                style,
                device_name,
                replaying: args.replay.is_some(),
                no_display: args.no_display,
            },
        })
    }
}

fn resolve_density(flag: Option<DensityArg>, config: &Config) -> Density {
    flag.map(Density::from)
        .or_else(|| config.display.density())
        .unwrap_or_default()
}

/// Interrupt flag raised by Ctrl-C, or a flag nothing raises if the handler
/// cannot be installed.
fn interrupt_flag() -> Arc<AtomicBool> {
    setup_ctrlc_handler().unwrap_or_else(|e| {
        log::warn!("Could not set up Ctrl+C handler: {}", e);
        Arc::new(AtomicBool::new(false))
    })
}

/// Run a live mirror session.
pub fn run_mirror(args: &MirrorArgs, config: &Config) -> Result<SessionSummary, CliError> {
    let settings = MirrorSettings::resolve(args, config)?;
    let link = StreamLink::open(
        settings.display.device_name.clone(),
        &settings.frames,
        &settings.buttons,
    )
    .map_err(io_error(&settings.frames))?;

    let mut recorder = SessionRecorder::new();
    if let Some(path) = &args.txt {
        recorder.add_sink(Box::new(TextSink::create(
            path,
            settings.display.density,
            settings.display.style,
            settings.display.device_name.clone(),
        )?));
    }
    if let Some(path) = &args.gif {
        recorder.add_sink(Box::new(GifSink::create(path)?));
    }

    let interrupt = interrupt_flag();
    let display = LiveDisplay::new(io::stdout(), settings.display);

    let session = match &args.replay {
        Some(path) => {
            let schedule = ReplaySchedule::new(replay::load_events(path));
            log::info!("Replaying {} events from {}", schedule.len(), path.display());
            Session::new(link, display, recorder, InputSource::Replay(schedule))
        }
        None => {
            let guard = RawModeGuard::enter().map_err(io_error(Path::new("stdin")))?;
            let capture = InputCapture::spawn().map_err(io_error(Path::new("stdin")))?;
            Session::new(link, display, recorder, InputSource::Keyboard(capture)).with_raw_mode(guard)
        }
    };
    Ok(session.with_interrupt(interrupt).run()?)
}

/// Play a text transcript to stdout.
pub fn play(path: &Path) -> Result<(), CliError> {
    let file = File::open(path).map_err(io_error(path))?;
    let interrupt = interrupt_flag();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = play_transcript(BufReader::new(file), &mut out, &interrupt)
        .map_err(io_error(path))?;
    if summary.interrupted {
        log::info!("Playback interrupted after {} lines", summary.lines);
    }
    Ok(())
}

/// Print the button events of a recording, one per line.
pub fn list_events(path: &Path, all: bool) -> Result<(), CliError> {
    let mut events = replay::read_events(path)?;
    if !all {
        events = replay::prune(events);
    }
    for event in events {
        println!("{}", Marker::new(event.timestamp_ms, event.buttons));
    }
    Ok(())
}

/// Render a raw frame dump to stdout.
pub fn render_dump(path: &Path, density: Option<DensityArg>, bold: bool, config: &Config) -> Result<(), CliError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    let frame = FrameBuffer::from_slice(&bytes).ok_or(CliError::FrameDump {
        path: path.to_path_buf(),
        len: bytes.len(),
    })?;

    let mut style = config.display.style();
    style.bold |= bold;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in glyph::render(&frame, resolve_density(density, config)) {
        writeln!(out, "{}", style.paint(&line)).map_err(io_error(Path::new("stdout")))?;
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>, config: &Config) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => {
            let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);
            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found, showing defaults)", config_path.display());
            }
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let created = config::init(path, force)?;
            println!("Created config file: {}", created.display());
        }
    }
    Ok(())
}
