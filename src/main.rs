use clap::Parser;

use flipper_term::cli::{self, Args, CliError, Command};
use flipper_term::config::Config;

fn run(args: Args) -> Result<(), CliError> {
    let config_path = args.config.as_deref();

    // `config init` must work when the existing file is broken.
    if let Command::Config {
        action: action @ cli::ConfigAction::Init { .. },
    } = &args.command
    {
        return cli::handle_config_action(action.clone(), config_path, &Config::default());
    }
    let config = Config::load(config_path)?;

    match &args.command {
        Command::Mirror(mirror) => {
            let summary = cli::run_mirror(mirror, &config)?;
            log::info!(
                "{} frames shown, {} recorded, {} buttons sent",
                summary.frames_shown,
                summary.frames_recorded,
                summary.buttons_sent
            );
        }
        Command::Play { file } => cli::play(file)?,
        Command::Events { file, all } => cli::list_events(file, *all)?,
        Command::Render {
            dump,
            density,
            bold,
        } => cli::render_dump(dump, *density, *bold, &config)?,
        Command::Config { action } => cli::handle_config_action(action.clone(), config_path, &config)?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
