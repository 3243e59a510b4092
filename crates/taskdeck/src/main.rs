//! CLI entry point for taskdeck.

use std::{
    fs,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use taskdeck_app::{Session, Settings};
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::Shell;

mod commands;

/// In-memory task list and month calendar.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: an in-memory task list and calendar driven by a line shell"
)]
struct Cli {
    /// Settings file (defaults to <config dir>/taskdeck/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from a file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli { config, script } = Cli::parse();
    install_tracing();

    let settings = load_settings(config.as_deref())?;
    let session = Session::new(settings, now().date());
    let mut shell = Shell::new(session);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match script {
        Some(path) => {
            let file =
                fs::File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            shell.run(BufReader::new(file), &mut out, now)
        }
        None => shell.run(io::stdin().lock(), &mut out, now),
    }
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let settings = match explicit {
        Some(path) => Settings::from_file(path)?,
        None => {
            let dir = dirs::config_dir().ok_or_else(|| anyhow!("no config directory on this platform"))?;
            Settings::from_config_dir(dir)?
        }
    };
    info!(
        default_view = %settings.appearance.default_view,
        auto_archive = settings.tasks.auto_archive,
        "Loaded settings"
    );
    Ok(settings)
}

/// Wall clock in the local offset, falling back to UTC when it cannot be determined.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn install_tracing() {
    // RUST_LOG is honoured; INFO by default. Logs go to stderr.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
