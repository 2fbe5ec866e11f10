//! Diagnostic logging setup.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where diagnostics go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stderr,
    File(std::path::PathBuf),
}

impl LogTarget {
    /// `off`/`0`, `stderr`/`2`, anything else is a file path.
    pub fn parse(s: &str) -> Self {
        match s {
            "off" | "0" => LogTarget::Off,
            "stderr" | "2" => LogTarget::Stderr,
            path => LogTarget::File(path.into()),
        }
    }
}

/// Install the global subscriber. Safe to call once per process.
///
/// `level` is the default threshold; `RUST_LOG` overrides it when set.
pub fn init(target: &LogTarget, level: Level) -> std::io::Result<()> {
    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogTarget::File(path) => {
            let file = open_append(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };
    result.map_err(std::io::Error::other)
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

fn open_append(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
