//! `tracing` setup: human-readable output on stderr plus an optional
//! append-only log file.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{AppError, Result};

/// `RUST_LOG` when set, otherwise info for this crate.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pocketpp=info"))
}

/// Open `path` for appending, creating parent directories. An empty path
/// means no log file.
pub fn open_log_file(path: &Path) -> Result<Option<File>> {
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Some(file))
}

pub fn subscriber(
    filter: EnvFilter,
    log_file: Option<File>,
) -> impl Subscriber + Send + Sync + 'static {
    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    // stderr keeps stdout free for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
}

/// Install the global subscriber, logging to stderr and `log_file`.
pub fn init(log_file: &Path) -> Result<()> {
    let file = open_log_file(log_file)?;
    tracing::subscriber::set_global_default(subscriber(default_filter(), file))
        .map_err(|e| AppError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn events_are_appended_to_the_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "earlier line\n").unwrap();

        let file = open_log_file(&path).unwrap();
        tracing::subscriber::with_default(subscriber(EnvFilter::new("info"), file), || {
            tracing::info!(id = 7, "Saved article");
            tracing::debug!("filtered out");
        });

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("earlier line\n"));
        assert!(written.contains("Saved article"));
        assert!(written.contains("id=7"));
        assert!(!written.contains("filtered out"));
        assert!(!written.contains('\x1b'));
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("app.log");

        assert!(open_log_file(&path).unwrap().is_some());
        assert!(path.exists());
    }

    #[test]
    fn empty_path_disables_the_file() {
        assert!(open_log_file(Path::new("")).unwrap().is_none());
    }
}
