//! Tracing setup: the state-dir log file when it can be opened, stderr otherwise.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "thumbgrab.log";

const DEFAULT_FILTER: &str = "info,thumbgrab=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/thumbgrab/thumbgrab.log`, with the directory created.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("thumbgrab")?;
    Ok(xdg_dirs.place_state_file(LOG_FILE)?)
}

/// Opens `path` for appending, creating it and any missing parents.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Returns the log file path, or `None` when
/// logging fell back to stderr.
pub fn init() -> Option<PathBuf> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);

    let opened = log_path().and_then(|path| Ok((open_log_file(&path)?, path)));
    match opened {
        Ok((file, path)) => {
            builder.with_writer(Mutex::new(file)).init();
            tracing::info!("logging to {}", path.display());
            Some(path)
        }
        Err(e) => {
            builder.with_writer(io::stderr).init();
            tracing::warn!("file logging unavailable, using stderr: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("thumbgrab").join(LOG_FILE);

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        assert!(open_log_file(&blocker.join(LOG_FILE)).is_err());
    }
}
