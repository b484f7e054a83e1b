use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{Result as IoResult, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
thread_local! {
    static LOG_PREFIX: RefCell<Option<String>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

fn current_prefix() -> Option<String> {
    LOG_PREFIX.with(|prefix| prefix.borrow().clone())
}

fn with_prefix(message: &str) -> String {
    current_prefix().map_or_else(|| message.to_owned(), |prefix| format!("{prefix}: {message}"))
}

/// Mirrors warnings and errors into `path` in addition to stderr.
///
/// Only the first configured file is used; later calls are ignored.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn set_log_file(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

/// Tags messages logged on this thread, usually with the file being read.
/// The previous prefix comes back when the guard is dropped.
pub fn set_log_prefix(prefix: impl Into<String>) -> LogPrefixGuard {
    let previous = LOG_PREFIX.with(|slot| slot.replace(Some(prefix.into())));
    LogPrefixGuard { previous }
}

#[must_use = "the prefix is cleared when the guard is dropped"]
pub struct LogPrefixGuard {
    previous: Option<String>,
}

impl Drop for LogPrefixGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        LOG_PREFIX.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}

fn emit(level: Level, message: &str) {
    let message = with_prefix(message);
    eprintln!("{level}: {message}");
    if let Some(writer) = LOG_FILE.get()
        && let Ok(mut file) = writer.lock()
    {
        let _ = writeln!(file, "{level}: {message}");
    }
}

pub fn log_warn(message: &str) {
    emit(Level::Warning, message);
}

pub fn log_error(message: &str) {
    emit(Level::Error, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_guard_restores_previous_prefix() {
        assert_eq!(with_prefix("x"), "x");
        let outer = set_log_prefix("a.fts");
        {
            let _inner = set_log_prefix("b.fts");
            assert_eq!(with_prefix("bad column"), "b.fts: bad column");
        }
        assert_eq!(with_prefix("bad column"), "a.fts: bad column");
        drop(outer);
        assert_eq!(current_prefix(), None);
    }
}
