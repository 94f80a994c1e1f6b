use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log size that triggers a trim (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Tail kept by a trim (1 MB)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Cut `log_path` down to its most recent whole lines once it grows past
/// MAX_LOG_SIZE. Returns the number of bytes dropped; zero leaves the file untouched.
fn trim_log(log_path: &Path) -> io::Result<u64> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    if size <= MAX_LOG_SIZE {
        return Ok(0);
    }

    let mut tail = Vec::with_capacity(KEEP_SIZE as usize);
    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(size - KEEP_SIZE))?;
    file.read_to_end(&mut tail)?;

    // First line of the tail is usually partial
    let first_line = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);
    let kept = &tail[first_line..];
    let dropped = size - kept.len() as u64;

    let mut file = File::create(log_path)?;
    writeln!(file, "--- log trimmed, {dropped} older bytes removed ---")?;
    file.write_all(kept)?;
    Ok(dropped)
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("cosmoviz={level},cosmoviz_core={level}");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize logging to stderr, or to `log_file` when one is given.
///
/// The level applies to both this binary and `cosmoviz_core`; `RUST_LOG`
/// overrides it. File output goes through a background writer, and the
/// returned guard must be held until exit so buffered lines are flushed.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> color_eyre::Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    let guard = match log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let trimmed = trim_log(log_path);

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(false),
                )
                .init();

            tracing::info!(log_path = %log_path.display(), "Logging initialized");
            match trimmed {
                Ok(0) => {}
                Ok(bytes) => tracing::info!(bytes, "Trimmed oversized log file"),
                Err(e) => tracing::warn!(error = %e, "Could not trim log file"),
            }
            Some(guard)
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .init();
            None
        }
    };

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cosmoviz.log");
        fs::write(&path, "line one\nline two\n").unwrap();

        assert_eq!(trim_log(&path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn test_oversized_log_keeps_recent_whole_lines_and_reports_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cosmoviz.log");
        let line = "x".repeat(99) + "\n";
        let content = line.repeat((MAX_LOG_SIZE / 100 + 10) as usize) + "last\n";
        fs::write(&path, &content).unwrap();

        let dropped = trim_log(&path).unwrap();
        let trimmed = fs::read_to_string(&path).unwrap();
        let header = format!("--- log trimmed, {dropped} older bytes removed ---\n");
        assert!(trimmed.starts_with(&header));
        assert_eq!(
            dropped + (trimmed.len() - header.len()) as u64,
            content.len() as u64
        );
        assert!(trimmed.ends_with("last\n"));
        assert!((trimmed.len() as u64) <= KEEP_SIZE + 64);
        assert!(trimmed.lines().skip(1).all(|l| l == "last" || l.len() == 99));
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(trim_log(&dir.path().join("absent.log")).unwrap(), 0);
    }
}
