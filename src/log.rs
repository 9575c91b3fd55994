use anyhow::Result;
use std::fs::{rename, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const MAX_LOG_BYTES: u64 = 16 * 1024 * 1024; // 16 MB
const MAX_LOG_BACKUPS: usize = 3; // number of rotated archives to keep

fn backup_path(base: &Path, n: usize) -> PathBuf {
    base.with_extension(format!("log.{}", n))
}

/// Shift `chat.log` -> `chat.log.1` -> ... -> `chat.log.<max_backups>`, dropping the oldest.
fn rotate_backups(base: &Path, max_backups: usize) {
    for i in (1..=max_backups).rev() {
        let src = if i == 1 {
            base.to_path_buf()
        } else {
            backup_path(base, i - 1)
        };
        let dst = backup_path(base, i);

        if src.exists() {
            if dst.exists() {
                let _ = std::fs::remove_file(&dst);
            }
            if rename(&src, &dst).is_err() {
                let _ = std::fs::copy(&src, &dst).and_then(|_| std::fs::remove_file(&src));
            }
        }
    }
}

/// Install a `tracing` subscriber that appends to `<dir>/chat.log`.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_logging(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("chat.log");
    if let Ok(meta) = std::fs::metadata(&path) {
        if meta.len() >= MAX_LOG_BYTES {
            rotate_backups(&path, MAX_LOG_BACKUPS);
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(path)
}
