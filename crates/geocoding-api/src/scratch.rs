//! Per-request scratch files under the upload and output directories

use crate::table::FileKind;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unique tag for one request's files: wall-clock time down to the
/// microsecond plus a process-wide sequence number.
pub fn request_stamp() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S_%6f"), seq)
}

/// Directories holding uploaded inputs and generated outputs
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl ScratchSpace {
    pub fn new(upload_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            upload_dir,
            output_dir,
        }
    }

    /// Create both directories if missing
    pub async fn prepare(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await
    }

    pub fn input_path(&self, stamp: &str, kind: FileKind) -> PathBuf {
        self.upload_dir
            .join(format!("input_{}{}", stamp, kind.extension()))
    }

    /// Output path and the bare filename used for Content-Disposition
    pub fn output_path(&self, prefix: &str, stamp: &str) -> (PathBuf, String) {
        let filename = format!("{}_{}.csv", prefix, stamp);
        (self.output_dir.join(&filename), filename)
    }
}

/// Write an uploaded input. A failed write removes whatever it left behind.
pub async fn store(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Err(e) = tokio::fs::write(path, data).await {
        discard(path).await;
        return Err(e);
    }
    Ok(())
}

/// Remove an uploaded input, logging instead of failing
pub async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove uploaded file");
        }
    }
}
