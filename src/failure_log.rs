//! Crash-safe sidecar log of failed page offsets

use crate::error::Result;
use crate::types::RunStamp;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the failure log for one run
pub fn failure_log_name(stamp: &RunStamp) -> String {
    format!("failed_offsets_{stamp}.txt")
}

/// Sidecar log of failed page offsets, one integer per line
///
/// Each offset is appended the moment its page is declared failed, so a crash
/// later in the run cannot lose what was already recorded. A clean run leaves
/// no file behind. [`FailureLog::finalize`] rewrites the file from the full
/// in-memory list at normal run end, producing the same content the appends
/// did.
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    /// Log location for one run; the file appears on the first failure
    pub fn new(output_dir: &Path, stamp: &RunStamp) -> Self {
        Self {
            path: output_dir.join(failure_log_name(stamp)),
        }
    }

    /// Path the log is (or would be) written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once at least one offset has been recorded
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append one failed offset, creating the file on first use
    pub fn append(&self, offset: u64) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{offset}\n").as_bytes())?;

        tracing::debug!(offset, path = %self.path.display(), "Failed offset recorded");

        Ok(())
    }

    /// Rewrite the log from the complete in-memory list at run end
    ///
    /// No failures means no file. For a run that ended normally this produces
    /// exactly what the appends already wrote; the rewrite keeps the final
    /// artifact deterministic regardless of what happened to the file in the
    /// meantime.
    pub fn finalize(&self, offsets: &[u64]) -> Result<()> {
        if offsets.is_empty() {
            return Ok(());
        }

        let mut content = String::new();
        for offset in offsets {
            content.push_str(&offset.to_string());
            content.push('\n');
        }
        std::fs::write(&self.path, content)?;

        Ok(())
    }

    /// Offsets currently recorded, in file order
    ///
    /// Lines that do not parse as integers are skipped with a warning rather
    /// than failing the read.
    pub fn load(&self) -> Result<Vec<u64>> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut offsets = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u64>() {
                Ok(offset) => offsets.push(offset),
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping unparseable failure log line");
                }
            }
        }
        Ok(offsets)
    }
}
