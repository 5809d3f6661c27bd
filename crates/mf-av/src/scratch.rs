//! Per-conversion scratch space.
//!
//! A [`Scratch`] is a uniquely named temporary directory holding the
//! uploaded input and the converted output of exactly one conversion.
//! Dropping it deletes the directory; deletion failures are logged and
//! otherwise ignored.

use std::path::{Path, PathBuf};

use mf_core::ConversionId;
use tempfile::TempDir;

/// File name of the uploaded input inside a scratch directory.
pub const INPUT_FILE_NAME: &str = "temp_input.mp4";

/// File name of the converted output inside a scratch directory.
pub const OUTPUT_FILE_NAME: &str = "temp_output.mp3";

/// Temporary directory owned by a single conversion.
///
/// # Example
///
/// ```no_run
/// use mf_av::Scratch;
/// use mf_core::ConversionId;
///
/// let scratch = Scratch::create_in(&std::env::temp_dir(), ConversionId::new())?;
/// std::fs::write(scratch.input(), b"...")?;
/// // ... run ffmpeg from scratch.input() to scratch.output() ...
/// drop(scratch); // directory and both files are gone
/// # Ok::<(), mf_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Scratch {
    id: ConversionId,
    path: PathBuf,
    dir: Option<TempDir>,
}

impl Scratch {
    /// Create a new scratch directory under `root`, creating `root` if needed.
    pub fn create_in(root: &Path, id: ConversionId) -> mf_core::Result<Self> {
        std::fs::create_dir_all(root)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("mp3forge-{}-", id.short()))
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();

        tracing::debug!(conversion_id = %id, "Created scratch dir {}", path.display());

        Ok(Self {
            id,
            path,
            dir: Some(dir),
        })
    }

    /// Conversion this scratch space belongs to.
    pub fn id(&self) -> ConversionId {
        self.id
    }

    /// Path to the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path the uploaded bytes are written to.
    pub fn input(&self) -> PathBuf {
        self.path.join(INPUT_FILE_NAME)
    }

    /// Path ffmpeg writes the MP3 to.
    pub fn output(&self) -> PathBuf {
        self.path.join(OUTPUT_FILE_NAME)
    }

    /// Delete the scratch directory now, reporting failure to the caller.
    pub fn close(mut self) -> std::io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => {
                tracing::debug!(conversion_id = %self.id, "Removed scratch dir {}", self.path.display());
            }
            Err(e) => {
                tracing::warn!(
                    conversion_id = %self.id,
                    "Failed to clean up scratch dir {}: {e}",
                    self.path.display()
                );
            }
        }
    }
}
