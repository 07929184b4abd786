//! Per-request staging directory
//!
//! Each conversion stages the auxiliary parts of its upload into a uniquely
//! named scratch directory, which the renderer then uses as the asset and
//! font root for the document. The directory lives exactly as long as the
//! `Workspace` value: dropping it removes the directory and everything
//! staged inside, on success and failure paths alike.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Prefix for workspace directory names under the system temp root.
const DIR_PREFIX: &str = "imprenta-";

/// A per-request scratch directory, removed recursively on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh, uniquely named workspace under the system temp root.
    pub fn create() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(DIR_PREFIX).tempdir()?;
        tracing::debug!(path = %dir.path().display(), "Created conversion workspace");
        Ok(Self { dir })
    }

    /// Root of the workspace. Handed to the renderer as its asset directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Stage one file under its declared filename. An existing file with
    /// the same name is overwritten.
    pub async fn stage(&self, file_name: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        let dest = self.dir.path().join(file_name);
        tokio::fs::write(&dest, contents).await?;
        Ok(dest)
    }
}
