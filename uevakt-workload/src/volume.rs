//! Mounted config volume seam and its filesystem implementation.
//!
//! The volume holds exactly one config file owned by this reconciler. The
//! workload process reads the same file, so replacement must be atomic:
//! write to a temp name, then rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("config volume is not mounted at {0}")]
    NotMounted(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Interface to the mounted config volume.
pub trait ConfigVolume: Send + Sync {
    /// Whether the platform has attached the storage yet.
    fn is_mounted(&self) -> bool;

    /// Contents of `name`, or `None` if the file does not exist.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, VolumeError>;

    /// Atomically replace `name` with `content`.
    fn write_atomic(&self, name: &str, content: &[u8]) -> Result<(), VolumeError>;
}

/// Filesystem-backed volume rooted at the mount path.
#[derive(Debug, Clone)]
pub struct FsVolume {
    root: PathBuf,
}

impl FsVolume {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ConfigVolume for FsVolume {
    fn is_mounted(&self) -> bool {
        self.root.is_dir()
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, VolumeError> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(VolumeError::Read { path, source }),
        }
    }

    fn write_atomic(&self, name: &str, content: &[u8]) -> Result<(), VolumeError> {
        if !self.is_mounted() {
            return Err(VolumeError::NotMounted(self.root.clone()));
        }
        let path = self.root.join(name);
        let tmp = self.root.join(format!("{name}.tmp"));

        fs::write(&tmp, content).map_err(|source| VolumeError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| VolumeError::Write { path, source })?;

        debug!(file = name, bytes = content.len(), "config file written");
        Ok(())
    }
}
