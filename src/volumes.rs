//! Root-level storage volumes shown on the top-level page.
//!
//! The dispatcher only sees [`VolumeSource`]; which volumes exist is a host
//! concern. [`SystemVolumes`] asks the OS (drive roots such as `C:\` on
//! Windows, mount points elsewhere) and [`FixedVolumes`] serves a preset list.

use sysinfo::Disks;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("volume enumeration is not supported on this platform")]
    Unsupported,

    #[error("the host reported no volumes")]
    Empty,
}

pub trait VolumeSource: Send + Sync {
    /// Returns volume identifiers in the order the host reports them.
    fn list_volumes(&self) -> Result<Vec<String>, VolumeError>;
}

/// Volumes as reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemVolumes;

impl VolumeSource for SystemVolumes {
    fn list_volumes(&self) -> Result<Vec<String>, VolumeError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(VolumeError::Unsupported);
        }

        let disks = Disks::new_with_refreshed_list();
        let names = dedup_in_order(
            disks
                .list()
                .iter()
                .map(|disk| disk.mount_point().to_string_lossy().into_owned()),
        );
        debug!(count = names.len(), "enumerated system volumes");

        if names.is_empty() {
            return Err(VolumeError::Empty);
        }
        Ok(names)
    }
}

/// A fixed list of volumes, used when serving a single confined root.
#[derive(Debug, Clone)]
pub struct FixedVolumes(Vec<String>);

impl FixedVolumes {
    pub fn new<I, S>(volumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(volumes.into_iter().map(Into::into).collect())
    }
}

impl VolumeSource for FixedVolumes {
    fn list_volumes(&self) -> Result<Vec<String>, VolumeError> {
        if self.0.is_empty() {
            return Err(VolumeError::Empty);
        }
        Ok(self.0.clone())
    }
}

// Bind mounts and overlays can surface the same mount point more than once.
fn dedup_in_order(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
