//! Storage configuration.
//!
//! Resolved once at process startup and passed into every [`TableStore`](crate::TableStore).
//! Nothing in the core reads environment variables or assumes a working-directory-relative
//! path on its own.

use crate::constants::{DEFAULT_DATA_DIR, TABLE_FILE_EXTENSION};
use crate::{HospitalError, HospitalResult};
use std::path::{Path, PathBuf};

/// What a store does when its storage directory is missing at save time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirPolicy {
    /// Create the directory (and any parents) before writing.
    #[default]
    CreateIfMissing,
    /// Fail with [`HospitalError::StorageDirMissing`].
    RequireExisting,
}

/// Where table files live and how their directory is managed.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    data_dir: PathBuf,
    dir_policy: DirPolicy,
}

impl StorageConfig {
    /// Create a new `StorageConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`HospitalError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: impl Into<PathBuf>, dir_policy: DirPolicy) -> HospitalResult<Self> {
        let data_dir = data_dir.into();
        if data_dir.as_os_str().is_empty() {
            return Err(HospitalError::InvalidInput(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            dir_policy,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn dir_policy(&self) -> DirPolicy {
        self.dir_policy
    }

    /// Path of the backing file for the table called `name`.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{TABLE_FILE_EXTENSION}"))
    }

    /// Make sure the data directory exists according to the configured policy.
    pub(crate) fn ensure_data_dir(&self) -> HospitalResult<()> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        match self.dir_policy {
            DirPolicy::CreateIfMissing => {
                std::fs::create_dir_all(&self.data_dir).map_err(HospitalError::StorageDirCreation)
            }
            DirPolicy::RequireExisting => {
                Err(HospitalError::StorageDirMissing(self.data_dir.clone()))
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dir_policy: DirPolicy::default(),
        }
    }
}

/// Resolve the data directory from an optional override value.
///
/// `None` or a blank value falls back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
