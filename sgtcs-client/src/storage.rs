//! On-disk layout of one enrollment: `<hostname>/<subdir>/` with four files

use crate::types::TrackingRecord;
use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const KEY_FILE: &str = "hostkey.pem";
pub const CSR_FILE: &str = "hostreq.pem";
pub const REQUEST_ID_FILE: &str = "requestid.txt";
pub const CERT_FILE: &str = "hostcert.pem";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("directory {0} already exists; refusing to overwrite an earlier request")]
    DirectoryExists(PathBuf),

    #[error("{0:?} cannot be used as a directory name")]
    InvalidComponent(String),

    #[error("{0} is in the way and is not a directory; move it or remove it")]
    NotADirectory(PathBuf),

    #[error("directory {0} does not exist; was a request submitted for it?")]
    MissingDirectory(PathBuf),

    #[error("no request id at {0}; was the request submitted?")]
    MissingTrackingRecord(PathBuf),

    #[error("request id file {0} is empty")]
    EmptyTrackingRecord(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Progress of one hostname/period, derived from which files exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    New,
    Submitted,
    Retrieved,
}

/// Paths of one `<hostname>/<subdir>` enrollment directory
#[derive(Debug, Clone)]
pub struct StorageLayout {
    hostname: String,
    subdir: String,
    host_dir: PathBuf,
    dir: PathBuf,
}

impl StorageLayout {
    /// Layout rooted at `base/<hostname>/<subdir>`.
    pub fn new(base: impl AsRef<Path>, hostname: &str, subdir: &str) -> Self {
        let host_dir = base.as_ref().join(hostname);
        let dir = host_dir.join(subdir);
        Self {
            hostname: hostname.to_string(),
            subdir: subdir.to_string(),
            host_dir,
            dir,
        }
    }

    /// Both names must stay one level below their parent.
    fn check_components(&self) -> Result<(), StorageError> {
        for name in [&self.hostname, &self.subdir] {
            let mut components = Path::new(name).components();
            let single = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single || name.contains('/') || name.contains('\\') {
                return Err(StorageError::InvalidComponent(name.clone()));
            }
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(KEY_FILE)
    }

    pub fn csr_path(&self) -> PathBuf {
        self.dir.join(CSR_FILE)
    }

    pub fn request_id_path(&self) -> PathBuf {
        self.dir.join(REQUEST_ID_FILE)
    }

    pub fn cert_path(&self) -> PathBuf {
        self.dir.join(CERT_FILE)
    }

    pub fn state(&self) -> EnrollmentState {
        if self.cert_path().is_file() {
            EnrollmentState::Retrieved
        } else if self.request_id_path().is_file() {
            EnrollmentState::Submitted
        } else {
            EnrollmentState::New
        }
    }

    /// Create the directory for a new request.
    ///
    /// The hostname directory is created if missing; the period directory
    /// must not exist yet.
    pub fn create(&self) -> Result<(), StorageError> {
        self.check_components()?;
        if self.host_dir.exists() && !self.host_dir.is_dir() {
            return Err(StorageError::NotADirectory(self.host_dir.clone()));
        }
        if !self.host_dir.exists() {
            dir_builder()
                .recursive(true)
                .create(&self.host_dir)
                .map_err(|e| StorageError::io(&self.host_dir, e))?;
        }

        match dir_builder().create(&self.dir) {
            Ok(()) => {
                tracing::debug!(dir = %self.dir.display(), "created request directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StorageError::DirectoryExists(self.dir.clone()))
            }
            Err(e) => Err(StorageError::io(&self.dir, e)),
        }
    }

    /// Check that an earlier request left its directory behind.
    pub fn open(&self) -> Result<(), StorageError> {
        self.check_components()?;
        if !self.dir.is_dir() {
            return Err(StorageError::MissingDirectory(self.dir.clone()));
        }
        Ok(())
    }

    pub fn write_csr(&self, pem: &str) -> Result<(), StorageError> {
        let path = self.csr_path();
        fs::write(&path, pem).map_err(|e| StorageError::io(&path, e))
    }

    /// Persist the request id; an existing record is never replaced.
    pub fn write_tracking_record(&self, record: &TrackingRecord) -> Result<(), StorageError> {
        let path = self.request_id_path();
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| StorageError::io(&path, e))?;
        file.write_all(record.as_str().as_bytes())
            .map_err(|e| StorageError::io(&path, e))
    }

    pub fn read_tracking_record(&self) -> Result<TrackingRecord, StorageError> {
        let path = self.request_id_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::MissingTrackingRecord(path));
            }
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        let id = text.trim();
        if id.is_empty() {
            return Err(StorageError::EmptyTrackingRecord(path));
        }
        Ok(TrackingRecord::new(id))
    }

    pub fn write_certificate(&self, pem: &str) -> Result<(), StorageError> {
        let path = self.cert_path();
        fs::write(&path, pem).map_err(|e| StorageError::io(&path, e))
    }
}

fn dir_builder() -> DirBuilder {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
}
