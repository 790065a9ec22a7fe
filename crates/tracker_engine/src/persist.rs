use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the data directory exists and accepts new files; create it if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir(format!("{} is not a directory", dir.display())));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    Ok(())
}

/// Whole-file replacement inside one directory: content goes to a temp file
/// that is synced and then renamed over the target, so readers never see a
/// half-written file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads `{dir}/{filename}`; a missing file is `Ok(None)`.
    pub fn read(&self, filename: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.dir.join(filename)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
