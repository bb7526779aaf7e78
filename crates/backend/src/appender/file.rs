//! crates/backend/src/appender/file.rs
//! Appender writing to a file opened in append or truncate mode.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::Appender;
use crate::error::ConfigError;
use crate::layout::Layout;
use crate::record::Record;

/// Appender writing formatted records to a file.
///
/// The file is opened when the appender is created. Each record is written
/// with a single `write_all` under the appender's lock, so lines from
/// different threads never interleave.
#[derive(Debug)]
pub struct FileAppender {
    name: String,
    path: PathBuf,
    layout: Layout,
    file: Mutex<File>,
}

impl FileAppender {
    /// Opens `path` for appending (or truncates it when `append` is false).
    pub fn open(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        append: bool,
        layout: Layout,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|source| ConfigError::OpenAppender {
                name: name.clone(),
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            name,
            path,
            layout,
            file: Mutex::new(file),
        })
    }

    /// Path of the target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        let line = self.layout.format(record);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}
