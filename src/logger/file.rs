use super::Logger;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File logger that appends one line per item.
pub struct FileLogger {
    file: File,
    path: PathBuf,
}

impl FileLogger {
    /// Create a new file logger.
    ///
    /// The file is opened in append mode and created if absent; existing
    /// content is never truncated.
    ///
    /// # Arguments
    ///
    /// * `path` - The file path.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().append(true).create(true).open(&path)?;

        Ok(Self { file, path })
    }

    /// Append one line to the file.
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }

    /// The path the logger writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger<String> for FileLogger {
    fn log(&mut self, item: String) {
        if let Err(err) = self.write_line(&item) {
            log::error!("Failed to write to {} => {err}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut logger = FileLogger::new(&path).unwrap();
        logger.write_line("first").unwrap();
        drop(logger);

        let mut logger = FileLogger::new(&path).unwrap();
        logger.write_line("second").unwrap();
        drop(logger);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
