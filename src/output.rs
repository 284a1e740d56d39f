//! Report destinations.
//!
//! Files are written as each repository finishes, so a failed run keeps what it already
//! produced. Stdout output is buffered and printed once the run succeeds.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    File,
    Stdout,
}

/// Receives rendered repository blocks in iteration order.
pub trait ReportSink {
    /// Called once the repository list is known, before the first block.
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn append(&mut self, block: &str) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ReportSink for String {
    fn append(&mut self, block: &str) -> io::Result<()> {
        self.push_str(block);
        Ok(())
    }
}

/// `<root>/<org>/<author>.md`. Organization and author each contribute one path component.
pub fn report_path(root: &Path, org: &str, author: &str) -> PathBuf {
    root.join(path_segment(org)).join(path_segment(&format!("{author}.md")))
}

/// Last normal component of `value`; `..`, roots and prefixes are dropped.
fn path_segment(value: &str) -> OsString {
    Path::new(value)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_owned()),
            _ => None,
        })
        .last()
        .unwrap_or_else(|| OsString::from("_"))
}

#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn open(&mut self) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        self.file = Some(File::create(&self.path)?);
        Ok(())
    }

    fn append(&mut self, block: &str) -> io::Result<()> {
        if self.file.is_none() {
            self.open()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("report file is not open"))?;
        file.write_all(block.as_bytes())?;
        file.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }
}

/// Collects the whole document and prints it on `finish`.
#[derive(Debug, Default)]
pub struct StdoutSink {
    buffer: String,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for StdoutSink {
    fn append(&mut self, block: &str) -> io::Result<()> {
        self.buffer.push_str(block);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.buffer.as_bytes())?;
        stdout.flush()?;
        self.buffer.clear();
        Ok(())
    }
}
