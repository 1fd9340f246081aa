//! Export delivery targets.
//!
//! Encoded content is handed to a sink together with its suggested filename
//! and format. The CLI delivers into a directory; tests capture in memory.

use sb_common::ExchangeFormat;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can receive an encoded export.
pub trait ExportSink {
    fn deliver(&mut self, content: &str, filename: &str, format: ExchangeFormat) -> io::Result<()>;
}

/// Writes each delivery to `<dir>/<filename>`, replacing any previous file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Paths written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

fn write_temp(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, content: &str, filename: &str, format: ExchangeFormat) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        let tmp_path = path.with_file_name(format!("{}.tmp.{}", filename, std::process::id()));
        let written = write_temp(&tmp_path, content.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        debug!(path = %path.display(), format = %format, bytes = content.len(), "Export written");
        self.written.push(path);
        Ok(())
    }
}

/// One captured delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub content: String,
    pub filename: String,
    pub format: ExchangeFormat,
}

/// Keeps deliveries in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    deliveries: Vec<Delivery>,
}

impl MemorySink {
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn last(&self) -> Option<&Delivery> {
        self.deliveries.last()
    }
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, content: &str, filename: &str, format: ExchangeFormat) -> io::Result<()> {
        self.deliveries.push(Delivery {
            content: content.to_string(),
            filename: filename.to_string(),
            format,
        });
        Ok(())
    }
}
