//! `<log_dir>/<name>.csv`, one file per tracked name. Files are opened for a
//! single record and closed again; nothing is held across records.

use crate::sample::Sample;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub struct SampleStore {
    dir: PathBuf,
}

impl SampleStore {
    /// Create the log directory if it is missing.
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    /// Open (creating if absent) the log for `name` in append mode.
    pub fn open(&self, name: &str) -> std::io::Result<SampleFile> {
        let path = self.path_for(name);
        let mut opts = OpenOptions::new();
        opts.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o644);
        }
        let file = opts.open(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        Ok(SampleFile { path, writer })
    }
}

/// An open log file. Dropping it closes the handle.
pub struct SampleFile {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl SampleFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and close the file.
    pub fn write(mut self, sample: &Sample) -> Result<(), csv::Error> {
        self.writer.write_record(sample.fields())?;
        self.writer.flush()?;
        Ok(())
    }
}
