//! Append-only record sinks.
//!
//! Every call to [RecordSink::append] is a commit point: the file is opened in append mode,
//! rows are written, flushed and synced, then the file is closed.
//! Rows written by an earlier call are never touched again.
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use log::debug;

use super::Tsv;
use crate::error::Error;
use crate::records::SentenceRecord;

#[derive(Debug, Clone)]
pub struct RecordSink {
    path: PathBuf,
    tsv: Tsv,
}

impl RecordSink {
    pub fn new(path: &Path, tsv: Tsv) -> Self {
        Self {
            path: path.to_path_buf(),
            tsv,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empty the sink. Used when a run starts from scratch.
    pub fn truncate(&self) -> Result<(), Error> {
        File::create(&self.path).map_err(|e| Error::from(e).in_file(&self.path))?;
        Ok(())
    }

    /// Append `records` and sync them to disk.
    pub fn append(&self, records: &[SentenceRecord]) -> Result<usize, Error> {
        self.append_rows(records.iter().map(SentenceRecord::to_row))
    }

    /// Append raw rows and sync them to disk.
    pub fn append_rows<I, R>(&self, rows: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::from(e).in_file(&self.path))?;

        let mut writer = self.tsv.writer(file);
        let mut nb_rows = 0;
        for row in rows {
            writer.write_record(row)?;
            nb_rows += 1;
        }
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| Error::from(e.into_error()).in_file(&self.path))?;
        file.sync_data()?;

        debug!("{:?}: appended {} rows", self.path, nb_rows);
        Ok(nb_rows)
    }
}
