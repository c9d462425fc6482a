//! Tab-separated file settings.
//!
//! Every file read or written by the crate is tab-delimited and headerless.
//! The quote character is configurable and carries no meaning beyond quoting.
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tsv {
    quote: u8,
}

impl Default for Tsv {
    fn default() -> Self {
        Self { quote: b'"' }
    }
}

impl Tsv {
    pub fn with_quote(quote: u8) -> Self {
        Self { quote }
    }

    pub fn quote(&self) -> u8 {
        self.quote
    }

    pub fn reader<R: Read>(&self, r: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(b'\t')
            .quote(self.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(r)
    }

    pub fn reader_from_path(&self, path: &Path) -> Result<csv::Reader<File>, Error> {
        let file = File::open(path).map_err(|e| Error::from(e).in_file(path))?;
        Ok(self.reader(file))
    }

    pub fn writer<W: Write>(&self, w: W) -> csv::Writer<W> {
        WriterBuilder::new()
            .delimiter(b'\t')
            .quote(self.quote)
            .has_headers(false)
            .flexible(true)
            .from_writer(w)
    }

    /// Create (or truncate) `path` and return a writer on it.
    pub fn writer_from_path(&self, path: &Path) -> Result<csv::Writer<File>, Error> {
        let file = File::create(path).map_err(|e| Error::from(e).in_file(path))?;
        Ok(self.writer(file))
    }

    /// Read a whole file into memory.
    pub fn read_rows(&self, path: &Path) -> Result<Vec<StringRecord>, Error> {
        let mut reader = self.reader_from_path(path)?;
        reader
            .records()
            .map(|r| r.map_err(|e| Error::from(e).in_file(path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_roundtrip() {
        let tsv = Tsv::with_quote(b'\'');
        let mut w = tsv.writer(Vec::new());
        w.write_record(["1", "it's\ta tab", "plain"]).unwrap();
        let data = w.into_inner().unwrap();

        let rows: Vec<StringRecord> = tsv.reader(data.as_slice()).records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "it's\ta tab");
        assert_eq!(&rows[0][2], "plain");
    }

    #[test]
    fn ragged_rows() {
        let tsv = Tsv::default();
        let rows: Vec<StringRecord> = tsv
            .reader("a\tb\nc\td\te\n".as_bytes())
            .records()
            .map(Result::unwrap)
            .collect();
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 3);
    }
}
