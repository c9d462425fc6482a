/*! Title → URL index.

Built from a directory of dumps in another language, then used to append the URL of the
matching foreign article to every row of a sentence record file.

Files are scanned in sorted path order and later files overwrite earlier ones on title collision,
so the index is the same from one run to another.
!*/
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use csv::StringRecord;
use log::{debug, info, warn};

use crate::dump::Dump;
use crate::error::Error;
use crate::io::{list_files, Tsv};

/// Value written when a title has no known URL.
pub const NOT_FOUND: &str = "NOT_FOUND";

#[derive(Debug, Default, Clone)]
pub struct TitleUrlIndex {
    urls: HashMap<String, String>,
}

impl TitleUrlIndex {
    /// Scan every file under `document_dir`.
    pub fn build(document_dir: &Path) -> Result<Self, Error> {
        let files = list_files(document_dir)?;
        info!("Number of files found: {}", files.len());
        info!("Extracting URLs from files...");

        let mut index = Self::default();
        for file in files {
            index.add_file(&file)?;
        }

        info!("Extracted the URLs of {} articles.", index.len());
        Ok(index)
    }

    /// Add the `(title, url)` pairs of a single dump file.
    pub fn add_file(&mut self, path: &Path) -> Result<(), Error> {
        for article in Dump::from_path(path)?.headers_only() {
            let article = article?;
            if let Some(previous) = self.urls.insert(article.title, article.url) {
                debug!("{:?}: title collision, replacing {}", path, previous);
            }
        }
        Ok(())
    }

    pub fn insert(&mut self, title: String, url: String) -> Option<String> {
        self.urls.insert(title, url)
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.urls.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Append a URL column to every row, looking up the title at `title_column`.
    ///
    /// Rows are otherwise untouched. Returns the annotated rows and the distinct titles
    /// that were not found, in order of first appearance.
    pub fn annotate<I>(
        &self,
        rows: I,
        title_column: usize,
    ) -> Result<(Vec<StringRecord>, Vec<String>), Error>
    where
        I: IntoIterator<Item = StringRecord>,
    {
        let mut annotator = Annotator::new(self, title_column);
        let rows = rows
            .into_iter()
            .map(|row| annotator.annotate_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rows, annotator.missing))
    }

    /// File to file version of [Self::annotate]. Rows are streamed.
    pub fn annotate_file(
        &self,
        input: &Path,
        title_column: usize,
        output: &Path,
        tsv: Tsv,
    ) -> Result<Vec<String>, Error> {
        info!("Adding a column with URLs and saving to {:?}...", output);
        let mut reader = tsv.reader_from_path(input)?;
        let mut writer = tsv.writer_from_path(output)?;
        let mut annotator = Annotator::new(self, title_column);

        for row in reader.records() {
            let row = annotator
                .annotate_row(row?)
                .map_err(|e| e.in_file(input))?;
            writer.write_record(&row)?;
        }
        writer.flush()?;

        if !annotator.missing.is_empty() {
            warn!(
                "Failed to find URLs for {} articles.",
                annotator.missing.len()
            );
        }
        info!("Task completed and output saved to {:?}.", output);
        Ok(annotator.missing)
    }
}

/// Per-run annotation state: remembers which titles were already reported missing.
struct Annotator<'a> {
    index: &'a TitleUrlIndex,
    title_column: usize,
    warned: HashSet<String>,
    missing: Vec<String>,
    line: usize,
}

impl<'a> Annotator<'a> {
    fn new(index: &'a TitleUrlIndex, title_column: usize) -> Self {
        Self {
            index,
            title_column,
            warned: HashSet::new(),
            missing: Vec::new(),
            line: 0,
        }
    }

    fn annotate_row(&mut self, mut row: StringRecord) -> Result<StringRecord, Error> {
        self.line += 1;
        let title = row.get(self.title_column).ok_or_else(|| {
            Error::Custom(format!(
                "row {} has no column {} ({} columns)",
                self.line,
                self.title_column,
                row.len()
            ))
        })?;

        match self.index.get(title) {
            Some(url) => {
                let url = url.to_string();
                row.push_field(&url);
            }
            None => {
                if self.warned.insert(title.to_string()) {
                    warn!("Could not find the URL for article title {:?}.", title);
                    self.missing.push(title.to_string());
                }
                row.push_field(NOT_FOUND);
            }
        }
        Ok(row)
    }
}
