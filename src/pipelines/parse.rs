//! Document parsing pipeline.
//!
//! Dump files are processed in batches of `workers × files_per_worker` files.
//!
//! # Processing
//! 1. If a match language is set, the lookup store is checked once. Failure aborts the run.
//! 1. Each file of a batch is handled by one worker of a [rayon] pool: articles are extracted,
//!    turned into sentence records, and (optionally) routed to the matched/unmatched streams
//!    depending on whether the article has a title in the match language.
//! 1. Once every file of the batch is done, records are appended to their sinks.
//!    A crash after batch `k` keeps everything up to batch `k`.
//!
//! Batches are sequential, files inside a batch are parallel.
//! Within a batch, records are written in file order.
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::dump::Dump;
use crate::error::Error;
use crate::io::{list_files, RecordSink};
use crate::records::{Records, SentenceRecord};
use crate::resolve::{Connect, Resolve, Routed};
use crate::segment::Segmenter;

use super::Pipeline;

/// What to do when a file of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Fail the batch, flushing nothing from it.
    #[default]
    Abort,
    /// Log the error and keep the records of the other files.
    Skip,
}

impl FromStr for OnError {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown error policy {other:?} (abort|skip)")),
        }
    }
}

/// Placeholder connector for runs without title matching.
#[derive(Debug, Clone, Copy)]
pub struct NoLookup;

impl Resolve for NoLookup {
    fn resolve(&mut self, _: &str, _: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }
}

impl Connect for NoLookup {
    type Resolver = NoLookup;
    fn connect(&self) -> Result<Self::Resolver, Error> {
        Ok(NoLookup)
    }
}

struct Resolution<C> {
    connector: C,
    lang: String,
    no_match: RecordSink,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseSummary {
    pub files: usize,
    pub batches: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub skipped: Vec<PathBuf>,
}

pub struct ParseDocuments<C = NoLookup> {
    src: PathBuf,
    lang: String,
    segmenter: Box<dyn Segmenter + Send + Sync>,
    match_sink: RecordSink,
    resolution: Option<Resolution<C>>,
    workers: usize,
    files_per_worker: usize,
    on_error: OnError,
    start_batch: usize,
}

impl ParseDocuments<NoLookup> {
    /// Without title matching, every record goes to `match_sink`.
    pub fn new(
        src: PathBuf,
        lang: String,
        segmenter: Box<dyn Segmenter + Send + Sync>,
        match_sink: RecordSink,
    ) -> Self {
        Self {
            src,
            lang,
            segmenter,
            match_sink,
            resolution: None,
            workers: rayon::current_num_threads(),
            files_per_worker: 1,
            on_error: OnError::default(),
            start_batch: 0,
        }
    }
}

impl<C: Connect> ParseDocuments<C> {
    /// Look up article titles in `lang` through `connector`.
    /// Articles without a title go to `no_match`.
    pub fn resolve_with<D: Connect>(
        self,
        connector: D,
        lang: String,
        no_match: RecordSink,
    ) -> ParseDocuments<D> {
        ParseDocuments {
            src: self.src,
            lang: self.lang,
            segmenter: self.segmenter,
            match_sink: self.match_sink,
            resolution: Some(Resolution {
                connector,
                lang,
                no_match,
            }),
            workers: self.workers,
            files_per_worker: self.files_per_worker,
            on_error: self.on_error,
            start_batch: self.start_batch,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn files_per_worker(mut self, files_per_worker: usize) -> Self {
        self.files_per_worker = files_per_worker;
        self
    }

    pub fn on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Skip the first `start_batch` batches, appending to existing sinks.
    /// Used to resume a crashed run at its first unflushed batch.
    pub fn start_batch(mut self, start_batch: usize) -> Self {
        self.start_batch = start_batch;
        self
    }

    fn batch_size(&self) -> usize {
        self.workers * self.files_per_worker
    }

    /// Extract, generate and route the records of a single file.
    ///
    /// Opens its own lookup connection, closed when the file is done.
    fn process_file(&self, path: &Path) -> Result<Routed<SentenceRecord>, Error> {
        debug!("working on {:?}", path);
        let mut resolver = match &self.resolution {
            Some(resolution) => Some(resolution.connector.connect()?),
            None => None,
        };

        let mut routed = Routed::default();
        for article in Dump::from_path(path)? {
            let article = article?;
            let records = Records::new(&article, self.segmenter.as_ref(), &self.lang);

            match (&mut resolver, &self.resolution) {
                (Some(resolver), Some(resolution)) => {
                    let matched = resolver
                        .resolve(&article.id, &resolution.lang)
                        .map_err(|e| Error::Lookup {
                            article_id: article.id.clone(),
                            source: Box::new(e),
                        })?;
                    match matched {
                        Some(title) => routed
                            .matched
                            .extend(records.map(|r| r.with_match(title.clone()))),
                        None => {
                            debug!("article {} has no {} title", article.id, resolution.lang);
                            routed.unmatched.extend(records)
                        }
                    }
                }
                _ => routed.matched.extend(records),
            }
        }

        Ok(routed)
    }

    /// Write a batch's records. This is the batch commit point.
    fn flush(&self, routed: &Routed<SentenceRecord>) -> Result<(), Error> {
        self.match_sink.append(&routed.matched)?;
        if let Some(resolution) = &self.resolution {
            resolution.no_match.append(&routed.unmatched)?;
        }
        Ok(())
    }

    fn truncate_sinks(&self) -> Result<(), Error> {
        self.match_sink.truncate()?;
        if let Some(resolution) = &self.resolution {
            resolution.no_match.truncate()?;
        }
        Ok(())
    }
}

impl<C: Connect> Pipeline<ParseSummary> for ParseDocuments<C> {
    fn version() -> &'static str {
        "0.1.0"
    }

    fn run(&self) -> Result<ParseSummary, Error> {
        if self.workers == 0 || self.files_per_worker == 0 {
            return Err(Error::Custom(
                "workers and files per worker must be at least 1".to_string(),
            ));
        }

        info!("Parsing {:?} (pipeline v{})", self.src, Self::version());
        if let Some(resolution) = &self.resolution {
            info!(
                "Titles will be looked up in language {:?}. Testing access to the lookup store...",
                resolution.lang
            );
            resolution.connector.verify()?;
            info!("Lookup store can be accessed.");
        }

        let files = list_files(&self.src)?;
        let batch_size = self.batch_size();
        let nb_batches = (files.len() + batch_size - 1) / batch_size;
        info!("Number of files found: {}", files.len());
        info!(
            "Created {} batch(es) of up to {} files ({} file(s) each for {} workers)",
            nb_batches,
            batch_size,
            self.files_per_worker,
            self.workers
        );

        if self.start_batch == 0 {
            self.truncate_sinks()?;
        } else {
            warn!(
                "Resuming at batch {}, appending to existing output",
                self.start_batch
            );
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::Custom(format!("could not build worker pool: {e}")))?;

        let mut summary = ParseSummary {
            files: files.len(),
            batches: nb_batches,
            ..Default::default()
        };
        let mut done = (self.start_batch * batch_size).min(files.len());

        for (batch_idx, batch) in files
            .chunks(batch_size)
            .enumerate()
            .skip(self.start_batch)
        {
            let results: Vec<(&PathBuf, Result<Routed<SentenceRecord>, Error>)> =
                pool.install(|| {
                    batch
                        .par_iter()
                        .map(|path| (path, self.process_file(path)))
                        .collect()
                });

            let mut routed = Routed::default();
            for (path, result) in results {
                match result {
                    Ok(r) => routed.extend(r),
                    Err(e) => match self.on_error {
                        OnError::Abort => {
                            error!("batch {} failed on {:?}", batch_idx, path);
                            return Err(e.in_file(path));
                        }
                        OnError::Skip => {
                            error!("batch {}: skipping {:?}: {}", batch_idx, path, e);
                            summary.skipped.push(path.clone());
                        }
                    },
                }
            }

            self.flush(&routed)?;
            summary.matched += routed.matched.len();
            summary.unmatched += routed.unmatched.len();

            done += batch.len();
            info!("Parsed {}/{} files.", done, files.len());
        }

        Ok(summary)
    }
}
