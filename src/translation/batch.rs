//! Chunked translation with oversize fallback and incremental saving.
//!
//! Per chunk: `Pending → Requested → Succeeded`, or
//! `Requested → OversizeFailed → PerItemRequested → Succeeded` when the request is too long.
//! Any other failure aborts the run. Translations of completed chunks are appended to the save
//! file before the next request is sent, so an aborted run can be resumed.
use std::{
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use log::{info, warn};

use super::{Translate, TranslateError};
use crate::error::Error;
use crate::io::{RecordSink, Tsv};

pub const DEFAULT_CHUNK_SIZE: usize = 25;

/// A text to translate, along with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationJob<'a> {
    pub ordinal: usize,
    pub text: &'a str,
}

/// Logs progress each time another ~1% of the input is done.
struct Progress {
    total: usize,
    every: usize,
    last_mark: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            every: (total / 100).max(1),
            last_mark: 0,
        }
    }

    fn update(&mut self, done: usize) {
        let mark = done - (done % self.every);
        if mark != 0 && mark > self.last_mark {
            info!("Translated {}/{} sentences.", mark, self.total);
            self.last_mark = mark;
        }
    }
}

pub struct BatchTranslator<T> {
    backend: T,
    chunk_size: usize,
    save_path: Option<PathBuf>,
    resume: bool,
    pause: Option<Duration>,
    tsv: Tsv,
}

impl<T: Translate> BatchTranslator<T> {
    pub fn new(backend: T) -> Self {
        Self {
            backend,
            chunk_size: DEFAULT_CHUNK_SIZE,
            save_path: None,
            resume: false,
            pause: None,
            tsv: Tsv::default(),
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Append every translated chunk to `path` as `ordinal\ttranslation` rows.
    pub fn save_to(mut self, path: &Path) -> Self {
        self.save_path = Some(path.to_path_buf());
        self
    }

    /// Keep the translations already present in the save file instead of truncating it.
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Wait between two requests.
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = Some(pause);
        self
    }

    pub fn tsv(mut self, tsv: Tsv) -> Self {
        self.tsv = tsv;
        self
    }

    pub fn backend(&self) -> &T {
        &self.backend
    }

    /// Translate `texts`. The i-th output is the translation of the i-th input.
    pub fn translate(
        &self,
        texts: &[&str],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, Error> {
        info!("Sentences to translate: {}", texts.len());
        let save = self
            .save_path
            .as_ref()
            .map(|path| RecordSink::new(path, self.tsv));

        let mut translated = match (&save, self.resume) {
            (Some(save), true) => self.load_saved(save.path(), texts.len())?,
            (Some(save), false) => {
                save.truncate()?;
                Vec::new()
            }
            (None, _) => Vec::new(),
        };
        if !translated.is_empty() {
            info!("Resuming after {} saved translations.", translated.len());
        }

        let jobs: Vec<TranslationJob> = texts
            .iter()
            .enumerate()
            .skip(translated.len())
            .map(|(ordinal, text)| TranslationJob { ordinal, text: *text })
            .collect();

        let mut progress = Progress::new(texts.len());
        for chunk in jobs.chunks(self.chunk_size) {
            let chunk_idx = chunk[0].ordinal / self.chunk_size;
            let out = self.translate_chunk(chunk_idx, chunk, source_lang, target_lang)?;

            if let Some(save) = &save {
                save.append_rows(
                    chunk
                        .iter()
                        .zip(out.iter())
                        .map(|(job, t)| [job.ordinal.to_string(), t.clone()]),
                )?;
            }
            translated.extend(out);
            progress.update(translated.len());
        }

        Ok(translated)
    }

    fn wait(&self) {
        if let Some(pause) = self.pause {
            thread::sleep(pause);
        }
    }

    fn request(
        &self,
        chunk_idx: usize,
        texts: &[&str],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        let out = self
            .backend
            .translate_sentences(texts, source_lang, target_lang);
        self.wait();
        let out = out?;
        if out.len() != texts.len() {
            warn!("chunk {}: got {} translations for {} texts", chunk_idx, out.len(), texts.len());
            return Err(TranslateError::Mismatch {
                expected: texts.len(),
                got: out.len(),
            });
        }
        Ok(out)
    }

    fn translate_chunk(
        &self,
        chunk_idx: usize,
        chunk: &[TranslationJob],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, Error> {
        let texts: Vec<&str> = chunk.iter().map(|job| job.text).collect();

        match self.request(chunk_idx, &texts, source_lang, target_lang) {
            Ok(out) => Ok(out),
            Err(TranslateError::Oversize { status }) => {
                warn!("chunk {}: request too long (status {}).", chunk_idx, status);
                warn!("Sending the {} sentences of this chunk one by one...", texts.len());
                let mut out = Vec::with_capacity(texts.len());
                for text in &texts {
                    let mut single = self
                        .request(chunk_idx, std::slice::from_ref(text), source_lang, target_lang)
                        .map_err(|source| Error::Translation {
                            chunk: chunk_idx,
                            source,
                        })?;
                    out.append(&mut single);
                }
                warn!("Done, resuming normal operation...");
                Ok(out)
            }
            Err(source) => Err(Error::Translation {
                chunk: chunk_idx,
                source,
            }),
        }
    }

    /// Read the translations of a previous run. Ordinals must be 0, 1, 2… without gaps.
    fn load_saved(&self, path: &Path, nb_texts: usize) -> Result<Vec<String>, Error> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let rows = self.tsv.read_rows(path)?;
        if rows.len() > nb_texts {
            return Err(Error::Custom(format!(
                "{:?} holds {} translations but the input only has {} texts",
                path,
                rows.len(),
                nb_texts
            )));
        }

        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let ordinal = row.get(0).and_then(|o| o.parse::<usize>().ok());
                match (ordinal, row.get(1)) {
                    (Some(ordinal), Some(text)) if ordinal == idx => Ok(text.to_string()),
                    _ => Err(Error::Custom(format!(
                        "{:?}: unexpected row {} in save file",
                        path,
                        idx + 1
                    ))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::tests::StubBackend;

    fn sentences(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("sentence number {i}")).collect()
    }

    fn refs(s: &[String]) -> Vec<&str> {
        s.iter().map(String::as_str).collect()
    }

    #[test]
    fn length_and_order() {
        let input = sentences(60);
        let t = BatchTranslator::new(StubBackend::new(usize::MAX));
        let out = t.translate(&refs(&input), "EN", "DE").unwrap();

        assert_eq!(out.len(), input.len());
        for (i, o) in input.iter().zip(out.iter()) {
            assert_eq!(o, &format!("[DE] {}", i.to_uppercase()));
        }
        assert_eq!(*t.backend().requests.borrow(), vec![25, 25, 10]);
    }

    #[test]
    fn oversize_chunk_falls_back_per_item() {
        let input = sentences(25);
        let direct = BatchTranslator::new(StubBackend::new(usize::MAX))
            .translate(&refs(&input), "EN", "DE")
            .unwrap();

        // every single sentence fits, the whole chunk does not
        let t = BatchTranslator::new(StubBackend::new(30));
        let fallback = t.translate(&refs(&input), "EN", "DE").unwrap();

        assert_eq!(fallback, direct);
        let requests = t.backend().requests.borrow();
        assert_eq!(requests.len(), 26);
        assert_eq!(requests[0], 25);
        assert!(requests[1..].iter().all(|n| *n == 1));
    }

    #[test]
    fn fallback_only_for_the_oversized_chunk() {
        let mut input: Vec<String> = (0..4).map(|i| format!("s{i}")).collect();
        input[1] = "x".repeat(40);
        let t = BatchTranslator::new(StubBackend::new(40)).chunk_size(2);
        let out = t.translate(&refs(&input), "EN", "DE").unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[1], format!("[DE] {}", "X".repeat(40)));
        assert_eq!(*t.backend().requests.borrow(), vec![2, 1, 1, 2]);
    }

    #[test]
    fn other_failure_is_fatal_but_saved_output_stays() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("save.tsv");
        let input = sentences(6);

        let mut backend = StubBackend::new(usize::MAX);
        backend.fail_on = Some(input[4].clone());
        let t = BatchTranslator::new(backend).chunk_size(2).save_to(&save);
        let res = t.translate(&refs(&input), "EN", "DE");

        assert!(matches!(res, Err(Error::Translation { chunk: 2, .. })));
        let saved = std::fs::read_to_string(&save).unwrap();
        assert_eq!(saved.lines().count(), 4);
        assert!(saved.lines().next().unwrap().starts_with("0\t"));
    }

    #[test]
    fn resume_skips_saved() {
        let dir = tempfile::tempdir().unwrap();
        let save = dir.path().join("save.tsv");
        let input = sentences(6);

        let mut backend = StubBackend::new(usize::MAX);
        backend.fail_on = Some(input[4].clone());
        let _ = BatchTranslator::new(backend)
            .chunk_size(2)
            .save_to(&save)
            .translate(&refs(&input), "EN", "DE");

        let t = BatchTranslator::new(StubBackend::new(usize::MAX))
            .chunk_size(2)
            .save_to(&save)
            .resume(true);
        let out = t.translate(&refs(&input), "EN", "DE").unwrap();

        assert_eq!(out.len(), 6);
        assert_eq!(out[5], format!("[DE] {}", input[5].to_uppercase()));
        assert_eq!(*t.backend().requests.borrow(), vec![2]);
        assert_eq!(std::fs::read_to_string(&save).unwrap().lines().count(), 6);
    }

    #[test]
    fn progress_marks() {
        let mut p = Progress::new(1000);
        p.update(25);
        assert_eq!(p.last_mark, 20);
        p.update(30);
        assert_eq!(p.last_mark, 30);
        p.update(5);
        assert_eq!(p.last_mark, 30);
    }
}
