/*! Sentence records.

Turns an [Article] body into [SentenceRecord]s.

Body lines are processed in order:
- blank lines and the line repeating the article title are skipped,
- a line starting with [SECTION_MARKER] opens a new section, named after the rest of the line
  with its trailing periods removed (other punctuation, as in `C++` or `Why?`, is kept),
- any other line is segmented into sentences, each of which becomes a record.

`section_id` starts at 1 (the implicit `Summary` section) and `sent_id` is never reset
when a new section begins.
!*/
use std::collections::VecDeque;
use std::str::Lines;

use crate::dump::Article;
use crate::segment::Segmenter;

/// Line prefix marking the beginning of a section.
pub const SECTION_MARKER: &str = "Section::::";
/// Name of the section preceding the first section marker.
pub const DEFAULT_SECTION: &str = "Summary";

/// A single sentence with its article/section context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRecord {
    pub article_id: String,
    pub section_id: u32,
    pub sent_id: u32,
    pub url: String,
    pub title: String,
    pub section_name: String,
    pub text: String,
    pub matched_title: Option<String>,
}

impl SentenceRecord {
    /// Consume the record and return a new one carrying the title of the article in another language.
    pub fn with_match(self, matched_title: String) -> Self {
        Self {
            matched_title: Some(matched_title),
            ..self
        }
    }

    /// Fields in sink order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.article_id.clone(),
            self.section_id.to_string(),
            self.sent_id.to_string(),
            self.url.clone(),
            self.title.clone(),
            self.section_name.clone(),
            self.text.clone(),
        ];
        if let Some(matched) = &self.matched_title {
            row.push(matched.clone());
        }
        row
    }
}

/// Per-article counters.
///
/// Each [Records] iterator owns its own context, so that concurrent extractions never share state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionContext {
    pub section_id: u32,
    pub sent_id: u32,
    pub section_name: String,
}

impl Default for ExtractionContext {
    fn default() -> Self {
        Self {
            section_id: 1,
            sent_id: 1,
            section_name: DEFAULT_SECTION.to_string(),
        }
    }
}

impl ExtractionContext {
    /// Open a new section from a marker line.
    fn open_section(&mut self, marker_line: &str) {
        self.section_id += 1;
        self.section_name = marker_line
            .trim_start_matches(SECTION_MARKER)
            .trim_end()
            .trim_end_matches('.')
            .to_string();
    }

    fn next_sent_id(&mut self) -> u32 {
        let id = self.sent_id;
        self.sent_id += 1;
        id
    }
}

/// Lazy record generator over one article.
pub struct Records<'a> {
    article: &'a Article,
    segmenter: &'a dyn Segmenter,
    lang: &'a str,
    lines: Lines<'a>,
    ctx: ExtractionContext,
    pending: VecDeque<String>,
}

impl<'a> Records<'a> {
    pub fn new(article: &'a Article, segmenter: &'a dyn Segmenter, lang: &'a str) -> Self {
        Self {
            article,
            segmenter,
            lang,
            lines: article.body.lines(),
            ctx: ExtractionContext::default(),
            pending: VecDeque::new(),
        }
    }

    /// Current counters.
    pub fn context(&self) -> &ExtractionContext {
        &self.ctx
    }

    fn record(&mut self, text: String) -> SentenceRecord {
        SentenceRecord {
            article_id: self.article.id.clone(),
            section_id: self.ctx.section_id,
            sent_id: self.ctx.next_sent_id(),
            url: self.article.url.clone(),
            title: self.article.title.clone(),
            section_name: self.ctx.section_name.clone(),
            text,
            matched_title: None,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = SentenceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sentence) = self.pending.pop_front() {
                return Some(self.record(sentence));
            }

            let line = self.lines.next()?;
            if line.trim().is_empty() || line == self.article.title {
                continue;
            }

            if line.starts_with(SECTION_MARKER) {
                self.ctx.open_section(line);
            } else {
                self.pending
                    .extend(self.segmenter.segment(line, self.lang));
            }
        }
    }
}
