/*! Sentence alignment matching.

Finds the rows of freshly parsed corpora that correspond to sentences of existing alignment
exports.

Alignment exports are headerless TSV files of `(first sentence, second sentence, score)`.
One of the two sentence columns is used as the lookup key ([KeyColumn]).
Parsed corpora are sentence record files (see [crate::records]).

Matching is a filter: parsed rows without a counterpart are dropped, and output follows
the order of the parsed corpora.
!*/
mod normalize;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use csv::StringRecord;
use log::{info, warn};

pub use normalize::{Normalizer, Punctuation};

use crate::error::Error;
use crate::io::Tsv;

/// One known aligned sentence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentEntry {
    pub source_file: String,
    pub first: String,
    pub second: String,
    pub score: String,
}

impl AlignmentEntry {
    /// Read an alignment export. The file name is kept as provenance.
    ///
    /// Rows with less than two columns are skipped.
    pub fn read_file(path: &Path, tsv: Tsv) -> Result<Vec<Self>, Error> {
        let source_file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let mut entries = Vec::new();
        for (idx, row) in tsv.read_rows(path)?.into_iter().enumerate() {
            match (row.get(0), row.get(1)) {
                (Some(first), Some(second)) => entries.push(Self {
                    source_file: source_file.clone(),
                    first: first.to_string(),
                    second: second.to_string(),
                    score: row.get(2).unwrap_or_default().to_string(),
                }),
                _ => warn!("{:?}: skipping row {} ({} columns)", path, idx + 1, row.len()),
            }
        }
        Ok(entries)
    }

    fn key(&self, column: KeyColumn) -> &str {
        match column {
            KeyColumn::First => &self.first,
            KeyColumn::Second => &self.second,
        }
    }

    fn other(&self, column: KeyColumn) -> &str {
        match column {
            KeyColumn::First => &self.second,
            KeyColumn::Second => &self.first,
        }
    }
}

/// Alignment column used as lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyColumn {
    First,
    #[default]
    Second,
}

impl FromStr for KeyColumn {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "0" => Ok(Self::First),
            "second" | "1" => Ok(Self::Second),
            other => Err(format!("unknown key column {other:?} (first|second)")),
        }
    }
}

/// The parts of a sentence record needed for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub article_id: String,
    pub section_id: String,
    pub sent_id: String,
    pub text: String,
}

impl ParsedRow {
    pub fn from_record(record: &StringRecord, sentence_column: usize) -> Option<Self> {
        Some(Self {
            article_id: record.get(0)?.to_string(),
            section_id: record.get(1)?.to_string(),
            sent_id: record.get(2)?.to_string(),
            text: record.get(sentence_column)?.to_string(),
        })
    }

    /// Read a sentence record file.
    pub fn read_file(path: &Path, sentence_column: usize, tsv: Tsv) -> Result<Vec<Self>, Error> {
        tsv.read_rows(path)?
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                Self::from_record(record, sentence_column).ok_or_else(|| {
                    Error::Custom(format!(
                        "row {} has no column {} ({} columns)",
                        idx + 1,
                        sentence_column,
                        record.len()
                    ))
                    .in_file(path)
                })
            })
            .collect()
    }
}

/// A parsed row joined with its alignment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub source_file: String,
    pub key_sentence: String,
    pub other_sentence: String,
    pub article_id: String,
    pub section_id: String,
    pub sent_id: String,
    pub parsed_sentence: String,
}

impl MatchRow {
    pub fn to_row(&self) -> [&str; 7] {
        [
            self.source_file.as_str(),
            self.key_sentence.as_str(),
            self.other_sentence.as_str(),
            self.article_id.as_str(),
            self.section_id.as_str(),
            self.sent_id.as_str(),
            self.parsed_sentence.as_str(),
        ]
    }
}

pub struct AlignmentMatcher {
    lookup: HashMap<String, AlignmentEntry>,
    key: KeyColumn,
    normalizer: Normalizer,
}

impl AlignmentMatcher {
    /// Index `entries` by their normalized key. On duplicate keys the last entry wins.
    /// Entries whose key normalizes to an empty string are not indexed.
    pub fn new<I>(entries: I, key: KeyColumn, normalizer: Normalizer) -> Self
    where
        I: IntoIterator<Item = AlignmentEntry>,
    {
        let mut lookup = HashMap::new();
        for entry in entries {
            let k = normalizer.normalize(entry.key(key));
            if !k.is_empty() {
                lookup.insert(k, entry);
            }
        }
        Self {
            lookup,
            key,
            normalizer,
        }
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Find the alignment entry of a sentence.
    pub fn lookup(&self, sentence: &str) -> Option<&AlignmentEntry> {
        let k = self.normalizer.normalize(sentence);
        if k.is_empty() {
            return None;
        }
        self.lookup.get(&k)
    }

    /// Join every parsed row that has an alignment entry, in parsed order.
    pub fn matches<'a, I>(&'a self, rows: I) -> impl Iterator<Item = MatchRow> + 'a
    where
        I: IntoIterator<Item = ParsedRow>,
        I::IntoIter: 'a,
    {
        rows.into_iter().filter_map(move |row| {
            self.lookup(&row.text).map(|entry| MatchRow {
                source_file: entry.source_file.clone(),
                key_sentence: entry.key(self.key).to_string(),
                other_sentence: entry.other(self.key).to_string(),
                article_id: row.article_id,
                section_id: row.section_id,
                sent_id: row.sent_id,
                parsed_sentence: row.text,
            })
        })
    }
}

/// Settings of a file-level alignment run.
#[derive(Debug, Clone)]
pub struct AlignFiles {
    pub parsed: Vec<PathBuf>,
    pub alignments: Vec<PathBuf>,
    pub sentence_column: usize,
    pub key: KeyColumn,
    pub normalizer: Normalizer,
    pub tsv: Tsv,
}

impl AlignFiles {
    /// Match all parsed files against all alignment files and write joined rows to `output`.
    /// Returns the number of rows written.
    pub fn run(&self, output: &Path) -> Result<usize, Error> {
        let mut entries = Vec::new();
        for path in &self.alignments {
            entries.extend(AlignmentEntry::read_file(path, self.tsv)?);
        }
        let matcher = AlignmentMatcher::new(entries, self.key, self.normalizer);
        info!("Indexed {} alignment sentences.", matcher.len());

        let mut writer = self.tsv.writer_from_path(output)?;
        let mut nb_matches = 0;
        for path in &self.parsed {
            let rows = ParsedRow::read_file(path, self.sentence_column, self.tsv)?;
            let nb_rows = rows.len();
            let mut file_matches = 0;
            for m in matcher.matches(rows) {
                writer.write_record(m.to_row())?;
                file_matches += 1;
            }
            info!("{:?}: {}/{} rows matched", path, file_matches, nb_rows);
            nb_matches += file_matches;
        }
        writer.flush()?;

        Ok(nb_matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(first: &str, second: &str) -> AlignmentEntry {
        AlignmentEntry {
            source_file: "de-en.tsv".to_string(),
            first: first.to_string(),
            second: second.to_string(),
            score: "0.9".to_string(),
        }
    }

    fn parsed(sent_id: &str, text: &str) -> ParsedRow {
        ParsedRow {
            article_id: "7".to_string(),
            section_id: "1".to_string(),
            sent_id: sent_id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn exact_and_fuzzy() {
        let entries = vec![entry("Der Hund läuft.", "The dog runs.")];
        let exact = AlignmentMatcher::new(entries.clone(), KeyColumn::First, Normalizer::exact());
        let fuzzy = AlignmentMatcher::new(entries, KeyColumn::First, Normalizer::fuzzy());

        assert!(exact.lookup("Der Hund läuft.").is_some());
        assert!(exact.lookup("Der Hund, läuft.").is_none());
        assert!(fuzzy.lookup("Der Hund, läuft.").is_some());
    }

    #[test]
    fn joined_row() {
        let m = AlignmentMatcher::new(
            vec![entry("Der Hund läuft.", "The dog runs.")],
            KeyColumn::First,
            Normalizer::exact(),
        );
        let rows: Vec<MatchRow> = m.matches(vec![parsed("3", "Der Hund läuft.")]).collect();
        assert_eq!(
            rows[0].to_row(),
            [
                "de-en.tsv",
                "Der Hund läuft.",
                "The dog runs.",
                "7",
                "1",
                "3",
                "Der Hund läuft."
            ]
        );
    }

    #[test]
    fn misses_are_filtered_and_order_kept() {
        let m = AlignmentMatcher::new(
            vec![entry("b", "B."), entry("a", "A.")],
            KeyColumn::Second,
            Normalizer::fuzzy(),
        );
        let rows: Vec<String> = m
            .matches(vec![
                parsed("1", "c"),
                parsed("2", "A"),
                parsed("3", "..."),
                parsed("4", "b"),
            ])
            .map(|r| r.sent_id)
            .collect();
        assert_eq!(rows, vec!["2", "4"]);
    }

    #[test]
    fn punctuation_only_keys_are_not_indexed() {
        let m = AlignmentMatcher::new(
            vec![entry("x", "..."), entry("y", "Ok.")],
            KeyColumn::Second,
            Normalizer::fuzzy(),
        );
        assert_eq!(m.len(), 1);
        assert!(m.lookup("!").is_none());
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let m = AlignmentMatcher::new(
            vec![entry("one", "Same."), entry("two", "same")],
            KeyColumn::Second,
            Normalizer::fuzzy(),
        );
        assert_eq!(m.lookup("SAME").unwrap().first, "two");
    }
}
