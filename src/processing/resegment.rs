//! Re-segmentation of translated sections.
//!
//! Machine translation works sentence by sentence, but translated sentences do not always map
//! one to one to sentence boundaries in the target language. This joins the translated text of
//! each section back together and segments it again.
//!
//! Consecutive rows sharing `(article_id, section_id)` form a section. Each section yields one row
//! per new sentence, built from the last row of the section, with:
//! - `sent_id` renumbered from 1,
//! - the text column replaced by the new sentence,
//! - the aligned column (if any) replaced by [NOT_PARALLEL], since the new sentences no longer
//!   correspond to the original ones.
use std::path::Path;

use csv::StringRecord;
use itertools::Itertools;
use log::info;

use crate::error::Error;
use crate::io::Tsv;
use crate::segment::Segmenter;

/// Marks a column whose content is no longer aligned with the rest of the row.
pub const NOT_PARALLEL: &str = "NOT_PARALLEL";

const ARTICLE_ID_COLUMN: usize = 0;
const SECTION_ID_COLUMN: usize = 1;
const SENT_ID_COLUMN: usize = 2;

#[derive(Debug, Clone)]
pub struct Resegment {
    pub text_column: usize,
    pub aligned_column: Option<usize>,
    pub lang: String,
    pub tsv: Tsv,
}

impl Resegment {
    pub fn new(text_column: usize, lang: String) -> Self {
        Self {
            text_column,
            aligned_column: None,
            lang,
            tsv: Tsv::default(),
        }
    }

    fn section_key(row: &StringRecord) -> (String, String) {
        (
            row.get(ARTICLE_ID_COLUMN).unwrap_or_default().to_string(),
            row.get(SECTION_ID_COLUMN).unwrap_or_default().to_string(),
        )
    }

    /// Build the output row of a new sentence.
    fn sentence_row(&self, template: &StringRecord, sent_id: usize, sentence: &str) -> StringRecord {
        let sent_id = sent_id.to_string();
        template
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                if idx == SENT_ID_COLUMN {
                    sent_id.as_str()
                } else if idx == self.text_column {
                    sentence
                } else if Some(idx) == self.aligned_column {
                    NOT_PARALLEL
                } else {
                    field
                }
            })
            .collect()
    }

    pub fn resegment_rows(
        &self,
        rows: &[StringRecord],
        segmenter: &dyn Segmenter,
    ) -> Result<Vec<StringRecord>, Error> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() <= self.text_column.max(SENT_ID_COLUMN))
        {
            return Err(Error::Custom(format!(
                "row {} has {} columns, expected at least {}",
                idx + 1,
                row.len(),
                self.text_column.max(SENT_ID_COLUMN) + 1
            )));
        }

        let mut out = Vec::with_capacity(rows.len());
        for (_, section) in &rows.iter().group_by(|row| Self::section_key(row)) {
            let section: Vec<&StringRecord> = section.collect();
            let content = section
                .iter()
                .filter_map(|row| row.get(self.text_column))
                .map(str::trim)
                .join(" ");

            // groups are never empty
            let template = section[section.len() - 1];
            for (idx, sentence) in segmenter.segment(&content, &self.lang).iter().enumerate() {
                out.push(self.sentence_row(template, idx + 1, sentence));
            }
        }
        Ok(out)
    }

    /// Re-segment `input` into `output`. Returns the number of rows written.
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        segmenter: &dyn Segmenter,
    ) -> Result<usize, Error> {
        let rows = self.tsv.read_rows(input)?;
        let resegmented = self
            .resegment_rows(&rows, segmenter)
            .map_err(|e| e.in_file(input))?;

        let mut writer = self.tsv.writer_from_path(output)?;
        for row in &resegmented {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!(
            "{:?}: {} rows re-segmented into {} rows",
            input,
            rows.len(),
            resegmented.len()
        );
        Ok(resegmented.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::UnicodeSegmenter;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    fn fields(r: &StringRecord) -> Vec<&str> {
        r.iter().collect()
    }

    #[test]
    fn sections_are_joined_and_renumbered() {
        let rows = vec![
            row(&["1", "1", "1", "Der Hund", "The dog. It"]),
            row(&["1", "1", "2", "bellt.", "barks."]),
            row(&["1", "2", "3", "Ende.", "The end."]),
            row(&["2", "2", "4", "Neu.", "New."]),
        ];
        let mut r = Resegment::new(4, "en".to_string());
        r.aligned_column = Some(3);
        let out = r.resegment_rows(&rows, &UnicodeSegmenter).unwrap();

        let out: Vec<Vec<&str>> = out.iter().map(fields).collect();
        assert_eq!(
            out,
            vec![
                vec!["1", "1", "1", NOT_PARALLEL, "The dog."],
                vec!["1", "1", "2", NOT_PARALLEL, "It barks."],
                vec!["1", "2", "1", NOT_PARALLEL, "The end."],
                vec!["2", "2", "1", NOT_PARALLEL, "New."],
            ]
        );
    }

    #[test]
    fn empty_sections_vanish() {
        let rows = vec![row(&["1", "1", "1", "  "]), row(&["1", "2", "2", "Hi."])];
        let out = Resegment::new(3, "en".to_string())
            .resegment_rows(&rows, &UnicodeSegmenter)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(fields(&out[0]), vec!["1", "2", "1", "Hi."]);
    }

    #[test]
    fn short_rows_are_rejected() {
        let rows = vec![row(&["1", "1", "1"])];
        assert!(Resegment::new(3, "en".to_string())
            .resegment_rows(&rows, &UnicodeSegmenter)
            .is_err());
    }

    #[test]
    fn file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.tsv");
        let output = dir.path().join("out.tsv");
        std::fs::write(&input, "5\t1\t9\tA b\n5\t1\t10\tc. D.\n").unwrap();

        let nb = Resegment::new(3, "en".to_string())
            .run(&input, &output, &UnicodeSegmenter)
            .unwrap();
        assert_eq!(nb, 2);
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "5\t1\t1\tA b c.\n5\t1\t2\tD.\n"
        );
    }
}
