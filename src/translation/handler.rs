//! Column translation of TSV files.
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use csv::StringRecord;
use log::info;

use super::{BatchTranslator, Translate};
use crate::error::Error;
use crate::io::Tsv;

/// What to write once a column is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The original rows with the translation as an extra last column.
    #[default]
    Append,
    /// Two columns: source sentence, translation.
    Parallel,
}

impl FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(Self::Append),
            "parallel" => Ok(Self::Parallel),
            other => Err(format!("unknown output mode {other:?} (append|parallel)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedColumn {
    pub column: usize,
    pub target_lang: String,
    pub translations: Vec<String>,
}

pub struct TranslationHandler {
    path: PathBuf,
    rows: Vec<StringRecord>,
    tsv: Tsv,
}

impl TranslationHandler {
    pub fn read_tsv(path: &Path, tsv: Tsv) -> Result<Self, Error> {
        let rows = tsv.read_rows(path)?;
        info!("{:?}: read {} rows", path, rows.len());
        Ok(Self {
            path: path.to_path_buf(),
            rows,
            tsv,
        })
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    fn column(&self, column: usize) -> Result<Vec<&str>, Error> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                row.get(column).ok_or_else(|| {
                    Error::Custom(format!("row {} has no column {}", idx + 1, column))
                        .in_file(&self.path)
                })
            })
            .collect()
    }

    pub fn translate_column<T: Translate>(
        &self,
        column: usize,
        translator: &BatchTranslator<T>,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslatedColumn, Error> {
        let texts = self.column(column)?;
        let translations = translator.translate(&texts, source_lang, target_lang)?;
        info!("Successfully translated {} sentences.", translations.len());

        Ok(TranslatedColumn {
            column,
            target_lang: target_lang.to_string(),
            translations,
        })
    }

    /// Write the original rows, each followed by its translation.
    pub fn add_translation_column(
        &self,
        translated: &TranslatedColumn,
        output: &Path,
    ) -> Result<(), Error> {
        let mut writer = self.tsv.writer_from_path(output)?;
        for (row, translation) in self.rows.iter().zip(translated.translations.iter()) {
            let mut out = row.clone();
            out.push_field(translation);
            writer.write_record(&out)?;
        }
        writer.flush()?;
        info!("{:?}: rows with a translation column written", output);
        Ok(())
    }

    /// Write `(source sentence, translation)` pairs.
    pub fn write_parallel_file(
        &self,
        translated: &TranslatedColumn,
        output: &Path,
    ) -> Result<(), Error> {
        let sources = self.column(translated.column)?;
        let mut writer = self.tsv.writer_from_path(output)?;
        for (source, translation) in sources.iter().zip(translated.translations.iter()) {
            writer.write_record([*source, translation.as_str()])?;
        }
        writer.flush()?;
        info!("{:?}: parallel file written", output);
        Ok(())
    }

    pub fn write(
        &self,
        translated: &TranslatedColumn,
        mode: OutputMode,
        output: &Path,
    ) -> Result<(), Error> {
        if translated.translations.len() != self.rows.len() {
            return Err(Error::Custom(format!(
                "{} translations for {} rows",
                translated.translations.len(),
                self.rows.len()
            )));
        }
        match mode {
            OutputMode::Append => self.add_translation_column(translated, output),
            OutputMode::Parallel => self.write_parallel_file(translated, output),
        }
    }
}
