//! Document pairs.
//!
//! Writes each article of an annotated corpus next to its counterpart in another language, as
//! two plain text files holding one sentence per line:
//! `{article_id}_{foreign_id}.{ext}` and `{article_id}_{foreign_id}.{foreign_ext}`.
//!
//! The foreign article id is read from the `curid` query parameter of the foreign url.
//! Rows whose foreign url is [NOT_FOUND] are skipped.
use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::StringRecord;
use itertools::Itertools;
use log::{info, warn};
use url::Url;

use crate::error::Error;
use crate::io::Tsv;
use crate::urls::NOT_FOUND;

const ARTICLE_ID_COLUMN: usize = 0;
/// Sentence column of sentence record files.
const SENTENCE_COLUMN: usize = 6;

#[derive(Debug, Clone)]
pub struct ParallelDocs {
    /// Column holding the url of the foreign article.
    pub url_column: usize,
    /// Column holding the sentences written to the `ext` file.
    pub text_column: usize,
    pub ext: String,
    pub foreign_ext: String,
    pub tsv: Tsv,
}

/// Extract the article id from a `…/wiki?curid=123` url.
pub fn curid(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let id = url
        .query_pairs()
        .find(|(k, _)| k == "curid")
        .map(|(_, v)| v.into_owned())?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then_some(id)
}

/// Sentences of each article of a sentence record file.
fn foreign_articles(path: &Path, tsv: Tsv) -> Result<HashMap<String, Vec<String>>, Error> {
    info!("Mapping articles of {:?}...", path);
    let mut articles: HashMap<String, Vec<String>> = HashMap::new();
    let mut reader = tsv.reader_from_path(path)?;
    for row in reader.records() {
        let row = row.map_err(|e| Error::from(e).in_file(path))?;
        if let (Some(id), Some(sentence)) = (row.get(ARTICLE_ID_COLUMN), row.get(SENTENCE_COLUMN)) {
            articles
                .entry(id.to_string())
                .or_default()
                .push(sentence.to_string());
        }
    }
    info!("Done, mapped {} articles.", articles.len());
    Ok(articles)
}

fn write_lines<'a, I>(path: &Path, lines: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let file = File::create(path).map_err(|e| Error::from(e).in_file(path))?;
    let mut w = BufWriter::new(file);
    for line in lines {
        writeln!(w, "{line}")?;
    }
    w.flush()?;
    Ok(())
}

impl ParallelDocs {
    pub fn new(url_column: usize, text_column: usize, ext: String, foreign_ext: String) -> Self {
        Self {
            url_column,
            text_column,
            ext,
            foreign_ext,
            tsv: Tsv::default(),
        }
    }

    fn prefix(&self, out_dir: &Path, article_id: &str, foreign_id: &str) -> PathBuf {
        out_dir.join(format!("{article_id}_{foreign_id}"))
    }

    /// Write document pairs for every article of `corpus` found in `foreign`.
    /// Returns the number of pairs written.
    pub fn run(&self, corpus: &Path, foreign: &Path, out_dir: &Path) -> Result<usize, Error> {
        let foreign_articles = foreign_articles(foreign, self.tsv)?;
        std::fs::create_dir_all(out_dir)?;

        info!("Creating output documents...");
        let rows: Vec<StringRecord> = self
            .tsv
            .read_rows(corpus)?
            .into_iter()
            .filter(|row| row.get(self.url_column).map_or(false, |u| u != NOT_FOUND))
            .collect();

        let mut completed = 0;
        for (article_id, article) in &rows
            .iter()
            .group_by(|row| row.get(ARTICLE_ID_COLUMN).unwrap_or_default().to_string())
        {
            let article: Vec<&StringRecord> = article.collect();
            let url = article[0].get(self.url_column).unwrap_or_default();

            let Some(foreign_id) = curid(url) else {
                warn!("article {}: no article id in url {:?}", article_id, url);
                continue;
            };
            let Some(foreign_sentences) = foreign_articles.get(&foreign_id) else {
                warn!("article {}: foreign article {} not found", article_id, foreign_id);
                continue;
            };

            let prefix = self.prefix(out_dir, &article_id, &foreign_id);
            write_lines(
                &prefix.with_extension(&self.ext),
                article.iter().filter_map(|row| row.get(self.text_column)),
            )?;
            write_lines(
                &prefix.with_extension(&self.foreign_ext),
                foreign_sentences.iter().map(String::as_str),
            )?;

            completed += 1;
            if completed % 100_000 == 0 {
                info!("Completed {} articles...", completed);
            }
        }

        info!("Done, created {} document pairs.", completed);
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn curid_from_url() {
        assert_eq!(
            curid("https://de.wikipedia.org/wiki?curid=42").as_deref(),
            Some("42")
        );
        assert_eq!(curid("https://de.wikipedia.org/wiki?title=Hund"), None);
        assert_eq!(curid(NOT_FOUND), None);
    }

    #[test]
    fn pairs_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("simple.tsv");
        let foreign = dir.path().join("de.tsv");
        let out = dir.path().join("out");

        fs::write(
            &corpus,
            "1\t1\t1\tu\tDog\tSummary\tA dog.\thttps://de.wikipedia.org/wiki?curid=7\tEin Hund.\n\
             1\t1\t2\tu\tDog\tSummary\tIt barks.\thttps://de.wikipedia.org/wiki?curid=7\tEr bellt.\n\
             2\t1\t3\tu\tCat\tSummary\tA cat.\tNOT_FOUND\tEine Katze.\n\
             3\t1\t4\tu\tCow\tSummary\tA cow.\thttps://de.wikipedia.org/wiki?curid=99\tEine Kuh.\n",
        )
        .unwrap();
        fs::write(
            &foreign,
            "7\t1\t1\tu\tHund\tSummary\tDer Hund ist ein Tier.\n\
             7\t2\t2\tu\tHund\tBellen\tEr bellt laut.\n\
             8\t1\t3\tu\tKatze\tSummary\tDie Katze.\n",
        )
        .unwrap();

        let docs = ParallelDocs::new(7, 8, "simplede".to_string(), "de".to_string());
        assert_eq!(docs.run(&corpus, &foreign, &out).unwrap(), 1);

        assert_eq!(
            fs::read_to_string(out.join("1_7.simplede")).unwrap(),
            "Ein Hund.\nEr bellt.\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("1_7.de")).unwrap(),
            "Der Hund ist ein Tier.\nEr bellt laut.\n"
        );
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }
}
