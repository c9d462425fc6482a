/*! Dump reading.

Dumps are text files in the WikiExtractor document format:

```text
<doc id="12" url="https://simple.wikipedia.org/wiki?curid=12" title="Berlin">
Berlin

Berlin is the capital of Germany.
Section::::History.
…
</doc>
```

[Dump] is generic over the reader type, so that both plain and gzipped (`.gz`) dumps can be read.
Only the article being accumulated is held in memory.
!*/
mod header;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use log::{debug, warn};

pub use header::{DocHeader, DOC_CLOSE, DOC_OPEN};

use crate::error::Error;

/// One extracted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub body: String,
}

impl Article {
    pub fn new(header: DocHeader, body: String) -> Self {
        Self {
            id: header.id,
            url: header.url,
            title: header.title,
            body,
        }
    }
}

/// Line-based article extractor.
pub struct Dump<R> {
    reader: R,
    path: PathBuf,
    line_no: usize,
    current: Option<(DocHeader, String)>,
    keep_body: bool,
    done: bool,
}

pub type DynDump = Dump<Box<dyn BufRead + Send>>;

impl DynDump {
    /// Open a dump file, using a [MultiGzDecoder] if its extension is `gz`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead + Send> = match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
            _ => Box::new(BufReader::new(file)),
        };

        Ok(Dump::new(reader, path))
    }
}

impl<R: BufRead> Dump<R> {
    /// `path` is only used in error messages.
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line_no: 0,
            current: None,
            keep_body: true,
            done: false,
        }
    }

    /// Do not accumulate article bodies. Yielded articles have an empty body.
    pub fn headers_only(mut self) -> Self {
        self.keep_body = false;
        self
    }

    fn take_current(&mut self) -> Option<Article> {
        self.current
            .take()
            .map(|(header, body)| Article::new(header, body))
    }
}

impl<R: BufRead> Iterator for Dump<R> {
    type Item = Result<Article, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    let last = self.take_current();
                    if let Some(article) = &last {
                        warn!(
                            "{:?}: article {} is not closed at end of file",
                            self.path, article.id
                        );
                    }
                    return last.map(Ok);
                }
                Ok(_) => self.line_no += 1,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::from(e).in_file(&self.path)));
                }
            }

            if line.starts_with(DOC_CLOSE) {
                match self.take_current() {
                    Some(article) => return Some(Ok(article)),
                    None => {
                        debug!("{:?}:{}: stray close tag", self.path, self.line_no);
                        continue;
                    }
                }
            } else if line.starts_with(DOC_OPEN) {
                let header = match DocHeader::parse(&line) {
                    Some(header) => header,
                    None => {
                        self.done = true;
                        return Some(Err(Error::MalformedHeader {
                            path: self.path.clone(),
                            line: self.line_no,
                            header: line.trim_end().to_string(),
                        }));
                    }
                };

                if let Some(previous) = self.current.replace((header, String::new())) {
                    warn!(
                        "{:?}:{}: article {} is not closed before next header",
                        self.path, self.line_no, previous.0.id
                    );
                    return Some(Ok(Article::new(previous.0, previous.1)));
                }
            } else if let Some((_, body)) = self.current.as_mut() {
                if self.keep_body {
                    body.push_str(&line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    const TWO_ARTICLES: &str = "<doc id=\"1\" url=\"u1\" title=\"One\">
One

First body.
</doc>
<doc id=\"2\" url=\"u2\" title=\"Two\">
Two
Second body.
</doc>
";

    fn dump(content: &str) -> Dump<Cursor<Vec<u8>>> {
        Dump::new(
            Cursor::new(content.as_bytes().to_vec()),
            Path::new("test.txt"),
        )
    }

    #[test]
    fn two_articles() {
        let articles: Vec<Article> = dump(TWO_ARTICLES).map(Result::unwrap).collect();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "1");
        assert_eq!(articles[0].title, "One");
        assert_eq!(articles[0].body, "One\n\nFirst body.\n");
        assert_eq!(articles[1].url, "u2");
        assert_eq!(articles[1].body, "Two\nSecond body.\n");
    }

    #[test]
    fn empty_file() {
        assert_eq!(dump("").count(), 0);
    }

    #[test]
    fn headers_only() {
        let articles: Vec<Article> = dump(TWO_ARTICLES)
            .headers_only()
            .map(Result::unwrap)
            .collect();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.body.is_empty()));
    }

    #[test]
    fn malformed_header_stops() {
        let content = "<doc id=\"1\" url=\"u1\">\nbody\n</doc>\n<doc id=\"2\" url=\"u\" title=\"t\">\n</doc>\n";
        let mut d = dump(content);
        match d.next() {
            Some(Err(Error::MalformedHeader { line, .. })) => assert_eq!(line, 1),
            other => panic!("expected malformed header, got {:?}", other),
        }
        assert!(d.next().is_none());
    }

    #[test]
    fn unclosed_articles_are_kept() {
        let content = "<doc id=\"1\" url=\"u1\" title=\"a\">\nx\n<doc id=\"2\" url=\"u2\" title=\"b\">\ny\n";
        let ids: Vec<String> = dump(content).map(|a| a.unwrap().id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn text_outside_documents_is_ignored() {
        let content = "garbage\n</doc>\n<doc id=\"1\" url=\"u1\" title=\"a\">\nx\n</doc>\ntrailing\n";
        let articles: Vec<Article> = dump(content).map(Result::unwrap).collect();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].body, "x\n");
    }

    #[test]
    fn gzip_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiki_00.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(TWO_ARTICLES.as_bytes()).unwrap();
        enc.finish().unwrap();

        let articles: Vec<Article> = Dump::from_path(&path)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(articles.len(), 2);
    }
}
