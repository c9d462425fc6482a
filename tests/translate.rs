use std::cell::RefCell;
use std::fs;

use wikialign::error::Error;
use wikialign::io::Tsv;
use wikialign::translation::{
    BatchTranslator, OutputMode, Translate, TranslateError, TranslationHandler,
};

/// Rejects any request holding more than one text, like a service with a very short URL limit.
#[derive(Default)]
struct OneAtATime {
    requests: RefCell<usize>,
}

impl Translate for OneAtATime {
    fn translate_sentences(
        &self,
        texts: &[&str],
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        *self.requests.borrow_mut() += 1;
        if texts.len() > 1 {
            return Err(TranslateError::Oversize { status: 414 });
        }
        Ok(texts.iter().map(|t| t.chars().rev().collect()).collect())
    }
}

/// Always fails with a quota error.
struct QuotaExceeded;

impl Translate for QuotaExceeded {
    fn translate_sentences(
        &self,
        _: &[&str],
        _: &str,
        _: &str,
    ) -> Result<Vec<String>, TranslateError> {
        Err(TranslateError::Status {
            status: 456,
            body: "Quota exceeded".to_string(),
        })
    }
}

#[test_log::test]
fn oversized_chunk_keeps_order() {
    let texts: Vec<String> = (0..25).map(|i| format!("Satz {i}.")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let translator = BatchTranslator::new(OneAtATime::default());
    let out = translator.translate(&refs, "DE", "EN").unwrap();

    let expected: Vec<String> = texts.iter().map(|t| t.chars().rev().collect()).collect();
    assert_eq!(out, expected);
    // one rejected chunk, then one request per sentence
    assert_eq!(*translator.backend().requests.borrow(), 26);
}

#[test]
fn fatal_error_names_the_chunk() {
    let texts = ["a", "b"];
    let res = BatchTranslator::new(QuotaExceeded).translate(&texts, "DE", "EN");
    match res {
        Err(Error::Translation { chunk, source }) => {
            assert_eq!(chunk, 0);
            assert!(!source.is_oversize());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test_log::test]
fn handler_with_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.tsv");
    let save = dir.path().join("save.tsv");
    let output = dir.path().join("out.tsv");
    fs::write(&input, "1\tabc\n2\tdef\n3\tghi\n").unwrap();

    let tsv = Tsv::default();
    let translator = BatchTranslator::new(OneAtATime::default())
        .chunk_size(2)
        .save_to(&save)
        .tsv(tsv);
    let handler = TranslationHandler::read_tsv(&input, tsv).unwrap();
    let translated = handler
        .translate_column(1, &translator, "DE", "EN")
        .unwrap();
    handler
        .write(&translated, OutputMode::Parallel, &output)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "abc\tcba\ndef\tfed\nghi\tihg\n"
    );
    assert_eq!(
        fs::read_to_string(&save).unwrap(),
        "0\tcba\n1\tfed\n2\tihg\n"
    );
}
