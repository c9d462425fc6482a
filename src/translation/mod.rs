/*! Machine translation.

Translation backends implement [Translate]. They must report requests rejected for their size
as [TranslateError::Oversize], so that [BatchTranslator] can fall back to per-sentence requests
for that chunk only; every other error is fatal.
!*/
mod batch;
mod deepl;
mod handler;

pub use batch::{BatchTranslator, TranslationJob};
pub use deepl::{DeepL, DEEPL_FREE_URL, DEEPL_URL};
pub use handler::{OutputMode, TranslatedColumn, TranslationHandler};

use std::fmt;

/// Batched sentence translation.
///
/// Implementations must return exactly one translation per input text, in input order.
pub trait Translate {
    fn translate_sentences(
        &self,
        texts: &[&str],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError>;
}

impl<T: Translate + ?Sized> Translate for &T {
    fn translate_sentences(
        &self,
        texts: &[&str],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        (**self).translate_sentences(texts, source_lang, target_lang)
    }
}

#[derive(Debug)]
pub enum TranslateError {
    /// The request was rejected because it is too long (HTTP 413/414).
    Oversize { status: u16 },
    /// Any other unsuccessful HTTP status.
    Status { status: u16, body: String },
    /// The response does not hold one translation per text.
    Mismatch { expected: usize, got: usize },
    Http(reqwest::Error),
    Serde(serde_json::Error),
}

impl TranslateError {
    pub fn is_oversize(&self) -> bool {
        matches!(self, TranslateError::Oversize { .. })
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Oversize { status } => write!(f, "request too long (status {status})"),
            TranslateError::Status { status, body } => write!(f, "status {status}: {body}"),
            TranslateError::Mismatch { expected, got } => {
                write!(f, "expected {expected} translations, got {got}")
            }
            TranslateError::Http(e) => write!(f, "{e}"),
            TranslateError::Serde(e) => write!(f, "invalid response: {e}"),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Http(e)
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(e: serde_json::Error) -> Self {
        TranslateError::Serde(e)
    }
}
