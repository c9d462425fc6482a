//! Sentence key normalization.
//!
//! Both the alignment side and the parsed side of a lookup go through the same [Normalizer].
//! The fuzzy policy removes punctuation, lowercases and collapses whitespace; each step can
//! be turned on or off, and punctuation can be taken from ASCII only or from the Unicode
//! general categories (`P*`).
use std::str::FromStr;

use unic_ucd::GeneralCategory;

/// Which characters count as punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    Keep,
    /// `!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~`
    Ascii,
    /// Unicode punctuation general categories.
    Unicode,
}

impl FromStr for Punctuation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "ascii" => Ok(Self::Ascii),
            "unicode" => Ok(Self::Unicode),
            other => Err(format!(
                "unknown punctuation policy {other:?} (keep|ascii|unicode)"
            )),
        }
    }
}

impl Punctuation {
    fn is_removed(&self, c: char) -> bool {
        match self {
            Self::Keep => false,
            Self::Ascii => c.is_ascii_punctuation(),
            Self::Unicode => GeneralCategory::of(c).is_punctuation(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    punctuation: Punctuation,
    lowercase: bool,
    collapse_whitespace: bool,
}

impl Normalizer {
    /// Only surrounding whitespace is removed.
    pub fn exact() -> Self {
        Self {
            punctuation: Punctuation::Keep,
            lowercase: false,
            collapse_whitespace: false,
        }
    }

    /// ASCII punctuation removed, lowercased, whitespace collapsed.
    pub fn fuzzy() -> Self {
        Self {
            punctuation: Punctuation::Ascii,
            lowercase: true,
            collapse_whitespace: true,
        }
    }

    pub fn with_punctuation(mut self, punctuation: Punctuation) -> Self {
        self.punctuation = punctuation;
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_collapse_whitespace(mut self, collapse_whitespace: bool) -> Self {
        self.collapse_whitespace = collapse_whitespace;
        self
    }

    pub fn normalize(&self, sentence: &str) -> String {
        let stripped: String = sentence
            .chars()
            .filter(|c| !self.punctuation.is_removed(*c))
            .collect();

        let cased = if self.lowercase {
            stripped.to_lowercase()
        } else {
            stripped
        };

        if self.collapse_whitespace {
            cased.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            cased.trim().to_string()
        }
    }
}
