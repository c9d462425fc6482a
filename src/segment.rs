/*! Sentence segmentation.

Segmentation is treated as a black box: anything implementing [Segmenter] can be plugged into
record generation. The default [UnicodeSegmenter] uses the Unicode sentence boundaries
(UAX #29) and ignores the language tag.
!*/
use unicode_segmentation::UnicodeSegmentation;

/// Splits a paragraph into an ordered, finite sequence of sentences.
pub trait Segmenter: Sync {
    fn segment(&self, text: &str, lang: &str) -> Vec<String>;
}

/// Unicode (UAX #29) sentence boundaries.
///
/// Leading/trailing whitespace is trimmed from each sentence and whitespace-only pieces are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSegmenter;

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str, _lang: &str) -> Vec<String> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Keeps each line as a single sentence.
///
/// Useful when the input has already been segmented upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineSegmenter;

impl Segmenter for LineSegmenter {
    fn segment(&self, text: &str, _lang: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        }
    }
}

/// Get a segmenter by name (`unicode` or `line`).
pub fn by_name(name: &str) -> Option<Box<dyn Segmenter + Send + Sync>> {
    match name {
        "unicode" => Some(Box::new(UnicodeSegmenter)),
        "line" => Some(Box::new(LineSegmenter)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_two_sentences() {
        let s = UnicodeSegmenter;
        assert_eq!(
            s.segment("Berlin is a city. It is large.", "en"),
            vec!["Berlin is a city.", "It is large."]
        );
    }

    #[test]
    fn unicode_blank() {
        let s = UnicodeSegmenter;
        assert!(s.segment("   ", "en").is_empty());
    }

    #[test]
    fn line_segmenter() {
        let s = LineSegmenter;
        assert_eq!(s.segment(" a. b. ", "de"), vec!["a. b."]);
        assert!(s.segment("", "de").is_empty());
    }

    #[test]
    fn segmenter_names() {
        assert!(by_name("unicode").is_some());
        assert!(by_name("line").is_some());
        assert!(by_name("moses").is_none());
    }
}
