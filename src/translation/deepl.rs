//! DeepL API v2 backend.
//!
//! Texts are sent as repeated `text` query parameters of a single GET request, with automatic
//! sentence splitting disabled (`split_sentences=0`) so that each text yields exactly one
//! translation. Long chunks produce long URLs, which the API rejects with `414 URI Too Long`.
use std::time::Duration;

use log::{debug, log_enabled, trace, Level};
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use super::{Translate, TranslateError};
use crate::error::Error;

pub const DEEPL_URL: &str = "https://api.deepl.com/v2/translate";
pub const DEEPL_FREE_URL: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Debug, Deserialize)]
struct Response {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

pub struct DeepL {
    endpoint: Url,
    auth_key: String,
    client: Client,
}

impl DeepL {
    pub fn new(auth_key: String) -> Result<Self, Error> {
        let endpoint = Url::parse(DEEPL_URL).map_err(|e| Error::Custom(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            endpoint,
            auth_key,
            client,
        })
    }

    /// Use another endpoint (e.g. [DEEPL_FREE_URL]).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, Error> {
        self.endpoint = Url::parse(endpoint).map_err(|e| Error::Custom(e.to_string()))?;
        Ok(self)
    }

    /// Build the request URL. The authentication key is sent as a header, not in the URL.
    fn request_url(&self, texts: &[&str], source_lang: &str, target_lang: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for text in texts {
                query.append_pair("text", text);
            }
            query
                .append_pair("source_lang", source_lang)
                .append_pair("target_lang", target_lang)
                .append_pair("split_sentences", "0");
        }
        url
    }
}

/// Map an HTTP status to an error, if it is one.
fn check_status(status: u16, body: &str) -> Result<(), TranslateError> {
    match status {
        200..=299 => Ok(()),
        413 | 414 => Err(TranslateError::Oversize { status }),
        _ => Err(TranslateError::Status {
            status,
            body: body.to_string(),
        }),
    }
}

/// Extract translations, checking that there is one per text.
fn parse_response(body: &str, expected: usize) -> Result<Vec<String>, TranslateError> {
    let response: Response = serde_json::from_str(body)?;
    if response.translations.len() != expected {
        return Err(TranslateError::Mismatch {
            expected,
            got: response.translations.len(),
        });
    }
    Ok(response.translations.into_iter().map(|t| t.text).collect())
}

impl Translate for DeepL {
    fn translate_sentences(
        &self,
        texts: &[&str],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, TranslateError> {
        let url = self.request_url(texts, source_lang, target_lang);
        debug!("requesting {} translations ({} bytes)", texts.len(), url.as_str().len());

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        if log_enabled!(Level::Trace) {
            trace!("status {}: {}", status, body);
        }

        check_status(status, &body)?;
        parse_response(&body, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_params() {
        let d = DeepL::new("secret".to_string()).unwrap();
        let url = d.request_url(&["Der Hund läuft.", "a&b"], "DE", "EN");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("text".to_string(), "Der Hund läuft.".to_string()),
                ("text".to_string(), "a&b".to_string()),
                ("source_lang".to_string(), "DE".to_string()),
                ("target_lang".to_string(), "EN".to_string()),
                ("split_sentences".to_string(), "0".to_string()),
            ]
        );
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn statuses() {
        assert!(check_status(200, "").is_ok());
        assert!(check_status(414, "").unwrap_err().is_oversize());
        assert!(check_status(413, "").unwrap_err().is_oversize());
        assert!(!check_status(456, "quota").unwrap_err().is_oversize());
        assert!(!check_status(500, "").unwrap_err().is_oversize());
    }

    #[test]
    fn response_parsing() {
        let body = r#"{"translations":[{"detected_source_language":"DE","text":"The dog runs."},{"detected_source_language":"DE","text":"Hi"}]}"#;
        assert_eq!(
            parse_response(body, 2).unwrap(),
            vec!["The dog runs.", "Hi"]
        );
        assert!(matches!(
            parse_response(body, 3),
            Err(TranslateError::Mismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(matches!(
            parse_response("nope", 1),
            Err(TranslateError::Serde(_))
        ));
    }
}
