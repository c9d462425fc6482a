//! `<doc …>` header line parsing.
//!
//! Attributes are located by scanning for fixed `name=` patterns rather than by parsing markup.
//! `id` and `url` end at the next quote (or whitespace when unquoted), `title` extends to the
//! last quote of the line so that titles containing quotes are kept whole.

/// Line prefix opening an article.
pub const DOC_OPEN: &str = "<doc ";
/// Line prefix closing an article.
pub const DOC_CLOSE: &str = "</doc>";

/// Metadata carried by a `<doc id="…" url="…" title="…">` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocHeader {
    pub id: String,
    pub url: String,
    pub title: String,
}

impl DocHeader {
    /// Parse a header line. Returns [None] if one of the three attributes is absent
    /// or if the id is empty.
    pub fn parse(line: &str) -> Option<Self> {
        let head = line.trim_end();
        let head = head.strip_prefix(DOC_OPEN).unwrap_or(head);
        let head = head.strip_suffix('>').unwrap_or(head);

        let id = short_value(attribute(head, "id")?)?;
        let url = short_value(attribute(head, "url")?)?;
        let title = long_value(attribute(head, "title")?)?;

        if id.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
        })
    }
}

/// Find `name=` at an attribute boundary (start of the head or after whitespace)
/// and return what follows.
///
/// The boundary check keeps `id=` from matching inside `?curid=`.
fn attribute<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!("{name}=");
    let mut from = 0;
    while let Some(pos) = head[from..].find(&pattern) {
        let start = from + pos;
        if start == 0 || head[..start].ends_with(char::is_whitespace) {
            return Some(&head[start + pattern.len()..]);
        }
        from = start + pattern.len();
    }
    None
}

fn short_value(rest: &str) -> Option<&str> {
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.find('"').map(|end| &quoted[..end]),
        None => Some(rest.split_whitespace().next().unwrap_or("")),
    }
}

fn long_value(rest: &str) -> Option<&str> {
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.rfind('"').map(|end| &quoted[..end]),
        None => Some(rest.trim()),
    }
}
