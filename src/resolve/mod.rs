/*! Cross-lingual title resolution.

Two narrow capabilities:
- [Connect] opens a fresh [Resolve] connection. It is shared (read-only) across workers,
  the connections it opens are not.
- [Resolve] answers "what is the title of article `id` in language `lang`?".

A missing title is not an error: it is reported as `Ok(None)`.
!*/
mod langlinks;

pub use langlinks::LangLinks;

use crate::error::Error;

/// Lookup of the title of an article in another language.
pub trait Resolve {
    fn resolve(&mut self, article_id: &str, target_lang: &str) -> Result<Option<String>, Error>;
}

/// Opens lookup connections. One connection is opened per unit of work.
pub trait Connect: Sync {
    type Resolver: Resolve;

    fn connect(&self) -> Result<Self::Resolver, Error>;

    /// Check that the store is reachable. Called once before any processing begins.
    fn verify(&self) -> Result<(), Error> {
        self.connect().map(|_| ())
    }
}

/// Where records of an article go after resolution.
#[derive(Debug)]
pub struct Routed<T> {
    pub matched: Vec<T>,
    pub unmatched: Vec<T>,
}

// no `T: Default` bound, unlike the derive
impl<T> Default for Routed<T> {
    fn default() -> Self {
        Self {
            matched: Vec::new(),
            unmatched: Vec::new(),
        }
    }
}

impl<T> Routed<T> {
    pub fn extend(&mut self, other: Routed<T>) {
        self.matched.extend(other.matched);
        self.unmatched.extend(other.unmatched);
    }

    pub fn len(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
