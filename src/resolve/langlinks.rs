//! `langlinks` table lookup.
//!
//! Expects an SQLite export of the MediaWiki `langlinks` table:
//! `langlinks(ll_from INTEGER, ll_lang TEXT, ll_title TEXT)`.
use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{params, types::ValueRef, Connection, OpenFlags, OptionalExtension};

use super::{Connect, Resolve};
use crate::error::Error;

const QUERY: &str = "SELECT ll_title FROM langlinks WHERE ll_from = ?1 AND ll_lang = ?2 LIMIT 1";

/// Connection factory over an SQLite database file.
#[derive(Debug, Clone)]
pub struct LangLinks {
    path: PathBuf,
}

impl LangLinks {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

/// A single read-only connection.
pub struct LangLinksConnection {
    conn: Connection,
}

impl Connect for LangLinks {
    type Resolver = LangLinksConnection;

    fn connect(&self) -> Result<Self::Resolver, Error> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(LangLinksConnection { conn })
    }

    fn verify(&self) -> Result<(), Error> {
        debug!("testing access to the langlinks table in {:?}", self.path);
        let resolver = self.connect()?;
        resolver.conn.prepare(QUERY)?;
        Ok(())
    }
}

impl Resolve for LangLinksConnection {
    fn resolve(&mut self, article_id: &str, target_lang: &str) -> Result<Option<String>, Error> {
        let mut stmt = self.conn.prepare_cached(QUERY)?;
        let title = stmt
            .query_row(params![article_id, target_lang], |row| {
                // MediaWiki stores titles as binary strings, exports may keep them as blobs.
                Ok(match row.get_ref(0)? {
                    ValueRef::Text(t) | ValueRef::Blob(t) => {
                        Some(String::from_utf8_lossy(t).into_owned())
                    }
                    _ => None,
                })
            })
            .optional()?;

        Ok(title.flatten())
    }
}
