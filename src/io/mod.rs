/*!
# IO utilities

Tab-separated reading/writing and append-only sinks for sentence records.
!*/
mod sink;
mod tsv;

pub use sink::RecordSink;
pub use tsv::Tsv;

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Error;

/// List every file under `dir`, recursively, in sorted path order.
///
/// The order is deterministic so that "later file wins" rules do not depend on the filesystem.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::Custom(format!("{:?} is not a directory", dir)));
    }

    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non utf-8 path: {:?}", dir)))?;
    // the directory itself may contain glob metacharacters
    let pattern = Path::new(&glob::Pattern::escape(dir_str))
        .join("**")
        .join("*");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non utf-8 path: {:?}", dir)))?;

    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        warn!("no files found in {:?}", dir);
    }
    Ok(files)
}
