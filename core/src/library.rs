//! Slide document discovery.
//!
//! Decks are named `<group>-<title>.html`, with a two digit group id, e.g.
//! `01-introduction.html`.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension of slide documents.
pub const DOCUMENT_EXTENSION: &str = "html";

/// Width group ids are padded to.
const GROUP_ID_WIDTH: usize = 2;

/// Pads a user supplied group id with leading zeros, e.g. `1` -> `01`.
pub fn normalize_group_id(raw: &str) -> String {
    format!("{:0>width$}", raw.trim(), width = GROUP_ID_WIDTH)
}

/// A directory of slide documents.
#[derive(Debug, Clone)]
pub struct Library {
    slides_dir: PathBuf,
}

impl Library {
    pub fn new(slides_dir: impl Into<PathBuf>) -> Self {
        Self {
            slides_dir: slides_dir.into(),
        }
    }

    pub fn slides_dir(&self) -> &Path {
        &self.slides_dir
    }

    /// Lists the group ids that have a document, sorted.
    pub fn groups(&self) -> Result<Vec<String>> {
        let groups: BTreeSet<String> = self
            .file_names()?
            .iter()
            .filter_map(|name| document_group(name))
            .map(str::to_string)
            .collect();

        Ok(groups.into_iter().collect())
    }

    /// Finds the document of `group_id`: the first `<group_id>-*.html` file in
    /// name order.
    ///
    /// A missing slides directory finds nothing.
    pub fn find_document(&self, group_id: &str) -> Result<Option<PathBuf>> {
        let names = match self.file_names() {
            Ok(names) => names,
            Err(Error::Library { source, .. }) if source.kind() == ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let prefix = format!("{}-", group_id);
        Ok(names
            .into_iter()
            .find(|name| name.starts_with(&prefix) && has_document_extension(name))
            .map(|name| self.slides_dir.join(name)))
    }

    /// Returns the sorted names of regular files in the slides directory.
    fn file_names(&self) -> Result<Vec<String>> {
        let library_err = |source| Error::Library {
            path: self.slides_dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.slides_dir).map_err(library_err)? {
            let entry = entry.map_err(library_err)?;
            if !entry.file_type().map_err(library_err)?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Returns the group id of a file named `NN-*.html`.
fn document_group(name: &str) -> Option<&str> {
    let bytes = name.as_bytes();
    let is_document = bytes.len() > GROUP_ID_WIDTH
        && bytes[..GROUP_ID_WIDTH].iter().all(u8::is_ascii_digit)
        && bytes[GROUP_ID_WIDTH] == b'-'
        && has_document_extension(name);

    is_document.then(|| &name[..GROUP_ID_WIDTH])
}

fn has_document_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == DOCUMENT_EXTENSION)
}
