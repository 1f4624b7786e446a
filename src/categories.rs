use crate::config::MatchMode;
use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identifiers already referenced by some category note.
#[derive(Debug, Default)]
pub struct CategoryIndex {
    categorized: HashSet<String>,
    files_scanned: usize,
}

impl CategoryIndex {
    /// Read every category note in `dir` (except the uncategorized one) and
    /// record which of `ids` appear in it.
    pub fn scan<'a>(
        dir: &Path,
        extension: &str,
        ids: impl IntoIterator<Item = &'a str> + Clone,
        uncategorized_name: &str,
        mode: MatchMode,
    ) -> Result<Self> {
        let mut index = Self::default();
        for file in get_category_files(dir, extension)? {
            if is_named(&file, uncategorized_name) {
                continue;
            }
            let contents = fs::read_to_string(&file)?;
            for id in ids.clone() {
                if !index.categorized.contains(id) && contains_id(&contents, id, mode) {
                    index.categorized.insert(id.to_string());
                }
            }
            index.files_scanned += 1;
        }
        debug!(
            files = index.files_scanned,
            categorized = index.categorized.len(),
            "Scanned category notes"
        );
        Ok(index)
    }

    pub fn is_categorized(&self, id: &str) -> bool {
        self.categorized.contains(id)
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }
}

/// Category notes in `dir`, sorted by path. A missing directory has none.
pub fn get_category_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Category directory does not exist");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Only the note's own name counts, not the directories above it.
fn is_named(file: &Path, name: &str) -> bool {
    file.file_stem().is_some_and(|stem| stem == name)
}

pub fn contains_id(haystack: &str, id: &str, mode: MatchMode) -> bool {
    if id.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => haystack.contains(id),
        MatchMode::Delimited => haystack.match_indices(id).any(|(start, _)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + id.len()..].chars().next();
            !before.is_some_and(is_id_char) && !after.is_some_and(is_id_char)
        }),
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
