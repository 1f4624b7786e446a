use crate::error::Result;
use crate::templates::NoteTemplate;
use crate::types::RenderContext;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What `write_file` did with a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Replaced,
    /// The note exists and overwriting is off. Not an error.
    Skipped,
}

/// Writes rendered notes into one directory as `{name}.{extension}`.
#[derive(Debug, Clone)]
pub struct NoteWriter {
    dir: PathBuf,
    extension: String,
}

impl NoteWriter {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn note_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize_file_name(name), self.extension))
    }

    pub fn write_file(
        &self,
        template: &NoteTemplate,
        name: &str,
        overwrite: bool,
        context: &RenderContext,
    ) -> Result<WriteOutcome> {
        let path = self.note_path(name);
        let exists = path.exists();
        if exists && !overwrite {
            info!(note = %name, path = %path.display(), "Note exists, skipping");
            return Ok(WriteOutcome::Skipped);
        }

        let contents = template.render(&context.resolve())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;

        let outcome = if exists {
            WriteOutcome::Replaced
        } else {
            WriteOutcome::Created
        };
        debug!(note = %name, path = %path.display(), ?outcome, "Wrote note");
        Ok(outcome)
    }
}

/// Replace characters that are not allowed in file names, including path
/// separators, with `-`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "-".to_string(),
        trimmed => trimmed.to_string(),
    }
}
