use crate::error::{HubError, Result};
use minijinja::{Environment, UndefinedBehavior};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TEMPLATE_SUFFIX: &str = ".md.jinja";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Plugin,
    Theme,
    Category,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Plugin => "plugin",
            TemplateKind::Theme => "theme",
            TemplateKind::Category => "category",
        }
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}{}", self.as_str(), TEMPLATE_SUFFIX))
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed note template. Fields the template refers to but the record
/// lacks render as empty.
pub struct NoteTemplate {
    kind: TemplateKind,
    env: Environment<'static>,
}

impl NoteTemplate {
    pub fn from_source(kind: TemplateKind, source: String) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_keep_trailing_newline(true);
        env.add_template_owned(kind.as_str(), source)?;
        Ok(Self { kind, env })
    }

    pub fn render(&self, fields: &Map<String, Value>) -> Result<String> {
        let template = self.env.get_template(self.kind.as_str())?;
        Ok(template.render(fields)?)
    }
}

/// Load `{dir}/{kind}.md.jinja`.
pub fn get_template(dir: &Path, kind: TemplateKind) -> Result<NoteTemplate> {
    let path = kind.path_in(dir);
    let source = fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HubError::TemplateNotFound {
            kind: kind.to_string(),
            path: path.display().to_string(),
        },
        _ => HubError::Io(e),
    })?;
    debug!(kind = %kind, path = %path.display(), "Loaded template");
    NoteTemplate::from_source(kind, source)
}
