use crate::config::LabelsConfig;
use crate::constants::DEFAULT_BRANCH;
use crate::parser::theme_css::{PluginSupport, ThemeSetting};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `community-plugins.json` or `community-css-themes.json`.
///
/// Only `repo` and `branch` are interpreted; every other key is carried
/// through untouched so templates can use whatever the registry provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RegistryEntry {
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Branch to read per-repository files from; `master` when unset.
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Owner part of `owner/name`.
    pub fn user(&self) -> &str {
        user_from_repo(&self.repo)
    }

    /// Theme mode tokens in registry order. Non-string items are ignored.
    pub fn modes(&self) -> Vec<String> {
        self.fields
            .get("modes")
            .and_then(Value::as_array)
            .map(|modes| {
                modes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The entry as a flat field map, exactly as the registry listed it.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = self.fields.clone();
        fields.insert("repo".into(), Value::String(self.repo.clone()));
        if let Some(branch) = &self.branch {
            fields.insert("branch".into(), Value::String(branch.clone()));
        }
        fields
    }
}

pub fn user_from_repo(repo: &str) -> &str {
    repo.split('/').next().unwrap_or_default()
}

/// Join theme modes with `", "` and swap in the mode labels.
///
/// This is a plain text replacement over the joined string, so a token
/// such as `"darker"` also picks up the dark label.
pub fn display_modes(modes: &[String], labels: &LabelsConfig) -> String {
    modes
        .join(", ")
        .replace("dark", &labels.dark_mode)
        .replace("light", &labels.light_mode)
}

/// A plugin's `manifest.json`, kept as the raw object so every field can
/// be rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginManifest(pub Map<String, Value>);

impl PluginManifest {
    /// Only a literal JSON `true` marks a plugin desktop-only.
    pub fn is_desktop_only(&self) -> bool {
        matches!(self.0.get("isDesktopOnly"), Some(Value::Bool(true)))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    MobileCompatible,
    DesktopOnly,
}

impl Compatibility {
    pub fn from_manifest(manifest: &PluginManifest) -> Self {
        if manifest.is_desktop_only() {
            Compatibility::DesktopOnly
        } else {
            Compatibility::MobileCompatible
        }
    }

    pub fn label<'a>(&self, labels: &'a LabelsConfig) -> &'a str {
        match self {
            Compatibility::MobileCompatible => &labels.mobile_compatible,
            Compatibility::DesktopOnly => &labels.desktop_only,
        }
    }
}

/// Fields handed to a template: an immutable base record plus an ordered
/// list of named overrides. Later overrides win over earlier ones and over
/// the base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    base: Map<String, Value>,
    overrides: Vec<(String, Value)>,
}

impl RenderContext {
    pub fn new(base: Map<String, Value>) -> Self {
        Self {
            base,
            overrides: Vec::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    pub fn with_all<'a>(mut self, fields: impl IntoIterator<Item = (&'a String, &'a Value)>) -> Self {
        self.overrides
            .extend(fields.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.overrides
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .or_else(|| self.base.get(key))
    }

    /// Apply the overrides to a copy of the base.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut fields = self.base.clone();
        for (key, value) in &self.overrides {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }
}

#[derive(Debug, Clone)]
pub struct PluginRecord {
    pub id: String,
    pub entry: RegistryEntry,
    pub manifest: PluginManifest,
    pub compatibility: Compatibility,
}

impl PluginRecord {
    pub fn new(id: String, entry: RegistryEntry, manifest: PluginManifest) -> Self {
        let compatibility = Compatibility::from_manifest(&manifest);
        Self {
            id,
            entry,
            manifest,
            compatibility,
        }
    }

    /// `mobile`, then `user`, then every manifest field.
    pub fn context(&self, labels: &LabelsConfig) -> RenderContext {
        RenderContext::new(self.entry.to_fields())
            .with("mobile", self.compatibility.label(labels))
            .with("user", self.entry.user())
            .with_all(self.manifest.fields())
    }
}

#[derive(Debug, Clone)]
pub struct ThemeRecord {
    pub name: String,
    pub entry: RegistryEntry,
    pub modes: String,
    pub settings: Vec<ThemeSetting>,
    pub plugins: Vec<PluginSupport>,
}

impl ThemeRecord {
    /// `user`, `modes`, `branch`, `settings`, `plugins`.
    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.entry.to_fields())
            .with("user", self.entry.user())
            .with("modes", self.modes.as_str())
            .with("branch", self.entry.branch())
            .with("settings", to_value_list(&self.settings))
            .with("plugins", to_value_list(&self.plugins))
    }
}

/// The synthetic "Uncategorized plugins" category note.
#[derive(Debug, Clone)]
pub struct UncategorizedGroup {
    pub name: String,
    pub description: String,
    pub plugins: Vec<RegistryEntry>,
}

impl UncategorizedGroup {
    pub fn context(&self) -> RenderContext {
        let plugins: Vec<Value> = self
            .plugins
            .iter()
            .map(|p| Value::Object(p.to_fields()))
            .collect();
        RenderContext::default()
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("plugins", plugins)
    }
}

fn to_value_list<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}
