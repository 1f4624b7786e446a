//! Annotation scanners for theme stylesheets.
//!
//! Themes describe their configurable options in Style Settings blocks:
//!
//! ```css
//! /* @settings
//! name: Minimal
//! id: minimal-style
//! settings:
//!   - id: accent
//!     title: Accent color
//!     type: variable-color
//! */
//! ```
//!
//! and list the plugins they style in a similar block:
//!
//! ```css
//! /* @plugins
//! core:
//! - backlinks
//! community:
//! - obsidian-kanban
//! */
//! ```
//!
//! Malformed blocks are skipped with a warning; neither scanner fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value as YamlValue;
use std::collections::HashSet;
use tracing::warn;

static SETTINGS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\s*@settings\b(.*?)\*/").expect("valid regex"));
static PLUGINS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\s*@plugins\b(.*?)\*/").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeSetting {
    /// `name` of the enclosing @settings block.
    pub section: String,
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Core,
    Community,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSupport {
    pub id: String,
    pub kind: PluginKind,
}

#[derive(Debug, Deserialize)]
struct SettingsBlock {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    settings: Vec<YamlValue>,
}

#[derive(Debug, Deserialize)]
struct SettingEntry {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PluginsBlock {
    #[serde(default)]
    core: Vec<YamlValue>,
    #[serde(default)]
    community: Vec<YamlValue>,
}

/// YAML forbids tabs for indentation but plenty of stylesheets use them.
fn block_yaml(raw: &str) -> String {
    raw.replace('\t', "    ")
}

pub fn get_theme_settings(css: &str) -> Vec<ThemeSetting> {
    let mut out = Vec::new();
    for caps in SETTINGS_BLOCK.captures_iter(css) {
        let block = match serde_yaml_ng::from_str::<SettingsBlock>(&block_yaml(&caps[1])) {
            Ok(block) => block,
            Err(e) => {
                warn!(error = %e, "Skipping malformed @settings block");
                continue;
            }
        };
        let section = block.name.or(block.id).unwrap_or_default();
        for raw in block.settings {
            let entry: SettingEntry = match serde_yaml_ng::from_value(raw) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(section = %section, error = %e, "Skipping malformed setting");
                    continue;
                }
            };
            if entry.kind == "heading" {
                continue;
            }
            out.push(ThemeSetting {
                section: section.clone(),
                id: entry.id,
                title: entry.title,
                kind: entry.kind,
                description: entry.description,
            });
        }
    }
    out
}

pub fn get_theme_plugin_support(css: &str) -> Vec<PluginSupport> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for caps in PLUGINS_BLOCK.captures_iter(css) {
        let block = match serde_yaml_ng::from_str::<Option<PluginsBlock>>(&block_yaml(&caps[1])) {
            Ok(Some(block)) => block,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "Skipping malformed @plugins block");
                continue;
            }
        };
        let listed = block
            .core
            .iter()
            .map(|v| (v, PluginKind::Core))
            .chain(block.community.iter().map(|v| (v, PluginKind::Community)));
        for (value, kind) in listed {
            let Some(id) = value.as_str().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            if seen.insert(id.to_string()) {
                out.push(PluginSupport {
                    id: id.to_string(),
                    kind,
                });
            }
        }
    }
    out
}
