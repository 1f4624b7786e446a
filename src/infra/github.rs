use crate::app::ports::HttpClientPort;
use crate::config::RegistryConfig;
use crate::constants::raw_file_url;
use crate::error::{HubError, Result};
use crate::types::{PluginManifest, RegistryEntry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Reads the obsidian-releases registry and per-repository files from
/// raw.githubusercontent.com (or whatever `raw_base` points at).
#[derive(Clone)]
pub struct RegistryClient {
    http: Arc<dyn HttpClientPort>,
    config: RegistryConfig,
}

impl RegistryClient {
    pub fn new(http: Arc<dyn HttpClientPort>, config: RegistryConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Fetch and parse a JSON document. No retries.
    #[instrument(skip(self))]
    pub async fn get_json_from_github(&self, url: &str) -> Result<Value> {
        let resp = self.http.get(url).await?;
        if !resp.is_success() {
            return Err(HubError::Status {
                url: url.to_string(),
                status: resp.status,
            });
        }
        serde_json::from_slice(&resp.bytes).map_err(|source| HubError::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch a registry list. Every entry must be an object with a `repo`.
    pub async fn get_registry(&self, url: &str) -> Result<Vec<RegistryEntry>> {
        let doc = self.get_json_from_github(url).await?;
        let Value::Array(items) = doc else {
            return Err(HubError::Shape {
                url: url.to_string(),
                message: "expected a JSON array".into(),
            });
        };
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value::<RegistryEntry>(item).map_err(|e| HubError::Shape {
                    url: url.to_string(),
                    message: format!("entry {}: {}", i, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(url, count = entries.len(), "Fetched registry");
        Ok(entries)
    }

    pub async fn get_plugins(&self) -> Result<Vec<RegistryEntry>> {
        let url = self.config.plugins_url.clone();
        self.get_registry(&url).await
    }

    pub async fn get_themes(&self) -> Result<Vec<RegistryEntry>> {
        let url = self.config.themes_url.clone();
        self.get_registry(&url).await
    }

    pub fn manifest_url(&self, repo: &str, branch: &str) -> String {
        raw_file_url(&self.config.raw_base, repo, branch, &self.config.manifest_file)
    }

    /// A plugin's manifest. Missing optional fields are simply absent.
    pub async fn get_plugin_manifest(&self, repo: &str, branch: &str) -> Result<PluginManifest> {
        let url = self.manifest_url(repo, branch);
        match self.get_json_from_github(&url).await? {
            Value::Object(fields) => Ok(PluginManifest(fields)),
            _ => Err(HubError::Shape {
                url,
                message: "expected a JSON object".into(),
            }),
        }
    }

    /// First stylesheet candidate that exists on the branch. A theme with
    /// none of them yields an empty stylesheet, not an error.
    pub async fn get_theme_css(&self, repo: &str, branch: &str) -> Result<String> {
        for file in &self.config.theme_css_files {
            let url = raw_file_url(&self.config.raw_base, repo, branch, file);
            let resp = self.http.get(&url).await?;
            if resp.is_success() {
                return Ok(resp.text());
            }
            debug!(url = %url, status = resp.status, "Stylesheet candidate not found");
        }
        warn!(repo, branch, "No stylesheet found for theme");
        Ok(String::new())
    }
}
