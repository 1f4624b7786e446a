use crate::app::{for_each_ordered, PassSummary};
use crate::config::{Config, LabelsConfig};
use crate::error::{HubError, Result};
use crate::infra::github::RegistryClient;
use crate::storage::NoteWriter;
use crate::templates::{get_template, TemplateKind};
use crate::types::{PluginRecord, RegistryEntry};
use std::path::PathBuf;
use tracing::{info, info_span, instrument};

/// One note per released plugin, enriched from the plugin's manifest.
pub struct PluginsUseCase {
    registry: RegistryClient,
    writer: NoteWriter,
    templates_dir: PathBuf,
    labels: LabelsConfig,
    concurrency: usize,
}

impl PluginsUseCase {
    pub fn new(registry: RegistryClient, config: &Config) -> Self {
        Self {
            registry,
            writer: NoteWriter::new(&config.output.plugins_dir, &config.output.extension),
            templates_dir: config.templates.dir.clone(),
            labels: config.labels.clone(),
            concurrency: config.concurrency,
        }
    }

    #[instrument(skip(self))]
    pub async fn process_released_plugins(&self, overwrite: bool) -> Result<PassSummary> {
        let template = get_template(&self.templates_dir, TemplateKind::Plugin)?;
        let plugins = self.registry.get_plugins().await?;
        info!(count = plugins.len(), "Processing released plugins");

        let mut summary = PassSummary::new("plugins");
        let registry = self.registry.clone();
        for_each_ordered(
            plugins,
            self.concurrency,
            move |entry| {
                let registry = registry.clone();
                async move { enrich_plugin(&registry, entry).await }
            },
            |record: PluginRecord| {
                let _span = info_span!("plugin", id = %record.id).entered();
                let context = record.context(&self.labels);
                let outcome = self
                    .writer
                    .write_file(&template, &record.id, overwrite, &context)?;
                summary.record(outcome);
                Ok(())
            },
        )
        .await?;

        info!(
            created = summary.created,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "Finished plugins"
        );
        Ok(summary)
    }
}

async fn enrich_plugin(registry: &RegistryClient, entry: RegistryEntry) -> Result<PluginRecord> {
    let id = entry
        .id()
        .ok_or_else(|| HubError::Shape {
            url: registry.config().plugins_url.clone(),
            message: format!("plugin entry for {} has no id", entry.repo),
        })?
        .to_string();
    let manifest = registry
        .get_plugin_manifest(&entry.repo, entry.branch())
        .await?;
    Ok(PluginRecord::new(id, entry, manifest))
}
