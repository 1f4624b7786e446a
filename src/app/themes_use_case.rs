use crate::app::{for_each_ordered, PassSummary};
use crate::config::{Config, LabelsConfig};
use crate::error::{HubError, Result};
use crate::infra::github::RegistryClient;
use crate::parser::theme_css::{get_theme_plugin_support, get_theme_settings};
use crate::storage::NoteWriter;
use crate::templates::{get_template, TemplateKind};
use crate::types::{display_modes, RegistryEntry, ThemeRecord};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, instrument};

/// One note per released theme, enriched from the theme's stylesheet.
pub struct ThemesUseCase {
    registry: RegistryClient,
    writer: NoteWriter,
    templates_dir: PathBuf,
    labels: Arc<LabelsConfig>,
    concurrency: usize,
}

impl ThemesUseCase {
    pub fn new(registry: RegistryClient, config: &Config) -> Self {
        Self {
            registry,
            writer: NoteWriter::new(&config.output.themes_dir, &config.output.extension),
            templates_dir: config.templates.dir.clone(),
            labels: Arc::new(config.labels.clone()),
            concurrency: config.concurrency,
        }
    }

    #[instrument(skip(self))]
    pub async fn process_released_themes(&self, overwrite: bool) -> Result<PassSummary> {
        let template = get_template(&self.templates_dir, TemplateKind::Theme)?;
        let themes = self.registry.get_themes().await?;
        info!(count = themes.len(), "Processing released themes");

        let mut summary = PassSummary::new("themes");
        let registry = self.registry.clone();
        let labels = self.labels.clone();
        for_each_ordered(
            themes,
            self.concurrency,
            move |entry| {
                let registry = registry.clone();
                let labels = labels.clone();
                async move { enrich_theme(&registry, &labels, entry).await }
            },
            |record: ThemeRecord| {
                let _span = info_span!("theme", name = %record.name).entered();
                let outcome =
                    self.writer
                        .write_file(&template, &record.name, overwrite, &record.context())?;
                summary.record(outcome);
                Ok(())
            },
        )
        .await?;

        info!(
            created = summary.created,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "Finished themes"
        );
        Ok(summary)
    }
}

async fn enrich_theme(
    registry: &RegistryClient,
    labels: &LabelsConfig,
    entry: RegistryEntry,
) -> Result<ThemeRecord> {
    let name = entry
        .name()
        .ok_or_else(|| HubError::Shape {
            url: registry.config().themes_url.clone(),
            message: format!("theme entry for {} has no name", entry.repo),
        })?
        .to_string();
    let modes = display_modes(&entry.modes(), labels);
    let css = registry.get_theme_css(&entry.repo, entry.branch()).await?;
    let settings = get_theme_settings(&css);
    let plugins = get_theme_plugin_support(&css);
    debug!(
        theme = %name,
        settings = settings.len(),
        plugins = plugins.len(),
        "Scanned stylesheet"
    );
    Ok(ThemeRecord {
        name,
        entry,
        modes,
        settings,
        plugins,
    })
}
