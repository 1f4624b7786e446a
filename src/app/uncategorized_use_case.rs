use crate::app::PassSummary;
use crate::categories::CategoryIndex;
use crate::config::{CategoriesConfig, Config};
use crate::error::{HubError, Result};
use crate::infra::github::RegistryClient;
use crate::storage::NoteWriter;
use crate::templates::{get_template, TemplateKind};
use crate::types::{RegistryEntry, UncategorizedGroup};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Builds the "Uncategorized plugins" category note from every released
/// plugin that no other category note mentions.
pub struct UncategorizedUseCase {
    registry: RegistryClient,
    writer: NoteWriter,
    extension: String,
    templates_dir: PathBuf,
    categories: CategoriesConfig,
}

impl UncategorizedUseCase {
    pub fn new(registry: RegistryClient, config: &Config) -> Self {
        Self {
            registry,
            writer: NoteWriter::new(&config.output.categories_dir, &config.output.extension),
            extension: config.output.extension.clone(),
            templates_dir: config.templates.dir.clone(),
            categories: config.categories.clone(),
        }
    }

    /// Registry order is preserved. Callers normally pass `overwrite = true`:
    /// this note is regenerated on every run.
    #[instrument(skip(self))]
    pub async fn get_uncategorized_plugins(&self, overwrite: bool) -> Result<PassSummary> {
        let template = get_template(&self.templates_dir, TemplateKind::Category)?;
        let released = self.registry.get_plugins().await?;
        let group = self.uncategorized_group(released)?;
        info!(count = group.plugins.len(), "Found uncategorized plugins");

        let mut summary = PassSummary::new("uncategorized");
        let outcome = self
            .writer
            .write_file(&template, &group.name, overwrite, &group.context())?;
        summary.record(outcome);
        Ok(summary)
    }

    pub fn uncategorized_group(&self, released: Vec<RegistryEntry>) -> Result<UncategorizedGroup> {
        let ids = released
            .iter()
            .map(|p| {
                p.id().ok_or_else(|| HubError::Shape {
                    url: self.registry.config().plugins_url.clone(),
                    message: format!("plugin entry for {} has no id", p.repo),
                })
            })
            .collect::<Result<Vec<&str>>>()?;

        let index = CategoryIndex::scan(
            self.writer.dir(),
            &self.extension,
            ids.iter().copied(),
            &self.categories.uncategorized_name,
            self.categories.match_mode,
        )?;

        info!(
            category_notes = index.files_scanned(),
            "Checked plugins against category notes"
        );
        let plugins = released
            .iter()
            .filter(|p| p.id().is_some_and(|id| !index.is_categorized(id)))
            .cloned()
            .collect();

        Ok(UncategorizedGroup {
            name: self.categories.uncategorized_name.clone(),
            description: self.categories.uncategorized_description.clone(),
            plugins,
        })
    }
}
