use crate::app::plugins_use_case::PluginsUseCase;
use crate::app::ports::HttpClientPort;
use crate::app::themes_use_case::ThemesUseCase;
use crate::app::uncategorized_use_case::UncategorizedUseCase;
use crate::app::PassSummary;
use crate::config::Config;
use crate::error::Result;
use crate::infra::github::RegistryClient;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    All,
    Plugins,
    Themes,
}

impl Mode {
    pub fn includes_plugins(&self) -> bool {
        matches!(self, Mode::All | Mode::Plugins)
    }

    pub fn includes_themes(&self) -> bool {
        matches!(self, Mode::All | Mode::Themes)
    }
}

/// Result of a complete run, one entry per pass in execution order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub passes: Vec<PassSummary>,
}

impl RunSummary {
    pub fn pass(&self, name: &str) -> Option<&PassSummary> {
        self.passes.iter().find(|p| p.pass == name)
    }
}

pub struct Pipeline {
    plugins: PluginsUseCase,
    themes: ThemesUseCase,
    uncategorized: UncategorizedUseCase,
}

impl Pipeline {
    pub fn new(config: &Config, http: Arc<dyn HttpClientPort>) -> Self {
        let registry = RegistryClient::new(http, config.registry.clone());
        Self {
            plugins: PluginsUseCase::new(registry.clone(), config),
            themes: ThemesUseCase::new(registry.clone(), config),
            uncategorized: UncategorizedUseCase::new(registry, config),
        }
    }

    /// Plugins, then the uncategorized note (always overwritten), then
    /// themes. Any error aborts the run.
    #[instrument(skip(self))]
    pub async fn run(&self, mode: Mode, overwrite: bool) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        if mode.includes_plugins() {
            summary
                .passes
                .push(self.plugins.process_released_plugins(overwrite).await?);
            summary
                .passes
                .push(self.uncategorized.get_uncategorized_plugins(true).await?);
        }
        if mode.includes_themes() {
            summary
                .passes
                .push(self.themes.process_released_themes(overwrite).await?);
        }
        info!(passes = summary.passes.len(), "Run complete");
        Ok(summary)
    }
}
