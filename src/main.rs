use anyhow::Context;
use clap::{ArgGroup, Parser};
use hub_notes::config::Config;
use hub_notes::infra::http_client::ReqwestHttp;
use hub_notes::logging;
use hub_notes::pipeline::{Mode, Pipeline, RunSummary};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "hub_notes")]
#[command(about = "Create notes based on the obsidian-releases repo")]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["all", "themes", "plugins"]),
))]
struct Cli {
    /// Process plugins, the uncategorized plugins note, and themes
    #[arg(long)]
    all: bool,
    /// Process themes only
    #[arg(long)]
    themes: bool,
    /// Process plugins and the uncategorized plugins note
    #[arg(long)]
    plugins: bool,
    /// Overwrite existing files.
    #[arg(long)]
    overwrite: bool,
    /// Config file (defaults to $HUB_NOTES_CONFIG, then ./config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Vault root that output directories are relative to
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,
    /// Number of manifests/stylesheets fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
    /// Only show warnings and errors on the console
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.all {
            Mode::All
        } else if self.themes {
            Mode::Themes
        } else {
            Mode::Plugins
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Results:");
    for pass in &summary.passes {
        println!(
            "   {:<14} created {:>4}   replaced {:>4}   skipped {:>4}   total {:>4}",
            pass.pass,
            pass.created,
            pass.replaced,
            pass.skipped,
            pass.total()
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
        config.validate()?;
    }
    if let Some(vault) = &cli.vault {
        config = config.rooted_at(vault);
    }

    let _guard = logging::init_logging(&config.logging, cli.quiet);

    let mode = cli.mode();
    info!(?mode, overwrite = cli.overwrite, "Starting run");

    let http = Arc::new(ReqwestHttp::new(&config.registry)?);
    let pipeline = Pipeline::new(&config, http);
    match pipeline.run(mode, cli.overwrite).await {
        Ok(summary) => {
            print_summary(&summary);
            println!("✅ Done");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            Err(e.into())
        }
    }
}
