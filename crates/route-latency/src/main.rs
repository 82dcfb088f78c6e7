mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, FetchOptions};
use route_latency::{
    orchestrator::Orchestrator,
    parser::parse_message,
    report,
    settings::{Settings, validation::validate_config},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut settings = if let Some(config_path) = &self.config {
            Settings::from_path(config_path)?
        } else {
            Settings::from_env()?
        };

        // Apply CLI overrides (if any)
        if let Some(log_level) = &self.log_level {
            settings.log_level = log_level.clone();
        }

        match self.command {
            Commands::Report {
                fetch,
                refresh,
                no_cache,
                top,
                mode,
                format,
            } => {
                apply_fetch_options(&mut settings, &fetch);
                if no_cache {
                    settings.cache.enabled = false;
                }
                if let Some(top) = top {
                    settings.analysis.top_n = top;
                }
                if let Some(mode) = mode {
                    settings.analysis.mode = mode;
                }
                validate_config(&settings)?;
                init_logging(&settings.log_level)?;
                info!("{settings}");

                let orchestrator = Orchestrator::new(&settings);
                let summary = orchestrator.report(refresh).await?;
                print!(
                    "{}",
                    report::render(&summary, settings.analysis.top_n, format)?
                );
                Ok(())
            }
            Commands::Fetch { fetch } => {
                apply_fetch_options(&mut settings, &fetch);
                validate_config(&settings)?;
                init_logging(&settings.log_level)?;
                info!("{settings}");

                let orchestrator = Orchestrator::new(&settings);
                let count = orchestrator.fetch().await?;
                info!(
                    "Wrote {} records to {:?}",
                    count, orchestrator.settings().cache.path
                );
                Ok(())
            }
            Commands::Parse { message } => {
                validate_config(&settings)?;
                init_logging(&settings.log_level)?;

                let fields = parse_message(&message, &settings.analysis.marker_key);
                println!("{}", serde_json::to_string_pretty(&fields)?);
                Ok(())
            }
        }
    }
}

fn apply_fetch_options(settings: &mut Settings, options: &FetchOptions) {
    if let Some(since) = &options.since {
        settings.filter.since = since.clone();
    }
    if let Some(cache_file) = &options.cache_file {
        settings.cache.path = cache_file.clone();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}

fn init_logging(log_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
