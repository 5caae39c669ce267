// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use git_source::utils::logging::{format_error, format_success};
use git_source::{
    Config, ContentStore, CredentialedRemote, ImportPipeline, JsonExporter,
    RepositorySynchronizer,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "git_source")]
#[command(version = "0.1.0")]
#[command(about = "Mirror a git repository and import its files into a content graph", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize the local mirror with the configured remote
    Sync,

    /// Run the full import pipeline and report the resulting node counts
    Import {
        #[arg(long)]
        skip_sync: bool,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Run the import pipeline and dump the store collections to JSON files
    Export {
        #[arg(long)]
        skip_sync: bool,

        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    git_source::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Sync => cmd_sync(&config)?,
        Commands::Import { skip_sync, limit } => cmd_import(config, skip_sync, limit).await?,
        Commands::Export {
            skip_sync,
            output,
            pretty,
        } => cmd_export(config, skip_sync, output, pretty).await?,
    }

    Ok(())
}

fn cmd_sync(config: &Config) -> Result<()> {
    let mirror = config.mirror_path();
    let remote = CredentialedRemote::from_config(&config.source);
    let synchronizer = RepositorySynchronizer::new(remote);

    match synchronizer.sync(&mirror) {
        Ok(()) => {
            let branch = synchronizer.current_branch(&mirror)?;
            println!(
                "{}",
                format_success(&format!(
                    "Mirror at {} is on branch {}",
                    mirror.display(),
                    branch
                ))
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", format_error(&format!("Sync failed: {e}")));
            Err(e.into())
        }
    }
}

async fn cmd_import(mut config: Config, skip_sync: bool, limit: Option<usize>) -> Result<()> {
    if skip_sync {
        config.pipeline.sync_on_start = false;
    }

    let pipeline = ImportPipeline::new(config).context("Invalid source configuration")?;
    let mut store = ContentStore::new();
    let stats = pipeline
        .run(&mut store, limit)
        .await
        .context("Import run failed")?;

    println!(
        "{}",
        format_success(&format!(
            "Imported {} nodes ({} reference nodes) from {} files in {}s",
            stats.nodes_created, stats.refs_created, stats.files_enumerated, stats.duration_secs
        ))
    );

    Ok(())
}

async fn cmd_export(
    mut config: Config,
    skip_sync: bool,
    output: PathBuf,
    pretty: bool,
) -> Result<()> {
    if skip_sync {
        config.pipeline.sync_on_start = false;
    }

    let pipeline = ImportPipeline::new(config).context("Invalid source configuration")?;
    let mut store = ContentStore::new();
    let stats = pipeline
        .run(&mut store, None)
        .await
        .context("Import run failed")?;

    let exporter = JsonExporter::new(&output)?;
    let manifest = exporter.export_all(&store, pretty)?;

    println!(
        "{}",
        format_success(&format!(
            "Exported {} nodes ({} reference nodes) across {} files to {}",
            stats.nodes_created,
            stats.refs_created,
            manifest.files.len(),
            output.display()
        ))
    );

    Ok(())
}
