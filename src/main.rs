//! Reqstool packaging CLI
//!
//! Entry point for the `reqstool-pack` command-line tool, standing in for the
//! host build tool's extension loader: it constructs the configured hook and
//! drives its lifecycle for one build.

use clap::{Parser, Subcommand};
use reqstool_pack::{config, hook, BuildContext, HookError, PluginConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reqstool-pack")]
#[command(about = "Requirements-traceability packaging hooks", version)]
struct Cli {
    /// Path to the component's Cargo.toml
    #[arg(long, default_value = "Cargo.toml", global = true)]
    manifest: PathBuf,

    /// Path to a standalone plugin config file (overrides Cargo.toml metadata)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pre-build lifecycle phase
    Init {
        /// Hook to drive (reqstool or reqstool_decorators)
        #[arg(long, default_value = hook::names::REQSTOOL)]
        hook: String,

        /// Output the assemble reports in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the full lifecycle against an already-built primary artifact
    Finalize {
        /// Path to the primary artifact (tar.gz)
        artifact: PathBuf,

        /// Hook to drive (reqstool or reqstool_decorators)
        #[arg(long, default_value = hook::names::REQSTOOL)]
        hook: String,
    },

    /// Validate the configuration and print the effective settings
    Verify,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Init { hook, json } => run_lifecycle(&cli.manifest, &cli.config, &hook, None, json),
        Commands::Finalize { artifact, hook } => {
            run_lifecycle(&cli.manifest, &cli.config, &hook, Some(artifact), false)
        }
        Commands::Verify => run_verify(&cli.manifest, &cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn load(
    manifest: &PathBuf,
    config_path: &Option<PathBuf>,
) -> Result<(config::ComponentMetadata, PluginConfig), HookError> {
    let (metadata, manifest_config) = config::load_from_manifest(manifest)?;
    let config = match config_path {
        Some(path) => PluginConfig::from_file(path)?,
        None => manifest_config,
    };
    Ok((metadata, config))
}

fn run_lifecycle(
    manifest: &PathBuf,
    config_path: &Option<PathBuf>,
    hook_name: &str,
    artifact: Option<PathBuf>,
    json: bool,
) -> Result<(), HookError> {
    let (metadata, config) = load(manifest, config_path)?;
    let mut hook = hook::hook_by_name(hook_name, config)?;
    let mut ctx = BuildContext::new(metadata, "sdist");

    hook.initialize(&mut ctx)?;

    // The manifest generator must run before any splice step, so finalize
    // drives the full per-build lifecycle in this process.
    if let Some(ref artifact) = artifact {
        hook.finalize(&mut ctx, artifact)?;
        println!("Finalized: {}", artifact.display());
    }

    if json {
        let output = serde_json::to_string_pretty(&ctx.reports)
            .map_err(|e| HookError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        println!("{}", output);
    } else {
        for path in &ctx.artifacts {
            println!("Produced: {}", path.display());
        }
    }

    Ok(())
}

fn run_verify(manifest: &PathBuf, config_path: &Option<PathBuf>) -> Result<(), HookError> {
    let (metadata, config) = load(manifest, config_path)?;

    println!("Configuration valid");
    println!();
    println!("  Component: {} {}", metadata.name, metadata.version);
    println!("  Mode: {:?}", config.mode);
    if !config.sources.is_empty() {
        let sources: Vec<String> = config
            .sources
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("  Sources: {}", sources.join(", "));
    }
    println!("  Dataset path: {}", config.dataset_path.display());
    println!("  Output directory: {}", config.output_directory.display());
    println!("  Junit XML file: {}", config.junit_xml_file.display());
    println!("  Processor: {}", config.processor);
    if let Some(ref name) = config.archive_name {
        println!("  Archive name: {}", name);
    }

    Ok(())
}
