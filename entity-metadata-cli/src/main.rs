//! Entity Metadata CLI Tool
//!
//! Prints the table metadata extracted from annotated entity definitions,
//! or the built-in value type to storage type mapping.

use clap::{Parser, Subcommand};
use entity_metadata::{MetadataCache, MetadataConfig, MetadataExtractor, TableMetadata};
use entity_metadata_cli::{extract_tables, load_entities, type_report};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "entity-metadata")]
#[command(about = "Extract table metadata from annotated entity definitions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print table metadata as JSON
    Extract {
        /// Input file or directory containing entity definitions
        #[arg(short, long)]
        input: PathBuf,

        /// Only extract this entity
        #[arg(short, long)]
        entity: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the value type to storage type mapping and the resolution rules
    Types,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Extract {
            input,
            entity,
            pretty,
        } => {
            let config = match &cli.config {
                Some(path) => MetadataConfig::load_from(path)?,
                None => MetadataConfig::load()?,
            };
            handle_extract(config, &input, entity.as_deref(), pretty)
        }
        Commands::Types => {
            print!("{}", type_report());
            Ok(())
        }
    }
}

fn handle_extract(
    config: MetadataConfig,
    input: &Path,
    entity: Option<&str>,
    pretty: bool,
) -> anyhow::Result<()> {
    log::info!("Loading entity definitions from {}", input.display());
    let entities = load_entities(input)?;
    if entities.is_empty() {
        anyhow::bail!("No entities found in {}", input.display());
    }

    let cache = MetadataCache::new(Arc::new(MetadataExtractor::new(config)));
    let tables = extract_tables(&cache, &entities, entity)?;
    log::info!(
        "Extracted {} table{} from {} entit{}",
        tables.len(),
        if tables.len() == 1 { "" } else { "s" },
        entities.len(),
        if entities.len() == 1 { "y" } else { "ies" }
    );

    let tables: Vec<&TableMetadata> = tables.iter().map(Arc::as_ref).collect();
    let output = if pretty {
        serde_json::to_string_pretty(&tables)?
    } else {
        serde_json::to_string(&tables)?
    };
    println!("{}", output);
    Ok(())
}
