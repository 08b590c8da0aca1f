//! tccloud CLI - Main Entry Point
//!
//! Drives Tencent Cloud PTS and MPS resources through the provider, keeping
//! each resource's state in a JSON file.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{data, resource, schema, ProviderArgs};

/// tccloud CLI - Tencent Cloud PTS and MPS resources
#[derive(Parser)]
#[command(name = "tccloud")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show resource and data source schemas
    Schema(schema::SchemaArgs),

    /// Plan, apply, read, destroy or import one resource
    #[command(subcommand)]
    Resource(resource::ResourceCommands),

    /// Read data sources
    #[command(subcommand)]
    Data(data::DataCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Schema(args) => schema::execute(args, cli.format)?,
        Commands::Resource(cmd) => resource::execute(cmd, &cli.provider, cli.format).await?,
        Commands::Data(cmd) => data::execute(cmd, &cli.provider, cli.format).await?,
        Commands::Version => {
            println!("tccloud CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Provider core v{}", tccloud_common::VERSION);
        }
    }

    Ok(())
}
