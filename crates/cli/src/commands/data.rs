//! Data Source Commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use super::{check, connect, read_tree, ProviderArgs};
use crate::output::{print_document, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Run a data source and print its results
    Read {
        /// Data source type, e.g. tencentcloud_mps_schedules
        #[arg(long = "type")]
        type_name: String,

        /// Filters (JSON or YAML); no file means no filters
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn execute(cmd: DataCommands, provider_args: &ProviderArgs, format: OutputFormat) -> Result<()> {
    match cmd {
        DataCommands::Read { type_name, config } => {
            let provider = connect(provider_args).await?;
            let config = match config {
                Some(path) => read_tree(&path)?,
                None => tccloud_provider::DynamicValue::Map(Default::default()),
            };

            let validation = provider.validate_data_source_config(&type_name, &config);
            check(&validation, "validation")?;

            let read = provider.read_data_source(&type_name, &config).await;
            check(&read.diagnostics, "read")?;
            print_document(&read.state.to_json(), format)?;
        }
    }

    Ok(())
}
