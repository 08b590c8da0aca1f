//! Resource Commands

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tracing::info;

use tccloud_provider::lifecycle::Change;
use tccloud_provider::DynamicValue;

use super::{check, connect, read_state, read_tree, write_state, ProviderArgs};
use crate::output::{print_diagnostics, print_document, print_state, print_success, OutputFormat};

#[derive(Args, Debug)]
pub struct Target {
    /// Resource type, e.g. tencentcloud_pts_project
    #[arg(long = "type")]
    pub type_name: String,

    /// State file (JSON); missing means the resource does not exist yet
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ResourceCommands {
    /// Show what apply would change
    Plan {
        #[command(flatten)]
        target: Target,

        /// Desired configuration (JSON or YAML)
        #[arg(long)]
        config: PathBuf,
    },

    /// Create, update or replace the resource to match the configuration
    Apply {
        #[command(flatten)]
        target: Target,

        /// Desired configuration (JSON or YAML)
        #[arg(long)]
        config: PathBuf,
    },

    /// Refresh the state file from the remote object
    Read {
        #[command(flatten)]
        target: Target,
    },

    /// Delete the remote object recorded in the state file
    Destroy {
        #[command(flatten)]
        target: Target,
    },

    /// Write a state file for an existing object
    Import {
        #[command(flatten)]
        target: Target,

        /// Composite id, parts joined with `#`
        #[arg(long)]
        id: String,
    },
}

pub async fn execute(cmd: ResourceCommands, provider_args: &ProviderArgs, format: OutputFormat) -> Result<()> {
    match cmd {
        ResourceCommands::Plan { target, config } => {
            let provider = connect(provider_args).await?;
            let prior = read_state(&target.state)?;
            let config = read_tree(&config)?;

            let plan = provider.plan_resource_change(&target.type_name, &prior, &config);
            check(&plan.diagnostics, "plan")?;
            let action = match plan.change {
                Change::Create => "create".green(),
                Change::Update if !plan.requires_replace.is_empty() => "replace".red(),
                Change::Update => "update".yellow(),
                Change::Delete => "delete".red(),
                Change::NoOp => "no-op".normal(),
            };
            println!("{} will {}", target.type_name, action);
            for attribute in &plan.requires_replace {
                println!("  {} forces replacement", attribute.cyan());
            }
            print_state(&plan.planned_state.to_json(), format)?;
        }

        ResourceCommands::Apply { target, config } => {
            let provider = connect(provider_args).await?;
            let prior = read_state(&target.state)?;
            let config = read_tree(&config)?;

            let plan = provider.plan_resource_change(&target.type_name, &prior, &config);
            check(&plan.diagnostics, "plan")?;
            info!("Applying {:?} to {}", plan.change, target.type_name);

            let applied = provider
                .apply_resource_change(&target.type_name, &prior, &plan.planned_state)
                .await;
            // state is written even on failure so a partial create is not lost
            write_state(&target.state, &applied.state)?;
            check(&applied.diagnostics, "apply")?;
            print_success(&format!("Applied {}", target.type_name));
            print_state(&applied.state.to_json(), format)?;
        }

        ResourceCommands::Read { target } => {
            let provider = connect(provider_args).await?;
            let current = read_state(&target.state)?;
            if current.is_null() {
                bail!("{} has no state to read", target.state.display());
            }

            let read = provider.read_resource(&target.type_name, &current).await;
            check(&read.diagnostics, "read")?;
            write_state(&target.state, &read.state)?;
            if read.state.is_null() {
                println!("{} no longer exists", target.type_name);
                return Ok(());
            }
            print_state(&read.state.to_json(), format)?;
        }

        ResourceCommands::Destroy { target } => {
            let provider = connect(provider_args).await?;
            let prior = read_state(&target.state)?;
            if prior.is_null() {
                println!("Nothing to destroy");
                return Ok(());
            }

            let applied = provider
                .apply_resource_change(&target.type_name, &prior, &DynamicValue::Null)
                .await;
            write_state(&target.state, &applied.state)?;
            check(&applied.diagnostics, "destroy")?;
            print_success(&format!("Destroyed {}", target.type_name));
        }

        ResourceCommands::Import { target, id } => {
            let provider = connect(provider_args).await?;
            if !read_state(&target.state)?.is_null() {
                bail!("{} already holds a resource", target.state.display());
            }

            let imported = provider.import_resource_state(&target.type_name, &id).await;
            if imported.state.is_null() {
                print_diagnostics(&imported.diagnostics);
                bail!("import of {} failed", id);
            }
            check(&imported.diagnostics, "import")?;
            write_state(&target.state, &imported.state)?;
            print_success(&format!("Imported {} {}", target.type_name, id));
            print_document(&imported.state.to_json(), format)?;
        }
    }

    Ok(())
}
