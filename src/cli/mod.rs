//! Command-line interface for devforge.
//!
//! Provides commands for executing a flow, dry-running its plan, and
//! showing the resolved configuration.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::core::WorkflowRunner;

/// devforge - YAML-declared multi-agent workflow runner
#[derive(Parser, Debug)]
#[command(name = "devforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a flow against a request document
    Run {
        /// Flow definition (YAML)
        #[arg(long)]
        workflow: PathBuf,

        /// Request document: a JSON file path, or a JSON string
        #[arg(long)]
        request: String,

        /// Agent configuration (defaults to configs/agents.yaml)
        #[arg(long)]
        agents: Option<PathBuf>,

        /// Workspace directory (defaults to ./workspace)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Step ids to skip (repeatable)
        #[arg(long = "skip-optional")]
        skip_optional: Vec<String>,
    },

    /// Validate a flow and list its steps without invoking agents
    Plan {
        /// Flow definition (YAML)
        #[arg(long)]
        workflow: PathBuf,

        /// Agent configuration (defaults to configs/agents.yaml)
        #[arg(long)]
        agents: Option<PathBuf>,

        /// Workspace directory (defaults to ./workspace)
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                workflow,
                request,
                agents,
                workspace,
                skip_optional,
            } => run_flow(workflow, request, agents, workspace, skip_optional).await,
            Commands::Plan {
                workflow,
                agents,
                workspace,
            } => plan_flow(workflow, agents, workspace).await,
            Commands::Config => show_config(),
        }
    }
}

/// Execute a flow end-to-end and print the run summary
async fn run_flow(
    workflow: PathBuf,
    request: String,
    agents: Option<PathBuf>,
    workspace: Option<PathBuf>,
    skip_optional: Vec<String>,
) -> Result<()> {
    let (workspace, agents) = resolve_paths(workspace, agents)?;
    let runner = WorkflowRunner::new(&workspace, &agents, &workflow).await?;

    let skip: HashSet<String> = skip_optional.into_iter().collect();
    let summary = runner.run(&request, &skip).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to render run summary")?
    );
    eprintln!("[journal: {}]", runner.journal().path().display());

    Ok(())
}

/// Dry-run a flow: print the plan, exit non-zero when invalid
async fn plan_flow(
    workflow: PathBuf,
    agents: Option<PathBuf>,
    workspace: Option<PathBuf>,
) -> Result<()> {
    let (workspace, agents) = resolve_paths(workspace, agents)?;
    let runner = WorkflowRunner::new(&workspace, &agents, &workflow).await?;

    let summary = runner.plan().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to render plan summary")?
    );

    if !summary.ok {
        std::process::exit(1);
    }

    Ok(())
}

/// Show the resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("home:       {}", config.home.display());
    println!("workspace:  {}", config.workspace.display());
    println!("agents:     {}", config.agents_config.display());
    match &config.config_file {
        Some(path) => println!("config:     {}", path.display()),
        None => println!("config:     (none found)"),
    }

    Ok(())
}

/// Apply configured defaults for omitted workspace/agents arguments
fn resolve_paths(
    workspace: Option<PathBuf>,
    agents: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    let workspace = match workspace {
        Some(workspace) => workspace,
        None => config::default_workspace()?,
    };
    let agents = match agents {
        Some(agents) => agents,
        None => config::default_agents_config()?,
    };

    Ok((workspace, agents))
}
