// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use vega_orchestrator::config::{load_and_validate_config, ConfigNode, Mapping, PipelineConfig};
use vega_orchestrator::engine::{PipelineRunner, RunOutcome};
use vega_orchestrator::registry::RegistryContext;

#[derive(Parser)]
#[command(name = "vega")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve and run AutoML pipeline configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a config, validate it and resolve every step's `ref`
    Validate {
        /// Pipeline config (.yaml, .yml, .json or .toml)
        config: PathBuf,
    },

    /// Print the effective configuration
    Show {
        /// Pipeline config (.yaml, .yml, .json or .toml)
        config: PathBuf,

        /// Only this step
        #[arg(short, long)]
        step: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Run every pipeline step in order with the built-in plugins
    Run {
        /// Pipeline config (.yaml, .yml, .json or .toml)
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "vega_orchestrator=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Show {
            config,
            step,
            format,
        } => show(&config, step.as_deref(), format),
        Commands::Run { config } => run(&config),
    }
}

fn load(path: &Path) -> Result<PipelineConfig> {
    load_and_validate_config(path).with_context(|| format!("Invalid config {}", path.display()))
}

fn validate(path: &Path) -> Result<()> {
    let pipeline = load(path)?;
    let steps: Vec<&str> = pipeline.step_names().collect();
    println!("✅ ok: {} ({})", path.display(), steps.join(" -> "));
    Ok(())
}

fn show(path: &Path, step: Option<&str>, format: OutputFormat) -> Result<()> {
    let pipeline = load(path)?;

    let node = match step {
        Some(name) => match pipeline.step(name) {
            Some(step) => step.config.clone(),
            None => bail!("No step named '{}' in {}", name, path.display()),
        },
        None => {
            let mut effective = Mapping::new();
            if let Some(general) = pipeline.root().get("general") {
                effective.insert("general".to_string(), general.clone());
            }
            effective.insert(
                "pipeline".to_string(),
                ConfigNode::Sequence(
                    pipeline
                        .step_names()
                        .map(|n| ConfigNode::String(n.to_string()))
                        .collect(),
                ),
            );
            for step in pipeline.steps() {
                effective.insert(step.name.clone(), step.config.clone());
            }
            ConfigNode::Mapping(effective)
        }
    };

    let rendered = match format {
        OutputFormat::Yaml => node.to_yaml_string()?,
        OutputFormat::Json => node.to_json_string()?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run(path: &Path) -> Result<()> {
    let pipeline = load(path)?;
    let ctx = RegistryContext::global();

    println!("🚀 Running {} on {}", path.display(), pipeline.general().backend);
    let report = PipelineRunner::new(ctx)
        .run(&pipeline)
        .with_context(|| format!("Pipeline {} failed", path.display()))?;

    for step in &report.steps {
        match step.outcome {
            RunOutcome::Completed { epochs } => {
                println!("  {}: completed {} epochs", step.step, epochs)
            }
            RunOutcome::Stopped { epoch } => println!(
                "  {}: stopped early at epoch {} of {}",
                step.step,
                epoch + 1,
                step.budget.epochs
            ),
        }
    }
    println!("🎉 Done in {:?}", report.duration);
    Ok(())
}
