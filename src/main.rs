use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use squirrelgraph::agents::advisor::AdvisorAgent;
use squirrelgraph::agents::router::DEFAULT_MAX_ATTEMPTS;
use squirrelgraph::agents::validator::VerdictPolicy;
use squirrelgraph::config::ModelConfig;
use squirrelgraph::models::graph::GraphRun;
use squirrelgraph::models::record::{validity_label, HazardRecord};
use squirrelgraph::workflow::batch::DEFAULT_RUNS;
use squirrelgraph::workflow::{run_batch, BatchConfig};
use squirrelgraph::{missions, toolbox};
use squirrelgraph::{ChatClient, HazardWorkflow, LanguageModel, ToolRegistryTrait};

/// Squirrelgraph - LLM decision workflows for a squirrel guarding its acorns
#[derive(Parser)]
#[command(name = "squirrelgraph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Model name (overrides SQUIRRELGRAPH_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Chat completions base URL (overrides OPENAI_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Sampling temperature (overrides the command's preset)
    #[arg(long, global = true)]
    temperature: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke the get_name tool
    Name {
        /// A characteristic of the squirrel, e.g. "Fluffy"
        characteristic: String,
    },

    /// Ask the strategist to pick one tactic for a hazard
    Strategist {
        #[arg(long, default_value = missions::DEFAULT_STRATEGIST_HAZARD)]
        hazard: String,
    },

    /// Run Operation Acorn Hoard with the three-agent crew
    Mission,

    /// Generate, validate and report on one hazard
    Hazard {
        /// Start from this hazard instead of generating one
        #[arg(long)]
        hazard: Option<String>,

        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,

        /// Fail on validator responses that do not follow the verdict format
        #[arg(long)]
        strict: bool,

        /// Print the final record as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Run several hazard analyses and summarise them
    Batch {
        #[arg(long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Runs in flight at once
        #[arg(long, default_value_t = 1)]
        concurrency: usize,

        #[arg(long)]
        strict: bool,
    },

    /// Ask the wise old squirrel for advice, no tools involved
    Advise {
        #[arg(long, default_value = missions::DEFAULT_ADVISOR_HAZARD)]
        hazard: String,
    },
}

/// Sampling settings each command starts from.
struct Preset {
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl Commands {
    fn preset(&self) -> Preset {
        match self {
            Commands::Strategist { .. } => Preset {
                temperature: Some(0.2),
                max_tokens: Some(300),
            },
            Commands::Advise { .. } => Preset {
                temperature: Some(0.6),
                max_tokens: Some(300),
            },
            Commands::Mission => Preset {
                temperature: Some(0.7),
                max_tokens: None,
            },
            _ => Preset {
                temperature: None,
                max_tokens: None,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Name { characteristic } => {
            let name = toolbox::name_registry()
                .execute_tool(
                    toolbox::GET_NAME,
                    &serde_json::json!({ "characteristic": characteristic }).to_string(),
                )
                .context("get_name failed")?;
            println!("{}", name.as_str().unwrap_or_default());
        }
        Commands::Strategist { hazard } => {
            let model = build_model(&cli)?;
            println!("Hazard: {hazard}\n");
            let run = missions::run_strategist(model, hazard).await?;
            println!("{}", run.final_output().unwrap_or_default());
        }
        Commands::Mission => {
            println!("Launching Operation: Acorn Hoard...\n");
            match run_mission(&cli).await {
                Ok(run) => {
                    println!("{}", banner("OPERATION: ACORN HOARD - FINAL PLAN"));
                    println!("{}", run.final_output().unwrap_or_default());
                }
                Err(e) => println!("Mission Aborted! Error: {e}"),
            }
        }
        Commands::Hazard {
            hazard,
            max_attempts,
            strict,
            json,
        } => {
            let workflow = build_workflow(&cli, *max_attempts, *strict)?;
            let record = hazard.as_deref().map(HazardRecord::with_hazard).unwrap_or_default();
            let run = workflow.run(record).await?;
            if *json {
                println!("{}", run.record.to_json()?);
            } else {
                print_record(&run.record);
            }
        }
        Commands::Batch {
            runs,
            concurrency,
            strict,
        } => {
            let workflow = build_workflow(&cli, DEFAULT_MAX_ATTEMPTS, *strict)?;
            let config = BatchConfig::default()
                .with_runs(*runs)
                .with_concurrency(*concurrency);
            info!(runs = config.runs, concurrency = config.concurrency, "Starting batch");
            let report = run_batch(&workflow, config).await?;

            for (i, analysis) in report.analyses.iter().enumerate() {
                println!("{}", banner(&format!("HAZARD ANALYSIS #{}", i + 1)));
                println!("Hazard: {}", analysis.hazard);
                println!("Solution: {}", analysis.solution);
                println!("Status: {}", validity_label(analysis.is_valid));
                println!("Feedback: {}", analysis.validation_feedback);
                println!("Attempts: {}\n", analysis.attempts);
            }
            println!("{}", banner("COMPREHENSIVE SQUIRREL HAZARD MITIGATION REPORT"));
            println!("{}", report.summary);
        }
        Commands::Advise { hazard } => {
            let advisor = match build_model(&cli) {
                Ok(model) => AdvisorAgent::new(model),
                Err(e) => {
                    warn!(
                        error = %e,
                        "Could not initialise the advisor model, using a placeholder"
                    );
                    AdvisorAgent::without_model()
                }
            };
            println!("Hazard: {hazard}\n");
            let advice = missions::ask_advisor(advisor, hazard).await?;
            println!("Wise Squirrel says:\n{advice}");
        }
    }

    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// Environment first, then the command preset, then command-line flags.
fn model_config(cli: &Cli) -> Result<ModelConfig> {
    let mut config = ModelConfig::from_env().context("failed to load model configuration")?;

    let preset = cli.command.preset();
    if let Some(temperature) = preset.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(max_tokens) = preset.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }

    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(temperature) = cli.temperature {
        config = config.with_temperature(temperature);
    }
    config.validate()?;
    Ok(config)
}

fn build_model(cli: &Cli) -> Result<Arc<dyn LanguageModel>> {
    let client = ChatClient::new(model_config(cli)?)?;
    info!(model = client.name(), "Using chat model");
    Ok(Arc::new(client))
}

async fn run_mission(cli: &Cli) -> Result<GraphRun> {
    Ok(missions::run_acorn_hoard(build_model(cli)?).await?)
}

fn build_workflow(cli: &Cli, max_attempts: u32, strict: bool) -> Result<HazardWorkflow> {
    let policy = if strict {
        VerdictPolicy::Strict
    } else {
        VerdictPolicy::Lenient
    };
    Ok(HazardWorkflow::new(build_model(cli)?)
        .with_max_attempts(max_attempts)
        .with_verdict_policy(policy))
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(50);
    format!("\n{rule}\n{title}\n{rule}")
}

fn print_record(record: &HazardRecord) {
    println!("{}", banner("SQUIRREL HAZARD MITIGATION REPORT"));
    println!("Hazard: {}", record.hazard);
    println!("Solution: {}", record.solution);
    println!("Status: {}", validity_label(record.is_valid));
    println!("Feedback: {}", record.validation_feedback);
    println!("Attempts: {}", record.attempts);
    if let Some(report) = &record.report {
        println!("\n{report}");
    }
}
