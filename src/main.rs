use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use compass::analysis::{dynamics, AnalysisOutcome, Pipeline};
use compass::config::{self, CompassConfig};
use compass::ingest::{self, CommunicationType, Document};
use compass::llm::openai::OpenAiClient;
use compass::output::{self, table, OutputFormat};

#[derive(Parser)]
#[command(name = "compass", version, about = "Compass — leadership and culture dashboards from organizational communication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with = "json")]
    yaml: bool,

    /// Path to config file (default: ~/.compass/config.toml)
    #[arg(long, global = true, env = "COMPASS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline and print the CEO dashboard
    Analyze {
        /// Input file (omit with --stdin)
        path: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Communication type: auto, team_meeting, leadership_email, all_hands, slack_channel
        #[arg(long = "type", default_value = "auto")]
        kind: String,

        /// Model identifier (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// API key (overrides OPENAI_API_KEY and config)
        #[arg(long)]
        api_key: Option<String>,

        /// Completion endpoint base URL (overrides config)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Parse communications and show messages and team dynamics, no model calls
    Parse {
        /// Files, directories or glob patterns
        paths: Vec<String>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Communication type: auto, team_meeting, leadership_email, all_hands, slack_channel
        #[arg(long = "type", default_value = "auto")]
        kind: String,
    },

    /// Print the detected communication type
    Detect {
        /// Input file (omit with --stdin)
        path: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented config template
    Init,
    /// Show the effective config with secrets redacted
    Show,
    /// Print the config file path
    Path,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flags(cli.json, cli.yaml);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            path,
            stdin,
            kind,
            model,
            api_key,
            base_url,
        } => {
            let config = CompassConfig::load(config_path)?;
            let kind = ingest::parse_type_arg(Some(&kind))?;
            let doc = read_single(path.as_deref(), stdin)?;

            let key = config::resolve_api_key(api_key.as_deref(), config::API_KEY_ENV, &config.llm)?;
            let base_url = base_url.as_deref().unwrap_or(config.base_url());
            let client = OpenAiClient::new(key, base_url, config.timeout(), config.max_retries())?;
            let pipeline = Pipeline::new(&client, config.analysis_settings(model.as_deref()));

            let outcome = pipeline.run(&doc.content, kind);
            if format.is_structured() {
                output::print_structured(format, &outcome)?;
            } else {
                table::print_outcome(&outcome);
            }

            if let AnalysisOutcome::Failed { error } = outcome {
                bail!("Analysis of {} failed: {error}", doc.name);
            }
        }

        Commands::Parse { paths, stdin, kind } => {
            let kind = ingest::parse_type_arg(Some(&kind))?;
            let docs = if stdin {
                vec![ingest::read_stdin()?]
            } else if paths.is_empty() {
                bail!("No paths provided. Use --stdin to read from stdin.");
            } else {
                ingest::collect_paths(&paths)?
                    .iter()
                    .map(|p| ingest::read_file(p))
                    .collect::<Result<Vec<_>>>()?
            };

            let mut reports = Vec::new();
            for doc in &docs {
                let detected = kind.unwrap_or_else(|| CommunicationType::detect(&doc.content));
                let messages = ingest::parse_messages(&doc.content, detected);
                let team = dynamics::extract_team_dynamics(&messages);

                if format.is_structured() {
                    reports.push(serde_json::json!({
                        "source": doc.name,
                        "communication_type": detected,
                        "messages": messages,
                        "team_metadata": compass::models::metadata_to_value(&team),
                    }));
                } else {
                    table::print_messages(&doc.name, detected, &messages);
                    table::print_team_metadata(&team);
                }
            }

            if format.is_structured() {
                output::print_structured(format, &reports)?;
            }
        }

        Commands::Detect { path, stdin } => {
            let doc = read_single(path.as_deref(), stdin)?;
            let detected = CommunicationType::detect(&doc.content);
            if format.is_structured() {
                output::print_structured(
                    format,
                    &serde_json::json!({ "source": doc.name, "communication_type": detected }),
                )?;
            } else {
                println!("{detected}");
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let path = match config_path {
                    Some(p) => p.to_path_buf(),
                    None => config::config_path()?,
                };
                if config::init_config(Some(&path))? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigAction::Show => {
                let config = CompassConfig::load(config_path)?;
                println!("{}", config.display_redacted());
            }
            ConfigAction::Path => match config_path {
                Some(p) => println!("{}", p.display()),
                None => println!("{}", config::config_path()?.display()),
            },
        },
    }

    Ok(())
}

fn read_single(path: Option<&Path>, stdin: bool) -> Result<Document> {
    let doc = match (path, stdin) {
        (_, true) => ingest::read_stdin(),
        (Some(p), false) => ingest::read_file(p),
        (None, false) => bail!("No input provided. Pass a file path or use --stdin."),
    };
    doc.context("Could not read input")
}
