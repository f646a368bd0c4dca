use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use patient_risk::api::ApiError;
use patient_risk::fetch::{sort_by_risk, ScoredBatch};
use patient_risk::output::{AssessmentSummary, ScoredPatient};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Ranked table, highest risk first
    Table,
    /// Tab-separated values in input order
    Tsv,
    /// JSON array of assessments in input order
    Json,
    /// JSON lists of high-risk, fever and data-quality patient ids
    Summary,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch patients from the API and score them
    Fetch {
        /// Page number passed to the API
        #[arg(long)]
        page: Option<u32>,

        /// Page size passed to the API
        #[arg(long)]
        limit: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Score patients from a JSON file (array or API response); reads stdin when omitted or "-"
    Check {
        file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Interactively create a config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "patient-risk")]
#[command(about = "Patient risk scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/patient-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    use anyhow::Context;

    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(_)) => EXIT_AUTH,
        Some(ApiError::RateLimited) => EXIT_RATE_LIMIT,
        _ => EXIT_NETWORK,
    }
}

fn print_batch(batch: &mut ScoredBatch, format: OutputFormat, verbose: bool) {
    for rejected in &batch.rejected {
        eprintln!("Record {}: {}", rejected.index + 1, rejected.error);
    }

    if format == OutputFormat::Summary {
        let summary = AssessmentSummary::from_assessments(batch.assessments());
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        return;
    }

    if format == OutputFormat::Table {
        sort_by_risk(&mut batch.scored);
    }

    let rows: Vec<ScoredPatient> = batch
        .scored
        .iter()
        .map(|(record, assessment)| ScoredPatient { record, assessment })
        .collect();

    match format {
        OutputFormat::Table => {
            let use_colors = patient_risk::output::should_use_colors();
            if verbose && !rows.is_empty() {
                for row in &rows {
                    println!(
                        "{}",
                        patient_risk::output::format_patient_detail(row, use_colors)
                    );
                    println!();
                }
            } else {
                println!(
                    "{}",
                    patient_risk::output::format_assessment_table(&rows, use_colors)
                );
            }
        }
        OutputFormat::Tsv => {
            let output = patient_risk::output::format_tsv(&rows);
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        OutputFormat::Json => match patient_risk::output::format_json(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        OutputFormat::Summary => unreachable!("summary handled above"),
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    patient_risk::logging::init_logging(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = patient_risk::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match patient_risk::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = patient_risk::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Fetch {
            page,
            limit,
            format,
        } => {
            let (api_key, source) = match patient_risk::credentials::resolve_api_key(&config) {
                Ok(found) => found,
                Err(e) => {
                    eprintln!("Credential error: {}", e);
                    std::process::exit(EXIT_AUTH);
                }
            };
            tracing::debug!(%source, "Using API key");

            let timeout = match patient_risk::config::request_timeout(&config.api) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let client = match patient_risk::api::create_client(&api_key, timeout) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to create HTTP client: {:#}", e);
                    std::process::exit(EXIT_NETWORK);
                }
            };

            let mut batch =
                match patient_risk::fetch::fetch_and_score(&client, &config, page, limit).await {
                    Ok(b) => b,
                    Err(e) => {
                        eprintln!("Fetch failed: {:#}", e);
                        std::process::exit(exit_code_for(&e));
                    }
                };

            print_batch(&mut batch, format, cli.verbose);

            if cli.verbose {
                if let Some(ref pagination) = batch.pagination {
                    eprintln!(
                        "Page {} of {}{}",
                        pagination.page.unwrap_or(1),
                        pagination.total_pages.unwrap_or(1),
                        if pagination.has_next.unwrap_or(false) {
                            ", more available with --page"
                        } else {
                            ""
                        }
                    );
                }
            }
        }
        Commands::Check { file, format } => {
            let input = match read_input(file.as_ref()) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let page = match patient_risk::api::decode_records(&input) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Invalid patient data: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let scoring = config.scoring.clone().unwrap_or_default();
            let mut batch = patient_risk::fetch::score_page(page, &scoring);
            print_batch(&mut batch, format, cli.verbose);
        }
        Commands::Init => unreachable!("init handled above"),
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}
