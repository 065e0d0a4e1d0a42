use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tally_finance::{StatementPipeline, StatementReport};
use tally_ingest::{DocumentError, StatementError};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Card statement parser: PDF in, categorized JSON out"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: ~/.tally/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement PDF and write the report as JSON
    Parse {
        /// Statement PDF, or `-` to read the PDF from stdin
        input: PathBuf,

        /// Output file (default: stdout)
        output: Option<PathBuf>,

        /// Password for encrypted statements
        #[arg(long)]
        password: Option<String>,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,

        /// Never prompt for a password
        #[arg(long)]
        no_prompt: bool,
    },

    /// Show which category each description falls into
    Categorize {
        #[arg(required = true)]
        descriptions: Vec<String>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write defaults and the built-in rules to --config or ~/.tally/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse {
            input,
            output,
            password,
            compact,
            no_prompt,
        } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let pipeline = StatementPipeline::new(&cfg.pipeline);

            let report = if input.as_os_str() == "-" {
                parse_stdin(&pipeline, &cfg, password.as_deref())?
            } else {
                let allow_prompt = !no_prompt && io::stdin().is_terminal();
                parse_file(&pipeline, &input, password, allow_prompt)
                    .with_context(|| format!("parsing {}", input.display()))?
            };

            let pretty = cfg.output.pretty && !compact;
            write_report(&report, output.as_deref(), pretty)?;
        }

        Command::Categorize { descriptions } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let pipeline = StatementPipeline::new(&cfg.pipeline);
            for d in &descriptions {
                match pipeline.rules().find_match(d) {
                    Some(m) => println!(
                        "{}\t{} (rule {}, keyword {:?})",
                        m.category,
                        d,
                        m.rule_index + 1,
                        m.keyword
                    ),
                    None => println!("{}\t{} (no rule matched)", tally_core::Category::Others, d),
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init { force } => {
                config::init_config(cli.config.as_deref(), force)?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Parse a file, asking once for a password if the PDF turns out to be encrypted.
fn parse_file(
    pipeline: &StatementPipeline,
    input: &Path,
    password: Option<String>,
    allow_prompt: bool,
) -> Result<StatementReport> {
    match pipeline.parse_statement(input, password.as_deref()) {
        Err(StatementError::Document(DocumentError::PasswordRequired)) if password.is_none() && allow_prompt => {
            let pw = dialoguer::Password::new()
                .with_prompt("PDF password")
                .interact()
                .context("reading password")?;
            Ok(pipeline.parse_statement(input, Some(&pw))?)
        }
        other => Ok(other?),
    }
}

fn parse_stdin(pipeline: &StatementPipeline, cfg: &Config, password: Option<&str>) -> Result<StatementReport> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("reading PDF from stdin")?;

    let dir = cfg.output.upload_dir();
    let report = pipeline
        .parse_upload(&dir, "stdin.pdf", &bytes, password)
        .context("parsing PDF from stdin")?;
    Ok(report)
}

fn write_report(report: &StatementReport, output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .context("serialize report")?;
    json.push('\n');

    match output {
        Some(p) => {
            fs::write(p, &json).with_context(|| format!("write {}", p.display()))?;
            info!(
                path = %p.display(),
                transactions = report.transactions.len(),
                "wrote report"
            );
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(json.as_bytes()).context("write stdout")?;
        }
    }
    Ok(())
}
