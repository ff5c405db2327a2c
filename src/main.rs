use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser as ClapParser, Subcommand};
use spleen::Precedence;
use spleen::cli::{self, CheckOptions, CheckResult, CliError, PrioritizeCommand, StrategySource};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "spleen")]
#[command(about = "Spleen - A filter language for matching and prioritizing JSON records")]
#[command(version)]
struct Cli {
    /// Log parser and prioritizer decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and match it against JSON input
    Check {
        /// The spleen filter
        filter: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't match
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print a filter in canonical form
    Format {
        /// The spleen filter
        filter: String,

        /// Percent-encode the output for use in a URL
        #[arg(short, long)]
        url_encode: bool,
    },

    /// Reorder a filter's clauses by field priority
    Prioritize {
        /// The spleen filter
        filter: String,

        /// Priority entry, `/target` or `label:/target`, highest first
        #[arg(short = 'P', long = "priority", conflicts_with = "strategy")]
        priorities: Vec<String>,

        /// JSON file holding a priority array or strategy object
        #[arg(short, long)]
        strategy: Option<PathBuf>,

        /// Connective that separates priority groups (and, or). From the
        /// environment it is only a default: a strategy object's own settings
        /// take its place.
        #[arg(long, env = "SPLEEN_PRECEDENCE", value_parser = parse_precedence)]
        precedence: Option<Precedence>,

        /// Report a label only when all of its targets are referenced
        #[arg(long)]
        match_all_labels: bool,

        /// Percent-encode the output for use in a URL
        #[arg(short, long)]
        url_encode: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'spleen docs' to list categories)
        category: String,
    },
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(cli.verbose);

    let precedence_from_env = matches
        .subcommand_matches("prioritize")
        .and_then(|m| m.value_source("precedence"))
        == Some(ValueSource::EnvVariable);

    let result = match cli.command {
        Commands::Check {
            filter,
            input,
            pretty,
            syntax_only,
        } => run_check(filter, input, pretty, syntax_only),
        Commands::Format { filter, url_encode } => {
            cli::execute_format(&filter, url_encode).map(|text| println!("{}", text))
        }
        Commands::Prioritize {
            filter,
            priorities,
            strategy,
            precedence,
            match_all_labels,
            url_encode,
        } => {
            let (precedence, default_precedence) = if precedence_from_env {
                (None, precedence)
            } else {
                (precedence, None)
            };
            strategy_source(priorities, strategy).and_then(|source| {
                let command = PrioritizeCommand {
                    filter,
                    source,
                    precedence,
                    default_precedence,
                    match_all_labels,
                };
                run_prioritize(&command, url_encode)
            })
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// `SPLEEN_LOG` takes priority over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "spleen=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("SPLEEN_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_precedence(s: &str) -> Result<Precedence, String> {
    s.parse().map_err(|e: spleen::StrategyError| e.to_string())
}

fn run_check(
    filter: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        filter,
        input,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid(canonical) => println!("Syntax is valid: {}", canonical),
        CheckResult::Matched(matched) => println!("{}", matched),
        CheckResult::Filtered(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn strategy_source(
    priorities: Vec<String>,
    strategy: Option<PathBuf>,
) -> Result<StrategySource, CliError> {
    Ok(match strategy {
        Some(path) => StrategySource::Json(std::fs::read_to_string(path)?),
        None => StrategySource::Priorities(priorities),
    })
}

fn run_prioritize(command: &PrioritizeCommand, url_encode: bool) -> Result<(), CliError> {
    let prioritized = cli::execute_prioritize(command)?;
    println!("{}", prioritized.filter.to_text(url_encode));
    if !prioritized.labels.is_empty() {
        eprintln!("labels: {}", prioritized.labels.join(", "));
    }
    Ok(())
}
