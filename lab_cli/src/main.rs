//! # Breaksheet CLI Application
//!
//! Terminal host for the concrete test form: prompts for the header and
//! sample rows, shows derived sample ids and break dates, then posts the
//! submission document to a webhook.
//!
//! ```text
//! breaksheet [--webhook-url URL] [--dry-run] [--legacy-ids]
//! breaksheet break-date --cast 2024-01-30 --age 28
//! breaksheet sample-id --client Acme --project Tower --set 1 --sample 2
//! ```

mod prompt;
mod webhook;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lab_core::config::{WebhookConfig, DEFAULT_WEBHOOK_URL, WEBHOOK_URL_ENV};
use lab_core::derived::{projected_break_date_from_text, sample_identifier_with, IdScheme};
use lab_core::errors::LabError;
use lab_core::submission::assemble_now;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "breaksheet")]
#[command(about = "Breaksheet - concrete compressive-strength test form", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    fill: FillArgs,
}

#[derive(Args)]
struct FillArgs {
    /// Webhook that receives the submission
    #[arg(long, env = WEBHOOK_URL_ENV, default_value = DEFAULT_WEBHOOK_URL)]
    webhook_url: String,

    /// Print the submission JSON instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Use the original flattened, lower-case sample numbering (e.g. "at-13")
    #[arg(long)]
    legacy_ids: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the break date for a cast date and age
    BreakDate {
        /// Cast date (YYYY-MM-DD)
        #[arg(long)]
        cast: String,
        /// Age at break, in days
        #[arg(long)]
        age: String,
    },
    /// Generate a sample identifier
    SampleId {
        #[arg(long, default_value = "")]
        client: String,
        #[arg(long, default_value = "")]
        project: String,
        /// Test set number (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        set: u32,
        /// Sample number within the set (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        sample: u32,
        /// Use the original flattened, lower-case numbering
        #[arg(long)]
        legacy: bool,
    },
}

fn id_scheme(legacy: bool) -> IdScheme {
    if legacy {
        IdScheme::Legacy
    } else {
        IdScheme::Standard
    }
}

/// Log level used when `RUST_LOG` is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "warn";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::BreakDate { cast, age }) => {
            let date = projected_break_date_from_text(&cast, &age);
            if date.is_empty() {
                eprintln!("No break date: need a valid cast date and a non-negative age");
                return ExitCode::FAILURE;
            }
            println!("{}", date);
            ExitCode::SUCCESS
        }
        Some(Commands::SampleId {
            client,
            project,
            set,
            sample,
            legacy,
        }) => {
            let id = sample_identifier_with(
                id_scheme(legacy),
                &client,
                &project,
                (set - 1) as usize,
                (sample - 1) as usize,
            );
            println!("{}", id);
            ExitCode::SUCCESS
        }
        None => run_fill(cli.fill).await,
    }
}

async fn run_fill(args: FillArgs) -> ExitCode {
    let config = match WebhookConfig::new(&args.webhook_url) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    println!("Breaksheet - Concrete Compressive Strength Testing");
    println!("==================================================");
    println!();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let session = match prompt::fill_session(&mut input, &mut stdout, id_scheme(args.legacy_ids)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: could not read form input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = prompt::print_summary(&mut stdout, &session) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    let _ = stdout.flush();

    let document = match assemble_now(&session) {
        Ok(d) => d,
        Err(e) => return report_error(&e),
    };

    if args.dry_run {
        return match document.to_json_pretty() {
            Ok(json) => {
                println!();
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => report_error(&e),
        };
    }

    if config.is_placeholder() {
        warn!(url = config.url(), "webhook URL is still the placeholder");
        eprintln!(
            "Warning: posting to the placeholder webhook {}; set --webhook-url or {}",
            config.url(),
            WEBHOOK_URL_ENV
        );
    }

    println!();
    println!("Submitting...");
    let outcome = webhook::post_submission(&config, &document).await;
    println!("{}", outcome.user_message());

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report_error(e: &LabError) -> ExitCode {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}
