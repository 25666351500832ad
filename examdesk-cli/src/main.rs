//! Examdesk CLI - Command-line interface for exam rich content

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "examdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a content document between representations
    Convert {
        /// Input file path
        input: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Input representation (blocks, native, html)
        #[arg(long, default_value = "blocks")]
        from: String,

        /// Output representation (blocks, markup, html, text)
        #[arg(long, default_value = "markup")]
        to: String,
    },

    /// Display information about a stored content document
    Info {
        /// Input file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a stored content document
    Validate {
        /// Input file path
        input: String,

        /// Fail when any block would be dropped or uses the legacy list format
        #[arg(long)]
        strict: bool,
    },

    /// Batch migrate stored documents to nested blocks
    Batch {
        /// Input directory
        input_dir: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Show problems saved in the local store
    Show {
        /// Exam whose problems are listed
        #[arg(long)]
        exam: i64,

        /// Render a single problem instead of listing
        #[arg(long)]
        problem: Option<i64>,

        /// Output format for a single problem (text, html)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Local store root
        #[arg(long, env = "EXAMDESK_DATA_PATH", default_value = "./examdesk_data")]
        data_path: String,
    },

    /// Upload an image into the local store and print its URL
    Upload {
        /// Image file path
        input: String,

        /// Local store root
        #[arg(long, env = "EXAMDESK_DATA_PATH", default_value = "./examdesk_data")]
        data_path: String,

        /// Base URL the store is served under
        #[arg(
            long,
            env = "EXAMDESK_UPLOAD_BASE_URL",
            default_value = "http://localhost:8080"
        )]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "examdesk_cli=debug,examdesk_core=debug"
    } else {
        "examdesk_cli=info,examdesk_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => commands::convert(&input, output.as_deref(), &from, &to),

        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Validate { input, strict } => commands::validate(&input, strict),

        Commands::Batch {
            input_dir,
            output_dir,
            jobs,
        } => commands::batch(&input_dir, &output_dir, jobs),

        Commands::Show {
            exam,
            problem,
            format,
            data_path,
        } => commands::show(&data_path, exam, problem, &format).await,

        Commands::Upload {
            input,
            data_path,
            base_url,
        } => commands::upload(&input, &data_path, &base_url).await,
    }
}
