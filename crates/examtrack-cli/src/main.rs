//! examtrack CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "examtrack", version, about = "Exam practice scoring and progress analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group submissions into sittings and report progress
    Analyze {
        /// Submissions JSON file (defaults to the configured data file)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Only analyze one exam type: TYT, AYT, LGS
        #[arg(long)]
        exam_type: Option<String>,

        /// Only analyze one student
        #[arg(long)]
        student: Option<String>,

        /// Earliest exam date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest exam date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Comparison subject, or "all" for every main subject
        #[arg(long)]
        subject: Option<String>,

        /// Restrict the comparison to one sitting name
        #[arg(long)]
        sitting: Option<String>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize a practice question log
    Practice {
        /// Practice log JSON file (defaults to the configured log)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check submissions for data-quality problems
    Validate {
        /// Submissions JSON file (defaults to the configured data file)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Exit code 1 if any warning is found
        #[arg(long)]
        strict: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete one submission by id
    Delete {
        /// Submissions JSON file (defaults to the configured data file)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Submission id to delete
        #[arg(long)]
        id: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample data files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "examtrack=info"
                        .parse()
                        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
                ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            data,
            exam_type,
            student,
            from,
            to,
            subject,
            sitting,
            format,
            output,
            config,
        } => commands::analyze::execute(commands::analyze::AnalyzeOptions {
            data,
            exam_type,
            student,
            from,
            to,
            subject,
            sitting,
            format,
            output,
            config,
        }),
        Commands::Practice {
            log,
            format,
            config,
        } => commands::practice::execute(log, format, config),
        Commands::Validate {
            data,
            strict,
            config,
        } => commands::validate::execute(data, strict, config),
        Commands::Delete { data, id, config } => commands::delete::execute(data, id, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
