//! CLI entry point for cheadergen

use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cheadergen::config::{LoggingConfig, Options};
use cheadergen::host::{FsHost, Generator, WriteOutcome};
use cheadergen::logging::{Layout, LOG_ENV};

#[derive(Parser, Debug)]
#[command(name = "cheadergen")]
#[command(about = "Generate C header files from the functions defined in C sources")]
#[command(version)]
struct Args {
    /// C source files to generate headers for
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Header path to write (only with a single source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print headers to stdout instead of writing them
    #[arg(long)]
    stdout: bool,

    /// Do not wrap the header in an include guard
    #[arg(long = "no-guard")]
    no_guard: bool,

    /// Include prototypes for static functions
    #[arg(long = "static")]
    include_static: bool,

    /// Include prototypes for extern functions
    #[arg(long = "extern")]
    include_extern: bool,

    /// Read the header comment template from a file ({Name} and {Date} are substituted)
    #[arg(long = "comment-file", value_name = "FILE")]
    comment_file: Option<PathBuf>,

    /// Value substituted for {Name} (default: current user)
    #[arg(long)]
    author: Option<String>,

    /// Value substituted for {Date}, as YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<String>,

    /// Settings file layered over the user and project settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_date(value: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn main() {
    if let Err(error) = run() {
        eprintln!("cheadergen error: {error:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.output.is_some() && args.sources.len() > 1 {
        bail!("--output can only be used with a single source file");
    }

    let mut options = Options::load(args.config.as_deref()).context("failed to load settings")?;
    apply_overrides(&mut options, &args)?;
    init_tracing(&options.logging, args.quiet, args.verbose)?;

    let author = args.author.clone().unwrap_or_else(current_user);
    let mut generator = Generator::new(&FsHost, &options, author);
    if let Some(date) = &args.date {
        generator = generator.with_date(date);
    }

    let mut failed = 0;
    for source in &args.sources {
        match generator.generate_file(source, args.output.as_deref()) {
            Ok(report) => {
                if report.outcome == WriteOutcome::Skipped {
                    print!("{}", report.text);
                }
            }
            Err(err) => {
                error!("{err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} source files could not be processed", args.sources.len());
    }
    Ok(())
}

/// Command-line flags win over every settings layer.
fn apply_overrides(options: &mut Options, args: &Args) -> anyhow::Result<()> {
    if args.stdout {
        options.auto_save_files = false;
    }
    if args.no_guard {
        options.generation.emit_include_guard = false;
    }
    if args.include_static {
        options.generation.include_static = true;
    }
    if args.include_extern {
        options.generation.include_extern = true;
    }
    if let Some(path) = &args.comment_file {
        options.generation.header_comment = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read comment template '{}'", path.display()))?;
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        LevelFilter::ERROR
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        logging.level.as_filter()
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(Layout::parse(&logging.layout))
        .try_init()
        .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
