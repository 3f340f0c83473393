use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use errlens_insight::HistoryStore;
use errlens_protocol::{
    api_schemas, serialize_json, serialize_json_pretty, ErrorInput, DEFAULT_LANGUAGE,
    SUPPORTED_LANGUAGES,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::config::AiConfig;

mod analyzer;
mod config;
mod http_api;
mod server_security;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "errlens")]
#[command(about = "Explain Python error messages with fixes and learning resources", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the analysis API over HTTP
    ServeHttp(ServeArgs),
    /// Analyze a single error message and print the JSON response
    Analyze(AnalyzeArgs),
    /// Print the supported language tags
    Languages,
    /// Print the JSON Schemas of the request and response bodies
    Schema,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8000
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Allow binding to non-loopback addresses
    #[arg(long)]
    public: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Error message, e.g. "NameError: name 'x' is not defined"
    #[arg(long)]
    message: String,

    /// Code surrounding the failing line
    #[arg(long, conflicts_with = "context_file")]
    context: Option<String>,

    /// Read the code context from a file
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Project id for occurrence statistics
    #[arg(long)]
    project: Option<String>,

    /// Language tag of the error
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Stdout carries JSON for everything but the server banner; logs stay on stderr.
    if !cli.verbose && !matches!(cli.command, Commands::ServeHttp(_)) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::ServeHttp(args) => serve_http(args).await?,
        Commands::Analyze(args) => run_analyze(args).await?,
        Commands::Languages => print_stdout(&serialize_json(&SUPPORTED_LANGUAGES)?)?,
        Commands::Schema => print_stdout(&serialize_json_pretty(&api_schemas())?)?,
    }

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let completion = AiConfig::from_env()?.completion_service()?;
    let analyzer = Analyzer::new(completion, Arc::new(HistoryStore::new()));

    let mut input = ErrorInput::new(args.message);
    input.language = args.language;
    input.project_id = args.project;
    input.code_context = match (args.context, &args.context_file) {
        (Some(context), _) => Some(context),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read code context from {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let response = analyzer.analyze(&input).await?;
    let output = if args.pretty {
        serialize_json_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)
}

async fn serve_http(args: ServeArgs) -> Result<()> {
    let addrs = server_security::resolve_guarded_bind_addrs(&args.bind, args.public).await?;
    let completion = AiConfig::from_env()?.completion_service()?;
    let history = Arc::new(HistoryStore::new());
    let analyzer = Arc::new(Analyzer::new(completion, history));
    log::info!("Loaded {} error patterns", analyzer.catalog().len());
    let app = http_api::router(analyzer);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving error analysis API: {base_url}/analyze_error"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    if args.public {
        let addrs = addrs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        print_stdout(&format!(
            "Public bind enabled (--public). Resolved addresses: {addrs}"
        ))?;
    }
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/analyze_error -H 'Content-Type: application/json' -d '{{\"error_message\": \"NameError: name '\\''x'\\'' is not defined\"}}'"
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}
