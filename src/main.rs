// local-tts - send selected text to a local TTS server
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use local_tts::cli::{
    check_server, send_to_local_tts, stop_local_tts, CliTextSource, CommandContext, Timeouts,
};
use local_tts::client::ServiceClient;
use local_tts::config::{default_log_path, ConfigSource, FileConfigSource};
use local_tts::reporter::{Reporter, Status, TerminalReporter};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "local-tts")]
#[command(about = "Send text to a locally running TTS server", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// TTS server port (overrides apiPort and LOCAL_TTS_API_PORT)
    #[arg(long, global = true)]
    port: Option<String>,

    /// Config file (default: ~/.local-tts/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output log file (default: logFile, or ~/.local-tts/output.log)
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,

    /// Reachability probe timeout in milliseconds
    #[arg(long = "probe-timeout-ms", global = true, default_value_t = 2000)]
    probe_timeout_ms: u64,

    /// Command request timeout in milliseconds
    #[arg(long = "timeout-ms", global = true, default_value_t = 5000)]
    timeout_ms: u64,
}

#[derive(Parser, Debug)]
enum Command {
    /// Send text to the TTS server (reads stdin when TEXT is omitted)
    #[command(alias = "send")]
    Speak {
        /// Text to speak
        text: Option<String>,
    },
    /// Stop TTS playback
    Stop,
    /// Check whether the TTS server is reachable
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();

    let config = match &args.config {
        Some(path) => FileConfigSource::new(path),
        None => FileConfigSource::from_default_path()?,
    }
    .with_port_override(args.port.clone());

    let reporter = open_reporter(&args, &config);

    let client = match ServiceClient::new() {
        Ok(client) => client,
        Err(e) => {
            reporter.notify(Status::Error, &format!("Failed to create HTTP client: {}", e));
            std::process::exit(1);
        }
    };

    let ctx = CommandContext {
        client: &client,
        config: &config,
        reporter: &reporter,
        timeouts: Timeouts {
            probe: Duration::from_millis(args.probe_timeout_ms),
            request: Duration::from_millis(args.timeout_ms),
        },
    };

    let outcome = match args.command {
        Command::Speak { text } => send_to_local_tts(&ctx, &CliTextSource::new(text)).await,
        Command::Stop => stop_local_tts(&ctx).await,
        Command::Status => check_server(&ctx).await,
    };

    std::process::exit(outcome.exit_code());
}

/// Terminal reporter with the output log, or without it if the log can't be opened
fn open_reporter(args: &Args, config: &FileConfigSource) -> TerminalReporter {
    let log_path = args
        .log_file
        .clone()
        .or_else(|| config.load().ok().and_then(|settings| settings.log_file))
        .or_else(|| default_log_path().ok());

    let Some(path) = log_path else {
        return TerminalReporter::new();
    };

    match TerminalReporter::with_log_file(&path) {
        Ok(reporter) => reporter,
        Err(e) => {
            tracing::warn!(error = %e, "Output log disabled");
            TerminalReporter::new()
        }
    }
}

/// Initialize tracing
fn init_tracing() {
    // Check if debug logging should be enabled
    let show_debug = std::env::var("LOCAL_TTS_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    // Default: ERROR level, can be overridden with RUST_LOG env var
    let default_level = if show_debug { "debug" } else { "error" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
