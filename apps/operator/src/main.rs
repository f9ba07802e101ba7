use std::{
    io::Write,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    settings::{JsonFileStore, API_URL_KEY},
    speech::ScriptedRecognizer,
    HttpTransport, PlcClient, SettingsStore,
};
use tracing_subscriber::EnvFilter;

mod console;
mod controller;
mod paths;

use console::{render, run_interactive, LineRecognizer};
use controller::OperatorController;

#[derive(Parser, Debug)]
#[command(
    name = "plc-operator",
    about = "Send activation signals (1-5) to a PLC JSON-RPC endpoint"
)]
struct Cli {
    /// Directory holding settings.json.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Endpoint for this session only; not persisted.
    #[arg(long, env = "PLC_API_URL", global = true)]
    endpoint: Option<String>,
    /// Request timeout; the HTTP client default applies when unset.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manual activation.
    Send {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Random activation.
    Random,
    /// Voice activation; reads one line from stdin unless --transcript is given.
    Voice {
        #[arg(long)]
        transcript: Option<String>,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Line-driven session (default).
    Interactive,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    SetUrl { url: String },
    Show,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings_path = paths::settings_path(cli.data_dir.as_deref())?;
    let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::new(&settings_path));
    let transport = match cli.timeout_secs {
        Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))
            .context("failed to build http transport")?,
        None => HttpTransport::new(),
    };
    let mut controller = OperatorController::load(
        PlcClient::with_transport(transport),
        Arc::clone(&store),
        cli.endpoint.as_deref(),
    )
    .with_context(|| format!("failed to load settings from '{}'", settings_path.display()))?;

    let mut stdout = std::io::stdout();
    let succeeded = match cli.command.unwrap_or(Command::Interactive) {
        Command::Send { value } => controller.manual(value).await.is_success(),
        Command::Random => controller.random().await.is_success(),
        Command::Voice { transcript } => {
            let outcome = match transcript {
                Some(text) => controller.voice(&ScriptedRecognizer::transcript(text)).await,
                None => {
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    let lines = Arc::new(tokio::sync::Mutex::new(
                        tokio::io::AsyncBufReadExt::lines(stdin),
                    ));
                    eprintln!("🎙️ ESCUCHANDO... Di un número del 1 al 5.");
                    controller.voice(&LineRecognizer::new(lines)).await
                }
            };
            matches!(outcome, Ok(ref dispatched) if dispatched.is_success())
        }
        Command::Config { action } => match action {
            ConfigAction::SetUrl { url } => controller.save_endpoint(&url).is_ok(),
            ConfigAction::Show => {
                let stored = store.get(API_URL_KEY)?;
                writeln!(stdout, "settings: {}", settings_path.display())?;
                let stored = stored.as_deref().unwrap_or("(sin configurar)");
                writeln!(stdout, "{API_URL_KEY}: {stored}")?;
                if let Some(active) = controller.endpoint() {
                    writeln!(stdout, "endpoint activo: {active}")?;
                }
                return Ok(ExitCode::SUCCESS);
            }
        },
        Command::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_interactive(&mut controller, stdin, &mut stdout).await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    write!(stdout, "{}", render(&controller.state, Instant::now()))?;
    stdout.flush()?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
