//! Line-oriented front end: renders operator state and feeds typed transcripts to the voice path.

use std::{io::Write, sync::Arc, time::Instant};

use async_trait::async_trait;
use client_core::{
    speech::{SpeechEvent, SpeechRecognizer},
    SignalTransport,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::Mutex,
};

use crate::controller::{
    state::{MessageKind, OperatorState},
    OperatorController,
};

pub const HELP: &str = "\
Comandos:
  1..5          activación manual
  r             activación aleatoria
  v             activación por voz (escribe la frase en la línea siguiente)
  url <URL>     guardar la URL de la API del PLC
  estado        mostrar estado actual
  q             salir";

pub fn render(state: &OperatorState, now: Instant) -> String {
    let mut out = String::new();
    if let Some(message) = state.visible_message(now) {
        let tag = match message.kind {
            MessageKind::Info => "INFO",
            MessageKind::Success => "OK",
            MessageKind::Error => "ERROR",
        };
        out.push_str(&format!("[{tag}] {}\n", message.text));
    }
    out.push_str(&format!("Estado: {}\n", state.status));
    if state.settings_open {
        out.push_str("Configura la URL de la API del PLC con: url <URL>\n");
    }
    out
}

/// Treats the next input line as the final transcript of a listening session.
pub struct LineRecognizer<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> LineRecognizer<R> {
    pub fn new(lines: Arc<Mutex<Lines<R>>>) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl<R> SpeechRecognizer for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&self) -> SpeechEvent {
        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => SpeechEvent::Failed("no-speech".to_string()),
            Ok(Some(line)) => SpeechEvent::Recognized(line.trim().to_string()),
            Ok(None) => SpeechEvent::Ended,
            Err(err) => SpeechEvent::Failed(format!("audio-capture: {err}")),
        }
    }
}

enum ConsoleCommand {
    Manual(i64),
    Random,
    Voice,
    SaveUrl(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let command = match head.to_lowercase().as_str() {
        "r" | "random" | "aleatorio" => ConsoleCommand::Random,
        "v" | "voz" | "voice" => ConsoleCommand::Voice,
        "url" if !rest.is_empty() => ConsoleCommand::SaveUrl(rest.to_string()),
        "estado" | "status" => ConsoleCommand::Status,
        "h" | "help" | "ayuda" | "?" => ConsoleCommand::Help,
        "q" | "quit" | "salir" => ConsoleCommand::Quit,
        other => match other.parse::<i64>() {
            Ok(value) => ConsoleCommand::Manual(value),
            Err(_) => ConsoleCommand::Unknown(line.to_string()),
        },
    };
    Some(command)
}

/// Runs the interactive session until `q` or end of input.
pub async fn run_interactive<T, R, W>(
    controller: &mut OperatorController<T>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: SignalTransport,
    R: AsyncBufRead + Unpin + Send,
    W: Write,
{
    let lines = Arc::new(Mutex::new(input.lines()));
    let recognizer = LineRecognizer::new(Arc::clone(&lines));

    writeln!(out, "{HELP}")?;
    write!(out, "{}", render(&controller.state, Instant::now()))?;
    out.flush()?;

    loop {
        let next = lines.lock().await.next_line().await?;
        let Some(line) = next else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            ConsoleCommand::Manual(value) => {
                controller.manual(value).await;
            }
            ConsoleCommand::Random => {
                controller.random().await;
            }
            ConsoleCommand::Voice => {
                writeln!(out, "🎙️ ESCUCHANDO...")?;
                out.flush()?;
                let _ = controller.voice(&recognizer).await;
            }
            ConsoleCommand::SaveUrl(url) => {
                let _ = controller.save_endpoint(&url);
            }
            ConsoleCommand::Status => {}
            ConsoleCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ConsoleCommand::Quit => break,
            ConsoleCommand::Unknown(text) => {
                writeln!(out, "Comando desconocido: {text}")?;
                continue;
            }
        }

        write!(out, "{}", render(&controller.state, Instant::now()))?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
