//! Terminal rendering: header, transcript lines, footer hint and the busy spinner.

use console::style;
use indicatif::{ ProgressBar, ProgressStyle };
use std::io::{ self, Write };
use std::time::Duration;
use url::Url;

use crate::models::chat::{ Message, MessageSender, Transcript };

pub const TITLE: &str = "Cantina PDV";
pub const PROMPT: &str = "› ";
const SAMPLE_PIN: &str = "1234";

pub fn header() -> String {
    format!("{}\n{}", style(TITLE).bold().green(), style("─".repeat(TITLE.chars().count())).dim())
}

pub fn balance_hint(backend: &Url) -> String {
    format!(
        "Para consulta de saldo pelos pais: Acesse {}/saldo?pin={}",
        backend.as_str().trim_end_matches('/'),
        SAMPLE_PIN
    )
}

pub fn format_message(message: &Message) -> String {
    let time = message.timestamp
        .map(|ts| ts.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default();
    let label = match message.sender {
        MessageSender::User => style("Você").cyan().bold(),
        MessageSender::Bot => style("Cantina").green().bold(),
    };
    if time.is_empty() {
        format!("{}: {}", label, message.text)
    } else {
        format!("{} {}: {}", style(time).dim(), label, message.text)
    }
}

/// Prints transcript messages that have not been printed yet.
#[derive(Debug, Default)]
pub struct TranscriptRenderer {
    printed: usize,
}

impl TranscriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_lines(&mut self, transcript: &Transcript) -> Vec<String> {
        let lines = transcript.messages()[self.printed.min(transcript.len())..]
            .iter()
            .map(format_message)
            .collect();
        self.printed = transcript.len();
        lines
    }

    /// Prints a message that was just appended to the transcript.
    pub fn render_appended<W: Write>(&mut self, out: &mut W, message: &Message) -> io::Result<()> {
        writeln!(out, "{}", format_message(message))?;
        self.printed += 1;
        out.flush()
    }

    pub fn render<W: Write>(&mut self, out: &mut W, transcript: &Transcript) -> io::Result<()> {
        for line in self.pending_lines(transcript) {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

/// Spinner shown while a chatbot round-trip is outstanding.
pub struct BusyIndicator {
    bar: ProgressBar,
}

impl BusyIndicator {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
