use console::{ style, Term };
use log::{ debug, info, warn };
use std::io::{ self, Write };
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };
use tokio::sync::Notify;
use url::Url;

use crate::controller::ConversationController;
use crate::models::chat::Message;
use crate::ui::{ self, BusyIndicator, TranscriptRenderer };

const EXIT_COMMANDS: [&str; 2] = ["/sair", "/quit"];

/// Drives one operator session: read a line, hand it to the controller,
/// print what changed. Ends on EOF, an exit command or an interrupt.
pub struct Session<W: Write> {
    controller: ConversationController,
    renderer: TranscriptRenderer,
    out: W,
    backend: Url,
    interactive: bool,
    interrupt: Arc<Notify>,
}

impl<W: Write> Session<W> {
    /// `interactive` enables the prompt clean-up and the spinner; turn it off
    /// when stdout is not a terminal.
    pub fn new(controller: ConversationController, out: W, backend: Url, interactive: bool) -> Self {
        Self {
            controller,
            renderer: TranscriptRenderer::new(),
            out,
            backend,
            interactive,
            interrupt: Arc::new(Notify::new()),
        }
    }

    /// Notifying this closes the session. An in-flight request still settles
    /// and is printed first.
    pub fn interrupt_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.interrupt)
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn run<R>(&mut self, input: R) -> io::Result<()> where R: AsyncBufRead + Unpin {
        writeln!(self.out, "{}", ui::header())?;
        self.renderer.render(&mut self.out, self.controller.transcript())?;
        writeln!(self.out, "{}", style(ui::balance_hint(&self.backend)).dim())?;

        let mut lines = input.lines();
        loop {
            if self.interactive {
                write!(self.out, "{}", ui::PROMPT)?;
                self.out.flush()?;
            }

            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = self.interrupt.notified() => {
                    info!("Interrupted, closing session");
                    Ok(None)
                }
            };
            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Skipping input line: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if EXIT_COMMANDS.contains(&line.trim()) {
                break;
            }
            if self.handle_line(&line).await? {
                info!("Interrupted, closing session after the pending request");
                break;
            }
        }

        if self.interactive {
            writeln!(self.out)?;
        }
        debug!("Session closed with {} messages", self.controller.transcript().len());
        Ok(())
    }

    /// Returns whether an interrupt arrived while the request was in flight.
    async fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let interactive = self.interactive;
        let renderer = &mut self.renderer;
        let out = &mut self.out;
        let interrupt = &self.interrupt;
        let mut echoed: io::Result<()> = Ok(());
        let mut interrupted = false;
        let echoed_slot = &mut echoed;
        let interrupted_slot = &mut interrupted;

        let submitted = self.controller
            .submit_with(line, move |user_message, mut exchange| async move {
                *echoed_slot = echo(renderer, out, &user_message, interactive);

                let spinner = interactive.then(|| BusyIndicator::start("processando..."));
                let result = tokio::select! {
                    result = &mut exchange => result,
                    _ = interrupt.notified() => {
                        *interrupted_slot = true;
                        exchange.await
                    }
                };
                if let Some(spinner) = spinner {
                    spinner.finish();
                }
                result
            }).await
            .is_some();

        echoed?;
        if submitted {
            self.renderer.render(&mut self.out, self.controller.transcript())?;
        }
        Ok(interrupted)
    }
}

fn echo<W: Write>(
    renderer: &mut TranscriptRenderer,
    out: &mut W,
    message: &Message,
    interactive: bool
) -> io::Result<()> {
    if interactive {
        // Replace the raw echo of the typed line with the formatted message.
        Term::stdout().clear_last_lines(1)?;
    }
    renderer.render_appended(out, message)
}
