use crate::audio::AudioCue;
use crate::chatbot::{ ChatbotClient, ChatbotError };
use crate::models::chat::{ Message, MessageId, Transcript };
use crate::models::chatbot::ChatbotResponse;

use log::{ debug, error, info };
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const GREETING: &str = "Olá! Como posso ajudar na cantina hoje?";
pub const APOLOGY: &str =
    "Desculpe, houve um erro ao processar sua solicitação. Tente novamente mais tarde.";

/// The chatbot round-trip of one submission, not yet awaited.
pub type Exchange = Pin<Box<dyn Future<Output = Result<ChatbotResponse, ChatbotError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

/// A submission whose user message is already in the transcript and whose
/// chatbot round-trip has not settled yet.
#[derive(Debug)]
#[must_use = "a pending submit keeps the controller busy until it is settled"]
pub struct PendingSubmit {
    user_message: MessageId,
    text: String,
}

impl PendingSubmit {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user_message(&self) -> MessageId {
        self.user_message
    }
}

pub struct ConversationController {
    client: Arc<dyn ChatbotClient>,
    audio: Arc<dyn AudioCue>,
    transcript: Transcript,
    outstanding: usize,
}

impl ConversationController {
    /// Starts a session with the greeting as the only message.
    pub fn new(client: Arc<dyn ChatbotClient>, audio: Arc<dyn AudioCue>) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Message::bot(GREETING));
        info!("Conversation started against {}", client.endpoint());

        Self {
            client,
            audio,
            transcript,
            outstanding: 0,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ConversationState {
        if self.outstanding > 0 {
            ConversationState::AwaitingResponse
        } else {
            ConversationState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state() == ConversationState::AwaitingResponse
    }

    /// Records the user's message and marks the controller busy. Blank input
    /// is ignored and leaves everything untouched.
    pub fn begin(&mut self, text: &str) -> Option<PendingSubmit> {
        if text.trim().is_empty() {
            return None;
        }

        let user_message = self.transcript.push(Message::user(text)).id;
        self.outstanding += 1;
        debug!("Submit {} started, {} outstanding", user_message, self.outstanding);

        Some(PendingSubmit {
            user_message,
            text: text.to_string(),
        })
    }

    /// Appends the bot's reply (or the apology) and leaves the busy state.
    /// The reply is in the transcript before the cue fires.
    pub fn settle(
        &mut self,
        pending: PendingSubmit,
        result: Result<ChatbotResponse, ChatbotError>
    ) -> &Message {
        self.outstanding = self.outstanding.saturating_sub(1);

        let (reply, transaction) = match result {
            Ok(response) => {
                let transaction = response.has_transaction();
                (Message::bot(response.response), transaction)
            }
            Err(e) => {
                error!("Error sending message {}: {}", pending.user_message, e);
                (Message::bot(APOLOGY), false)
            }
        };
        debug!("Submit {} settled, {} outstanding", pending.user_message, self.outstanding);

        self.transcript.push(reply);
        if transaction {
            self.play_cue();
        }
        &self.transcript.messages()[self.transcript.len() - 1]
    }

    /// Sends `text` to the chatbot and records both sides of the exchange.
    /// Returns the bot's reply, or `None` when the input was blank.
    pub async fn submit(&mut self, text: &str) -> Option<&Message> {
        self.submit_with(text, |_, exchange| exchange).await
    }

    /// `submit` with a hook around the round-trip. `around` gets the recorded
    /// user message and the pending exchange, and must drive the exchange to
    /// completion; whatever it returns is settled.
    pub async fn submit_with<F, Fut>(&mut self, text: &str, around: F) -> Option<&Message>
        where
            F: FnOnce(Message, Exchange) -> Fut,
            Fut: Future<Output = Result<ChatbotResponse, ChatbotError>>
    {
        let pending = self.begin(text)?;
        let user_message = self.transcript.last().cloned()?;

        let client = Arc::clone(&self.client);
        let outgoing = pending.text().to_string();
        let exchange: Exchange = Box::pin(async move { client.send_message(&outgoing).await });

        let result = around(user_message, exchange).await;
        Some(self.settle(pending, result))
    }

    fn play_cue(&self) {
        if let Err(e) = self.audio.play() {
            error!("Error playing sound: {}", e);
        }
    }
}
