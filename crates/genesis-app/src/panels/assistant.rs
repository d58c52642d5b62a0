use genesis_core::ProviderConfig;
use genesis_suggest::{compose_request, OllamaClient, Purpose, SuggestError};

use crate::{Clipboard, Notice};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Ready(String),
    Failed(String),
}

/// Identifies one generation request. A result is applied only if its ticket
/// is still the newest one handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Purpose picker, context box and the last response.
#[derive(Debug, Default)]
pub struct AssistantPanel {
    purpose: Purpose,
    context: String,
    state: RequestState,
    generation: u64,
    copied: bool,
    client: OllamaClient,
}

impl AssistantPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: OllamaClient) -> Self {
        Self {
            client,
            ..Self::default()
        }
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn set_purpose(&mut self, purpose: Purpose) {
        self.purpose = purpose;
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn set_context(&mut self, context: &str) {
        self.context = context.to_string();
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == RequestState::Loading
    }

    /// True after the current response was copied, until the next request.
    pub fn copied(&self) -> bool {
        self.copied
    }

    /// Start a request. Returns the ticket and the text to send, or a notice
    /// explaining why nothing should be sent.
    pub fn begin(&mut self) -> Result<(Ticket, String), Notice> {
        if self.context.trim().is_empty() {
            return Err(Notice::error("Please enter some context for the AI"));
        }
        if self.is_busy() {
            return Err(Notice::warning("A response is already being generated"));
        }
        self.generation += 1;
        self.state = RequestState::Loading;
        self.copied = false;
        let ticket = Ticket {
            generation: self.generation,
        };
        Ok((ticket, compose_request(self.purpose, &self.context)))
    }

    /// Apply a finished request. Stale tickets are dropped and yield `None`.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        result: Result<String, SuggestError>,
    ) -> Option<Notice> {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale response"
            );
            return None;
        }
        match result {
            Ok(text) => {
                self.state = RequestState::Ready(text);
                None
            }
            Err(e) => {
                tracing::warn!(purpose = %self.purpose, error = %e, "generation failed");
                let message = format!("Failed to get AI response: {e}");
                self.state = RequestState::Failed(message.clone());
                Some(Notice::error(message))
            }
        }
    }

    /// Abandon any in-flight request. Its result will be ignored.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if self.is_busy() {
            self.state = RequestState::Idle;
        }
    }

    /// Run a full request against `config`. Dropping the future before it
    /// completes cancels the request.
    pub async fn generate(&mut self, config: &ProviderConfig) -> Option<Notice> {
        let (ticket, request) = match self.begin() {
            Ok(started) => started,
            Err(notice) => return Some(notice),
        };
        let client = self.client.clone();
        let purpose = self.purpose;
        let pending = Pending {
            panel: self,
            ticket,
            done: false,
        };
        let result = client.respond(config, purpose, &request).await;
        pending.complete(result)
    }

    pub fn copy_response(&mut self, clipboard: &mut dyn Clipboard) -> Notice {
        let RequestState::Ready(text) = &self.state else {
            return Notice::warning("Nothing to copy yet");
        };
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied = true;
                Notice::success("Copied to clipboard")
            }
            Err(e) => Notice::error(format!("Failed to copy: {e}")),
        }
    }
}

/// Cancels its ticket on drop unless the request ran to completion.
struct Pending<'a> {
    panel: &'a mut AssistantPanel,
    ticket: Ticket,
    done: bool,
}

impl Pending<'_> {
    fn complete(mut self, result: Result<String, SuggestError>) -> Option<Notice> {
        self.done = true;
        self.panel.finish(self.ticket, result)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.done && self.ticket.generation == self.panel.generation {
            tracing::debug!(generation = self.ticket.generation, "generation abandoned");
            self.panel.cancel();
        }
    }
}
