//! Chat session state machine
//!
//! One `ChatSession` owns the conversation log, the filter panel, and the
//! attachment slot for a page session, and enforces the per-exchange rules:
//! one request in flight at a time, optimistic user turns, failures
//! surfaced as assistant error turns, and stale responses (arriving after a
//! reset) discarded by generation token.
//!
//! The API is two-phase — `begin_send`/`begin_regenerate` assemble a
//! `PreparedTurn`, `apply_reply`/`apply_failure` fold the outcome back in —
//! with `send`/`regenerate` conveniences composing both phases around a
//! `ChatBackend` call. Nothing in here is fatal: every failure resolves
//! into a visible turn and the session stays usable.

use crate::api::client::ChatBackend;
use crate::api::types::{ChatRequest, ChatResponse};
use crate::config::{BackendConfig, ChatConfig};
use crate::session::attachment::AttachmentSlot;
use crate::session::conversation::{Conversation, Turn};
use crate::session::filters::FilterPanel;
use crate::session::turn::{synthesized_query, PreparedTurn};

/// Session state for one conversation with the recommendation agent
pub struct ChatSession {
    conversation: Conversation,
    filters: FilterPanel,
    attachment: AttachmentSlot,
    top_k: u32,
    busy: bool,
}

impl ChatSession {
    /// Creates a session seeded with the configured greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use shopchat::config::{BackendConfig, ChatConfig};
    /// use shopchat::session::ChatSession;
    ///
    /// let session = ChatSession::new(&ChatConfig::default(), &BackendConfig::default());
    /// assert_eq!(session.conversation().len(), 1);
    /// assert!(!session.is_busy());
    /// ```
    pub fn new(chat: &ChatConfig, backend: &BackendConfig) -> Self {
        Self {
            conversation: Conversation::new(chat.greeting.clone()),
            filters: FilterPanel::new(),
            attachment: AttachmentSlot::new(),
            top_k: backend.top_k,
            busy: false,
        }
    }

    /// The conversation log
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The live filter panel
    pub fn filters(&self) -> &FilterPanel {
        &self.filters
    }

    /// Mutable access to the filter panel (user edits)
    pub fn filters_mut(&mut self) -> &mut FilterPanel {
        &mut self.filters
    }

    /// The attachment slot
    pub fn attachment(&self) -> &AttachmentSlot {
        &self.attachment
    }

    /// Mutable access to the attachment slot (drop/paste/pick/remove)
    pub fn attachment_mut(&mut self) -> &mut AttachmentSlot {
        &mut self.attachment
    }

    /// True while an exchange is awaiting its reply
    ///
    /// The UI must disable send affordances while this is set; there is no
    /// request cancellation.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Overrides how many products are requested per turn
    pub fn set_top_k(&mut self, top_k: u32) {
        self.top_k = top_k;
    }

    /// Assembles the outgoing request for a user send
    ///
    /// Returns None — and changes nothing — when the session is busy or
    /// there is nothing to send (empty input, no attachment, no active
    /// filter). Otherwise this appends the optimistic user turn, consumes
    /// the filter snapshot and the pending attachment, sets the busy flag,
    /// and returns the prepared request.
    ///
    /// Empty input with active filters produces a synthesized query so the
    /// interaction still reads coherently in the log.
    pub fn begin_send(&mut self, input: &str) -> Option<PreparedTurn> {
        if self.busy {
            tracing::warn!("Send ignored: an exchange is already in flight");
            return None;
        }

        let input = input.trim();
        if input.is_empty() && self.attachment.pending().is_none() && self.filters.is_empty() {
            tracing::debug!("Nothing to send");
            return None;
        }

        let content = if input.is_empty() && !self.filters.is_empty() {
            synthesized_query(self.filters.current())
        } else {
            input.to_string()
        };

        let filters = self.filters.take_snapshot();
        // Single-use per turn: consumed here, never restored on failure
        let image_base64 = self.attachment.take().map(|image| image.base64);

        self.conversation.push(Turn::user(content));
        self.busy = true;

        Some(PreparedTurn {
            request: ChatRequest {
                messages: self.conversation.wire_messages(),
                image_base64,
                top_k: self.top_k,
                filters,
            },
            generation: self.conversation.generation(),
        })
    }

    /// Assembles the request that regenerates the last exchange
    ///
    /// No-op (None) when busy, or when the last turn is not an assistant
    /// turn preceded by at least one user turn. Otherwise the trailing
    /// assistant turn is removed and the request is rebuilt from the
    /// remaining history — with no image (images are not replayed) and with
    /// whatever filters are live right now, not the ones used originally.
    pub fn begin_regenerate(&mut self) -> Option<PreparedTurn> {
        if self.busy {
            tracing::warn!("Regenerate ignored: an exchange is already in flight");
            return None;
        }

        self.conversation.pop_trailing_assistant()?;
        let filters = self.filters.take_snapshot();
        self.busy = true;

        Some(PreparedTurn {
            request: ChatRequest {
                messages: self.conversation.wire_messages(),
                image_base64: None,
                top_k: self.top_k,
                filters,
            },
            generation: self.conversation.generation(),
        })
    }

    /// Applies a successful reply for the exchange built under `generation`
    ///
    /// Returns false and discards the response when the session was reset
    /// since the request was built — applying it would corrupt the new
    /// conversation.
    pub fn apply_reply(&mut self, generation: u64, response: ChatResponse) -> bool {
        if generation != self.conversation.generation() {
            tracing::warn!(
                "Discarding stale reply (generation {} != {})",
                generation,
                self.conversation.generation()
            );
            return false;
        }
        self.busy = false;
        self.conversation.push(Turn::assistant_with_products(
            response.reply,
            response.products,
            response.trace,
        ));
        true
    }

    /// Applies a failed exchange built under `generation`
    ///
    /// The failure becomes an assistant error turn; the optimistic user
    /// turn is deliberately kept. Stale failures are discarded like stale
    /// replies.
    pub fn apply_failure(&mut self, generation: u64, error: &str) -> bool {
        if generation != self.conversation.generation() {
            tracing::warn!(
                "Discarding stale failure (generation {} != {})",
                generation,
                self.conversation.generation()
            );
            return false;
        }
        self.busy = false;
        self.conversation
            .push(Turn::assistant(format!("Request failed: {}", error)));
        true
    }

    /// Sends one turn end to end
    ///
    /// Returns true when a request was dispatched (successfully or not);
    /// false when there was nothing to send. Transport failures are folded
    /// into the log as error turns, never returned.
    pub async fn send(&mut self, backend: &dyn ChatBackend, input: &str) -> bool {
        let Some(prepared) = self.begin_send(input) else {
            return false;
        };
        self.dispatch(backend, prepared).await;
        true
    }

    /// Regenerates the last exchange end to end
    ///
    /// Returns false when the preconditions fail (see `begin_regenerate`).
    pub async fn regenerate(&mut self, backend: &dyn ChatBackend) -> bool {
        let Some(prepared) = self.begin_regenerate() else {
            return false;
        };
        self.dispatch(backend, prepared).await;
        true
    }

    async fn dispatch(&mut self, backend: &dyn ChatBackend, prepared: PreparedTurn) {
        match backend.chat(&prepared.request).await {
            Ok(response) => {
                self.apply_reply(prepared.generation, response);
            }
            Err(error) => {
                tracing::warn!("Chat request failed: {:#}", error);
                self.apply_failure(prepared.generation, &error.to_string());
            }
        }
    }

    /// Clears the conversation back to the greeting
    ///
    /// Bumps the generation so in-flight responses are discarded on
    /// arrival, drops any pending attachment, and clears the busy flag.
    /// The live filter panel survives: its lifecycle is the page session,
    /// not the conversation.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.attachment.remove();
        self.busy = false;
    }
}
