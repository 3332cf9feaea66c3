//! Conversation log with generation tracking
//!
//! The conversation is an ordered, append-only log of turns, except for
//! regeneration which may remove the single most recent assistant turn.
//! A generation counter identifies the current session; it is bumped on
//! reset so responses from a cleared session can be recognized and
//! discarded instead of corrupting the new one.

use crate::api::types::{Product, WireMessage};
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person typing
    User,
    /// The recommendation agent (or a client-synthesized error message)
    Assistant,
}

impl Role {
    /// Wire name of this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in the conversation log
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Who produced it
    pub role: Role,
    /// Message text
    pub content: String,
    /// Products recommended with this turn (assistant turns only)
    pub products: Vec<Product>,
    /// Opaque diagnostic record from the backend
    pub trace: Option<serde_json::Value>,
}

impl Turn {
    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            products: Vec::new(),
            trace: None,
        }
    }

    /// Creates a plain assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            products: Vec::new(),
            trace: None,
        }
    }

    /// Creates an assistant turn carrying recommendations and a trace
    pub fn assistant_with_products(
        content: impl Into<String>,
        products: Vec<Product>,
        trace: serde_json::Value,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            products,
            trace: if trace.is_null() { None } else { Some(trace) },
        }
    }
}

/// Ordered log of turns for one session
///
/// Invariant: never empty after construction — it is seeded with one
/// assistant greeting turn. Role alternation is not enforced; consecutive
/// same-role turns are legal (an error turn after a failed send is an
/// assistant turn regardless of what preceded it).
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
    greeting: String,
    generation: u64,
}

impl Conversation {
    /// Creates a conversation seeded with an assistant greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use shopchat::session::Conversation;
    ///
    /// let conversation = Conversation::new("Hi! What are you looking for?");
    /// assert_eq!(conversation.len(), 1);
    /// assert_eq!(conversation.generation(), 0);
    /// ```
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            turns: vec![Turn::assistant(greeting.clone())],
            greeting,
            generation: 0,
        }
    }

    /// Current generation token
    ///
    /// Responses prepared under an older generation must be discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn
    pub fn last(&self) -> &Turn {
        // Safe: the log is never empty after construction
        self.turns.last().expect("conversation is seeded")
    }

    /// Number of turns in the log
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the log is seeded at construction
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends a turn to the log
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Wire-format view of the log for an outgoing request
    pub fn wire_messages(&self) -> Vec<WireMessage> {
        self.turns
            .iter()
            .map(|turn| WireMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            })
            .collect()
    }

    /// Removes the trailing assistant turn for regeneration
    ///
    /// Only removes when the last turn is an assistant turn preceded by at
    /// least one user turn; the seeded greeting alone is never removed.
    /// Returns the removed turn, or None when the preconditions fail.
    pub fn pop_trailing_assistant(&mut self) -> Option<Turn> {
        let last = self.turns.last()?;
        if last.role != Role::Assistant {
            return None;
        }
        let has_prior_user = self.turns[..self.turns.len() - 1]
            .iter()
            .any(|turn| turn.role == Role::User);
        if !has_prior_user {
            return None;
        }
        self.turns.pop()
    }

    /// Clears the log back to the greeting and bumps the generation
    ///
    /// Any response still in flight was prepared under the old generation
    /// and will be discarded when it arrives.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.turns.push(Turn::assistant(self.greeting.clone()));
        self.generation += 1;
        tracing::debug!("Conversation reset, generation now {}", self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_seeded() {
        let conversation = Conversation::new("hello");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.last().role, Role::Assistant);
        assert_eq!(conversation.last().content, "hello");
        assert!(!conversation.is_empty());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("first"));
        conversation.push(Turn::assistant("second"));
        let roles: Vec<Role> = conversation.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_consecutive_same_role_turns_are_legal() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("send this"));
        conversation.push(Turn::assistant("reply"));
        conversation.push(Turn::assistant("Request failed: timeout"));
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn test_wire_messages_roles() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("hi"));
        let wire = conversation.wire_messages();
        assert_eq!(wire[0].role, "assistant");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[1].content, "hi");
    }

    #[test]
    fn test_pop_trailing_assistant_requires_prior_user_turn() {
        // Greeting only: nothing to regenerate
        let mut conversation = Conversation::new("hello");
        assert!(conversation.pop_trailing_assistant().is_none());
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_pop_trailing_assistant_noop_when_last_is_user() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("hi"));
        assert!(conversation.pop_trailing_assistant().is_none());
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_pop_trailing_assistant_removes_exactly_one() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("hi"));
        conversation.push(Turn::assistant("reply"));
        let removed = conversation.pop_trailing_assistant().unwrap();
        assert_eq!(removed.content, "reply");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.last().role, Role::User);
    }

    #[test]
    fn test_reset_bumps_generation_and_reseeds() {
        let mut conversation = Conversation::new("hello");
        conversation.push(Turn::user("hi"));
        assert_eq!(conversation.generation(), 0);

        conversation.reset();
        assert_eq!(conversation.generation(), 1);
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.last().content, "hello");
    }

    #[test]
    fn test_assistant_with_products_drops_null_trace() {
        let turn = Turn::assistant_with_products("reply", Vec::new(), serde_json::Value::Null);
        assert!(turn.trace.is_none());

        let turn = Turn::assistant_with_products(
            "reply",
            Vec::new(),
            serde_json::json!({"intent": "TEXT_RECOMMEND"}),
        );
        assert!(turn.trace.is_some());
    }
}
