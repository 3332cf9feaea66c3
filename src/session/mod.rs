//! Chat session orchestration
//!
//! Everything the client keeps in memory for one page-session worth of
//! conversation: the turn log, the one-shot filter panel, the pending
//! image attachment, and the state machine that assembles outgoing turns,
//! applies replies, and regenerates the last exchange.

pub mod attachment;
pub mod conversation;
pub mod core;
pub mod filters;
pub mod turn;

pub use attachment::{AttachmentOrigin, AttachmentSlot, ClipboardItem, EncodedImage};
pub use conversation::{Conversation, Role, Turn};
pub use core::ChatSession;
pub use filters::{FilterKey, FilterPanel};
pub use turn::PreparedTurn;
