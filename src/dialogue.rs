//! Per-chat dialogue state kept in teloxide's in-memory storage.

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::session::FridgeSession;

/// Free-text input the chat is currently waiting for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingInput {
    #[default]
    None,
    /// Expiry date for the ingredient at `index`
    ExpiryDate { index: usize },
    Allergies,
}

/// Everything remembered about one chat between updates
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub session: FridgeSession,
    pub pending_input: PendingInput,
}

impl ChatState {
    /// Whether a text message should be read as input rather than ignored
    pub fn is_waiting_for_input(&self) -> bool {
        self.pending_input != PendingInput::None
    }

    /// Take the pending input, leaving `None` behind
    pub fn take_pending_input(&mut self) -> PendingInput {
        std::mem::take(&mut self.pending_input)
    }
}

/// Type alias for our chat dialogue
pub type FridgeDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;
