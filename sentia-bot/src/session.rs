//! Per-chat session state machine
//!
//! Two bot commands (/sentiment, /analysis) prompt for a follow-up text
//! message. The pending expectation is an explicit state per chat rather
//! than a registered callback chain, so a stray command or restart leaves
//! no dangling handler.

use std::collections::HashMap;

/// What the bot expects next from one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No pending prompt; only commands are meaningful
    #[default]
    AwaitingCommand,
    /// The next plain message is the text for /sentiment
    AwaitingSentimentText,
    /// The next plain message is the text for /analysis
    AwaitingAnalysisText,
}

/// In-memory session state keyed by chat id
#[derive(Debug, Default)]
pub struct SessionMap {
    inner: HashMap<i64, SessionState>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the chat's next message is analysis input
    pub fn expect(&mut self, chat_id: i64, state: SessionState) {
        self.inner.insert(chat_id, state);
    }

    /// Consume the chat's pending state, resetting it to AwaitingCommand.
    /// Each prompted text is used exactly once.
    pub fn take(&mut self, chat_id: i64) -> SessionState {
        self.inner.remove(&chat_id).unwrap_or_default()
    }

    /// Drop any pending prompt for the chat (a new command supersedes it)
    pub fn reset(&mut self, chat_id: i64) {
        self.inner.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chat_awaits_command() {
        let mut sessions = SessionMap::new();
        assert_eq!(sessions.take(42), SessionState::AwaitingCommand);
    }

    #[test]
    fn expect_then_take_consumes_the_state() {
        let mut sessions = SessionMap::new();
        sessions.expect(42, SessionState::AwaitingSentimentText);

        assert_eq!(sessions.take(42), SessionState::AwaitingSentimentText);
        // Consumed: the next message is a plain command-less message again
        assert_eq!(sessions.take(42), SessionState::AwaitingCommand);
    }

    #[test]
    fn chats_are_independent() {
        let mut sessions = SessionMap::new();
        sessions.expect(1, SessionState::AwaitingSentimentText);
        sessions.expect(2, SessionState::AwaitingAnalysisText);

        assert_eq!(sessions.take(2), SessionState::AwaitingAnalysisText);
        assert_eq!(sessions.take(1), SessionState::AwaitingSentimentText);
    }

    #[test]
    fn new_command_resets_a_pending_prompt() {
        let mut sessions = SessionMap::new();
        sessions.expect(42, SessionState::AwaitingAnalysisText);
        sessions.reset(42);

        assert_eq!(sessions.take(42), SessionState::AwaitingCommand);
    }
}
