//! Conversation turns and the per-session transcript

use serde::{Deserialize, Serialize};

/// Greeting shown as the first assistant turn of every session
pub const GREETING: &str = "Ask something about your uploaded files!";

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only ordered sequence of turns, scoped to one session.
///
/// Seeded with a single assistant greeting; every accepted question then
/// appends exactly two turns (user, then assistant), so after N questions
/// the transcript holds 1 + 2N turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    /// Create a transcript seeded with the greeting turn
    pub fn new() -> Self {
        Self {
            turns: vec![ConversationTurn::assistant(GREETING)],
        }
    }

    /// Record one accepted question and its answer, in that order
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.turns.push(ConversationTurn::user(question));
        self.turns.push(ConversationTurn::assistant(answer));
    }

    /// All turns in order
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of turns, greeting included
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent assistant turn, i.e. the answer to the latest question
    pub fn latest_answer(&self) -> Option<&ConversationTurn> {
        self.turns.iter().rev().find(|t| t.role == Role::Assistant)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::Assistant);
        assert_eq!(transcript.turns()[0].content, GREETING);
    }

    #[test]
    fn exchange_appends_user_then_assistant() {
        let mut transcript = Transcript::new();
        transcript.record_exchange("What is this?", "A test.");

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1], ConversationTurn::user("What is this?"));
        assert_eq!(transcript.turns()[2], ConversationTurn::assistant("A test."));
    }

    #[test]
    fn n_questions_yield_one_plus_two_n_turns() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.record_exchange(&format!("q{i}"), &format!("a{i}"));
        }

        assert_eq!(transcript.len(), 11);
        // Greeting first, then alternating user/assistant.
        for (i, turn) in transcript.turns().iter().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected);
        }
    }

    #[test]
    fn latest_answer_tracks_newest_exchange() {
        let mut transcript = Transcript::new();
        transcript.record_exchange("first?", "one");
        transcript.record_exchange("second?", "two");

        assert_eq!(transcript.latest_answer().map(|t| t.content.as_str()), Some("two"));
    }
}
