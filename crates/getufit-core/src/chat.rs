//! Conversation transcript and the per-view chat state machine.
//!
//! Each chat view owns one [`ChatFlow`]. The transcript is append-only for
//! the lifetime of the view and is discarded on navigation away; nothing
//! here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fence;
use crate::plan::{format_day_summary, Activity};

/// Fallback bot message appended when the server cannot be reached
pub const CONNECTION_FALLBACK: &str = "Unable to connect to the server.";

/// Fallback bot message appended when a 2xx reply carries no response text
pub const MISSING_REPLY: &str = "Sorry, something went wrong.";

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Chat view request state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Awaiting,
}

impl Default for ChatState {
    fn default() -> Self {
        ChatState::Idle
    }
}

/// Why a send was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// A round-trip is already outstanding; the send is a silent no-op
    AwaitingReply,
    /// Empty or whitespace-only input; the user gets a warning
    EmptyMessage,
}

/// Transcript plus the Idle/Awaiting request state of one chat view.
///
/// Single-flight: while a round-trip is outstanding, further sends are
/// rejected without touching the transcript, so messages always render in
/// strict send/receive order.
#[derive(Debug, Default)]
pub struct ChatFlow {
    messages: Vec<ChatMessage>,
    state: ChatState,
}

impl ChatFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == ChatState::Awaiting
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the user message and transition to Awaiting.
    ///
    /// The caller issues the actual request only when this returns `Ok`.
    pub fn begin_send(&mut self, text: &str) -> Result<(), SendRejection> {
        if self.state == ChatState::Awaiting {
            return Err(SendRejection::AwaitingReply);
        }
        if text.trim().is_empty() {
            return Err(SendRejection::EmptyMessage);
        }
        self.messages.push(ChatMessage::user(text));
        self.state = ChatState::Awaiting;
        Ok(())
    }

    /// Append the bot reply and return to Idle.
    pub fn accept_reply(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::bot(text));
        self.state = ChatState::Idle;
    }

    /// Append the connection fallback message and return to Idle.
    pub fn fail(&mut self) {
        self.messages.push(ChatMessage::bot(CONNECTION_FALLBACK));
        self.state = ChatState::Idle;
    }
}

/// Query sent to the general coach bot: the typed text with a brevity
/// instruction appended.
pub fn coach_query(text: &str) -> String {
    format!("{}. Give in 30 words.", text.trim())
}

/// Render a personal-bot reply.
///
/// Replies opening with a fenced `json` block are parsed as day records and
/// rendered as the deterministic summary; anything that fails to parse
/// falls back to the raw text rather than erroring.
pub fn render_personal_reply(text: &str) -> String {
    if fence::starts_with_json_fence(text) {
        if let Ok(days) = fence::parse_fenced::<Vec<Activity>>(text) {
            return format_day_summary(&days);
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_transcript_order() {
        let mut flow = ChatFlow::new();
        flow.begin_send("How many reps for squats?").unwrap();
        assert!(flow.is_awaiting());

        flow.accept_reply("3 sets of 12");
        assert_eq!(flow.state(), ChatState::Idle);

        let messages = flow.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "How many reps for squats?");
        assert_eq!(messages[1].sender, Sender::Bot);
        assert_eq!(messages[1].text, "3 sets of 12");
    }

    #[test]
    fn test_send_while_awaiting_is_a_no_op() {
        let mut flow = ChatFlow::new();
        flow.begin_send("first").unwrap();
        let before = flow.messages().len();

        assert_eq!(flow.begin_send("second"), Err(SendRejection::AwaitingReply));
        assert_eq!(flow.messages().len(), before);
        assert!(flow.is_awaiting());
    }

    #[test]
    fn test_empty_send_is_rejected_without_state_change() {
        let mut flow = ChatFlow::new();
        assert_eq!(flow.begin_send("   "), Err(SendRejection::EmptyMessage));
        assert!(flow.messages().is_empty());
        assert_eq!(flow.state(), ChatState::Idle);
    }

    #[test]
    fn test_failure_appends_fallback_and_returns_to_idle() {
        let mut flow = ChatFlow::new();
        flow.begin_send("hello").unwrap();
        flow.fail();

        assert_eq!(flow.state(), ChatState::Idle);
        assert_eq!(flow.messages().last().unwrap().text, CONNECTION_FALLBACK);

        // The view is usable again after a failure.
        assert!(flow.begin_send("hello again").is_ok());
    }

    #[test]
    fn test_coach_query_appends_brevity_instruction() {
        assert_eq!(
            coach_query("best warmup?"),
            "best warmup?. Give in 30 words."
        );
    }

    #[test]
    fn test_personal_reply_renders_fenced_day_records() {
        let reply = "```json\n[{\"day\":\"Mon\",\"focus\":\"Legs\",\"exercises\":[{\"name\":\"Squat\",\"sets\":3,\"reps\":12,\"rest\":60}]}]\n```";
        assert_eq!(
            render_personal_reply(reply),
            "**Mon (Legs)**:\n- Squat: 3 sets of 12 reps (Rest: 60 seconds)"
        );
    }

    #[test]
    fn test_personal_reply_falls_back_to_raw_text() {
        assert_eq!(render_personal_reply("Drink more water."), "Drink more water.");

        // Fenced but malformed: raw text, not an error.
        let broken = "```json\n[{\"day\": \"Mon\"]\n```";
        assert_eq!(render_personal_reply(broken), broken);
    }
}
