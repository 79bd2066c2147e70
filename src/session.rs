//! Dialogue manager port.
//!
//! The kernel decides, the session manager speaks. `apply` is the only place
//! a `TurnOutcome` turns into a publish, and it publishes exactly once.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kernel::outcome::TurnOutcome;

pub const END_SESSION_TOPIC: &str = "hermes/dialogueManager/endSession";
pub const CONTINUE_SESSION_TOPIC: &str = "hermes/dialogueManager/continueSession";

pub trait SessionManager {
    fn publish_end_session(&mut self, session_id: &str, text: &str);

    fn publish_continue_session(
        &mut self,
        session_id: &str,
        text: &str,
        intent_filter: &[String],
        custom_data: &str,
        slot_to_fill: Option<&str>,
    );
}

/// Projection: Outcome -> one publish on the session manager.
pub fn apply<M: SessionManager + ?Sized>(outcome: &TurnOutcome, session_id: &str, manager: &mut M) {
    match outcome {
        TurnOutcome::Result(text) | TurnOutcome::GiveUp(text) => {
            manager.publish_end_session(session_id, text);
        }
        TurnOutcome::Reprompt {
            text,
            intent_filter,
            payload,
            slot_to_fill,
        } => {
            let custom_data = payload.encode().unwrap_or_else(|e| {
                warn!("Dropping carried payload: {}", e);
                String::new()
            });
            manager.publish_continue_session(
                session_id,
                text,
                intent_filter,
                &custom_data,
                slot_to_fill.as_deref(),
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSession {
    pub session_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueSession {
    pub session_id: String,
    pub text: String,
    pub intent_filter: Vec<String>,
    pub custom_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// A publish, in the dialogue manager's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum SessionAction {
    #[serde(rename = "hermes/dialogueManager/endSession")]
    EndSession(EndSession),
    #[serde(rename = "hermes/dialogueManager/continueSession")]
    ContinueSession(ContinueSession),
}

impl SessionAction {
    pub fn topic(&self) -> &'static str {
        match self {
            SessionAction::EndSession(_) => END_SESSION_TOPIC,
            SessionAction::ContinueSession(_) => CONTINUE_SESSION_TOPIC,
        }
    }
}

/// In-memory session manager: keeps every publish until drained.
#[derive(Debug, Default)]
pub struct RecordingSession {
    actions: Vec<SessionAction>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[SessionAction] {
        &self.actions
    }

    /// Drain everything published so far.
    pub fn take(&mut self) -> Vec<SessionAction> {
        std::mem::take(&mut self.actions)
    }
}

impl SessionManager for RecordingSession {
    fn publish_end_session(&mut self, session_id: &str, text: &str) {
        self.actions.push(SessionAction::EndSession(EndSession {
            session_id: session_id.to_string(),
            text: text.to_string(),
        }));
    }

    fn publish_continue_session(
        &mut self,
        session_id: &str,
        text: &str,
        intent_filter: &[String],
        custom_data: &str,
        slot_to_fill: Option<&str>,
    ) {
        self.actions.push(SessionAction::ContinueSession(ContinueSession {
            session_id: session_id.to_string(),
            text: text.to_string(),
            intent_filter: intent_filter.to_vec(),
            custom_data: custom_data.to_string(),
            slot: slot_to_fill.map(str::to_string),
        }));
    }
}
