use serde::Deserialize;
use serde_json::Value;

use crate::error::SkillError;
use crate::kernel::event::{IntentClassifierResult, IntentMessage, SlotCandidate, SlotMap};

const INTENT_TOPIC_PREFIX: &str = "hermes/intent/";
pub const SESSION_STARTED_TOPIC: &str = "hermes/dialogueManager/sessionStarted";
pub const SESSION_QUEUED_TOPIC: &str = "hermes/dialogueManager/sessionQueued";
pub const SESSION_ENDED_TOPIC: &str = "hermes/dialogueManager/sessionEnded";

/// Inbound messages the skill reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum HermesEvent {
    Intent(IntentMessage),
    SessionStarted(SessionNotice),
    SessionQueued(SessionNotice),
    SessionEnded(SessionNotice),
    /// Any topic the skill does not subscribe to.
    Other(String),
}

/// Session lifecycle notification (logged, never answered).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNotice {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub custom_data: Option<String>,
    #[serde(default)]
    pub termination: Option<Termination>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Termination {
    pub reason: String,
}

#[derive(Deserialize)]
struct Envelope {
    topic: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIntentMessage {
    session_id: String,
    #[serde(default)]
    custom_data: Option<String>,
    #[serde(default)]
    site_id: Option<String>,
    #[serde(default)]
    input: Option<String>,
    intent: WireIntent,
    #[serde(default)]
    slots: Vec<WireSlot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireIntent {
    intent_name: String,
    #[serde(default)]
    confidence_score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSlot {
    slot_name: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    confidence_score: Option<f64>,
}

impl WireSlot {
    /// `{"kind": "Number", "value": 4.0}`. Anything unreadable counts as 0.
    fn number(&self) -> f64 {
        let inner = self.value.get("value").unwrap_or(&self.value);
        match inner {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<WireIntentMessage> for IntentMessage {
    fn from(wire: WireIntentMessage) -> Self {
        let slots: SlotMap = wire
            .slots
            .iter()
            .map(|slot| {
                let candidate = SlotCandidate::new(slot.number(), slot.confidence_score.unwrap_or(0.0));
                (slot.slot_name.as_str(), candidate)
            })
            .collect();

        IntentMessage {
            session_id: wire.session_id,
            custom_data: wire.custom_data,
            site_id: wire.site_id.unwrap_or_else(|| "default".to_string()),
            input: wire.input.unwrap_or_default(),
            intent: IntentClassifierResult {
                intent_name: wire.intent.intent_name,
                confidence_score: wire.intent.confidence_score,
            },
            slots,
        }
    }
}

/// Decode one `{"topic": ..., "payload": ...}` line.
pub fn decode(line: &str) -> Result<HermesEvent, SkillError> {
    let envelope: Envelope = serde_json::from_str(line).map_err(SkillError::Wire)?;
    let payload = envelope.payload;

    let event = match envelope.topic.as_str() {
        topic if topic.starts_with(INTENT_TOPIC_PREFIX) => {
            let wire: WireIntentMessage = serde_json::from_value(payload).map_err(SkillError::Wire)?;
            HermesEvent::Intent(wire.into())
        }
        SESSION_STARTED_TOPIC => HermesEvent::SessionStarted(notice(payload)?),
        SESSION_QUEUED_TOPIC => HermesEvent::SessionQueued(notice(payload)?),
        SESSION_ENDED_TOPIC => HermesEvent::SessionEnded(notice(payload)?),
        other => HermesEvent::Other(other.to_string()),
    };
    Ok(event)
}

fn notice(payload: Value) -> Result<SessionNotice, SkillError> {
    serde_json::from_value(payload).map_err(SkillError::Wire)
}
