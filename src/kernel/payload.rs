use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SkillError;

/// State carried across turns inside the session's custom data.
///
/// Field order is the wire key order. Operands are only present once they
/// have been accepted on an earlier turn while the other one was not.
///
/// Keys are read one by one: a key of the wrong type is dropped on its own,
/// the rest of the payload survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarriedPayload {
    /// Turns elapsed so far in this conversation.
    #[serde(default, deserialize_with = "lenient::count")]
    pub request_count: u32,
    #[serde(default, deserialize_with = "lenient::operand", skip_serializing_if = "Option::is_none")]
    pub a: Option<i64>,
    #[serde(default, deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub a_confidence_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::operand", skip_serializing_if = "Option::is_none")]
    pub b: Option<i64>,
    #[serde(default, deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub b_confidence_score: Option<f64>,
}

impl CarriedPayload {
    /// Strict decode of the envelope. Empty input is a fresh conversation,
    /// anything that is not a JSON object is an error.
    pub fn try_decode(raw: &str) -> Result<Self, SkillError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(SkillError::Payload)
    }

    /// Lenient decode: absent or unreadable payloads start a fresh conversation.
    pub fn decode(raw: Option<&str>) -> Self {
        match raw.map(Self::try_decode) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                warn!("Discarding unreadable custom data: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn encode(&self) -> Result<String, SkillError> {
        serde_json::to_string(self).map_err(SkillError::Payload)
    }

    /// True when no partial result from a prior turn is retained.
    pub fn is_fresh(&self) -> bool {
        self.a.is_none()
            && self.a_confidence_score.is_none()
            && self.b.is_none()
            && self.b_confidence_score.is_none()
    }

    /// Same payload, one turn later.
    pub fn next_turn(&self) -> Self {
        Self {
            request_count: self.request_count.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Per-key readers. Each takes whatever JSON the key holds and never fails:
/// unreadable values are logged and read as absent.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// Integers, or floats holding a whole number (`2.0`).
    fn whole_number(value: &Value) -> Option<i64> {
        let Value::Number(n) = value else {
            return None;
        };
        n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.2e18)
                .map(|f| f as i64)
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let count = match whole_number(&raw) {
            Some(n) if n < 0 => {
                warn!("Negative request_count {} read as 0", n);
                0
            }
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
            None => {
                warn!("Dropping unreadable request_count: {}", raw);
                0
            }
        };
        Ok(count)
    }

    pub fn operand<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(None);
        }
        let operand = whole_number(&raw);
        if operand.is_none() {
            warn!("Dropping unreadable stashed operand: {}", raw);
        }
        Ok(operand)
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(None);
        }
        let score = raw.as_f64();
        if score.is_none() {
            warn!("Dropping unreadable stashed confidence score: {}", raw);
        }
        Ok(score)
    }
}
