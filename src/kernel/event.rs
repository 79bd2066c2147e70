use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Slot carrying the dividend / first factor.
pub const NUMBER_ONE: &str = "NumberOne";
/// Slot carrying the divisor / second factor.
pub const NUMBER_TWO: &str = "NumberTwo";

/// One ranked interpretation of a spoken slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub value: f64,
    pub confidence_score: f64, // 0.0 - 1.0
}

impl SlotCandidate {
    pub fn new(value: f64, confidence_score: f64) -> Self {
        Self { value, confidence_score }
    }

    /// Integer reading of the recognized number. Truncates toward zero.
    pub fn as_operand(&self) -> i64 {
        self.value.trunc() as i64
    }
}

/// Slot name -> candidates, best first.
/// Lookups never fail: an unknown name simply has no candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotMap {
    slots: HashMap<String, Vec<SlotCandidate>>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate behind the ones already recognized for `name`.
    pub fn push(&mut self, name: &str, candidate: SlotCandidate) {
        self.slots.entry(name.to_string()).or_default().push(candidate);
    }

    pub fn get(&self, name: &str) -> &[SlotCandidate] {
        self.slots.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest ranked candidate, the only one the handlers consult.
    pub fn first(&self, name: &str) -> Option<&SlotCandidate> {
        self.get(name).first()
    }

    /// Number of slot names with at least one candidate.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|c| !c.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> FromIterator<(&'a str, SlotCandidate)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, SlotCandidate)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (name, candidate) in iter {
            map.push(name, candidate);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentClassifierResult {
    pub intent_name: String,
    pub confidence_score: f64,
}

/// A recognized intent for one turn of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentMessage {
    pub session_id: String,
    /// Opaque payload handed back from the previous turn (if any).
    pub custom_data: Option<String>,
    pub site_id: String,
    pub input: String,
    pub intent: IntentClassifierResult,
    pub slots: SlotMap,
}

// Builders used by the wire decoder and by tests
impl IntentMessage {
    pub fn new(session_id: &str, intent_name: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            custom_data: None,
            site_id: "default".to_string(),
            input: String::new(),
            intent: IntentClassifierResult {
                intent_name: intent_name.to_string(),
                confidence_score: 1.0,
            },
            slots: SlotMap::new(),
        }
    }

    pub fn with_custom_data(mut self, custom_data: &str) -> Self {
        self.custom_data = Some(custom_data.to_string());
        self
    }

    pub fn with_slot(mut self, name: &str, value: f64, confidence_score: f64) -> Self {
        self.slots.push(name, SlotCandidate::new(value, confidence_score));
        self
    }
}
