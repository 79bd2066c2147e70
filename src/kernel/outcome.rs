use super::payload::CarriedPayload;

pub const GIVE_UP: &str = "Ich muss aufgeben. Ich kann dich überhaupt nicht verstehen";
pub const TASK_NOT_UNDERSTOOD: &str = "Ich habe dich nicht verstanden. Wiederhole bitte die Aufgabe";
pub const FIRST_NUMBER_NOT_UNDERSTOOD: &str =
    "Ich habe die erste Zahl nicht verstanden. Wiederhole bitte die erste Zahl";
pub const SECOND_NUMBER_NOT_UNDERSTOOD: &str =
    "Ich habe die zweite Zahl nicht verstanden. Wiederhole bitte die zweite Zahl";
pub const DIVISION_BY_ZERO: &str = "Division durch 0 ist nicht möglich";

/// "Die Antwort ist: {value}"
pub fn answer(value: impl std::fmt::Display) -> String {
    format!("Die Antwort ist: {}", value)
}

/// Exactly one of these is produced per turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// End the session with an answer (or an arithmetic error message).
    Result(String),
    /// End the session, the retry budget is spent.
    GiveUp(String),
    /// Keep the session open and ask again.
    Reprompt {
        text: String,
        intent_filter: Vec<String>,
        payload: CarriedPayload,
        slot_to_fill: Option<String>,
    },
}

impl TurnOutcome {
    pub fn ends_session(&self) -> bool {
        !matches!(self, TurnOutcome::Reprompt { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Result(text) | TurnOutcome::GiveUp(text) => text,
            TurnOutcome::Reprompt { text, .. } => text,
        }
    }

    /// Short label for logs. Never includes user content.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnOutcome::Result(_) => "result",
            TurnOutcome::GiveUp(_) => "give_up",
            TurnOutcome::Reprompt { .. } => "reprompt",
        }
    }
}
