use super::event::{IntentMessage, SlotCandidate, NUMBER_ONE, NUMBER_TWO};
use super::outcome::{answer, TurnOutcome};

/// Single-shot multiplication. No confidence gate, no retries: reads the top
/// candidate of both slots (missing reads as 0) and always ends the session.
pub fn handle(message: &IntentMessage) -> TurnOutcome {
    let a = operand(message, NUMBER_ONE);
    let b = operand(message, NUMBER_TWO);

    // Widened so the product of any two operands fits
    let product = i128::from(a) * i128::from(b);
    TurnOutcome::Result(answer(product))
}

fn operand(message: &IntentMessage, slot: &str) -> i64 {
    message.slots.first(slot).map_or(0, SlotCandidate::as_operand)
}
