use tracing::debug;

use super::event::{IntentMessage, SlotCandidate, NUMBER_ONE, NUMBER_TWO};
use super::outcome::{
    answer, TurnOutcome, DIVISION_BY_ZERO, FIRST_NUMBER_NOT_UNDERSTOOD, GIVE_UP,
    SECOND_NUMBER_NOT_UNDERSTOOD, TASK_NOT_UNDERSTOOD,
};
use super::payload::CarriedPayload;
use super::DIVISION_INTENT;
use crate::config::SkillConfig;

/// Pure Turn Step: (Intent, Carried Payload, Config) -> Outcome.
///
/// The turn counter is advanced at the VERY START of the step. Every reprompt
/// carries the advanced count, and the count is what the retry budget is
/// checked against.
pub fn handle(message: &IntentMessage, config: &SkillConfig) -> TurnOutcome {
    // 1. Advance the turn
    let carried = CarriedPayload::decode(message.custom_data.as_deref()).next_turn();
    let request_count = carried.request_count;

    // 2. Resolve operands: stashed values win over this turn's slots
    let first = message.slots.first(NUMBER_ONE);
    let second = message.slots.first(NUMBER_TWO);

    let a = carried.a.or(first.map(SlotCandidate::as_operand)).unwrap_or(0);
    let b = carried.b.or(second.map(SlotCandidate::as_operand)).unwrap_or(0);
    let a_confidence_score = carried
        .a_confidence_score
        .or(first.map(|c| c.confidence_score))
        .unwrap_or(0.0);
    let b_confidence_score = carried
        .b_confidence_score
        .or(second.map(|c| c.confidence_score))
        .unwrap_or(0.0);

    debug!(
        session_id = %message.session_id,
        request_count,
        a_confidence_score,
        b_confidence_score,
        "Resolved division operands"
    );

    // 3. Nothing recognized and nothing retained
    if first.is_none() && second.is_none() && carried.is_fresh() {
        let payload = CarriedPayload {
            request_count,
            ..CarriedPayload::default()
        };
        return gate(config, reprompt(TASK_NOT_UNDERSTOOD, payload, None));
    }

    // 4. First operand too uncertain: keep the second one
    if a_confidence_score < config.confidence_score_threshold {
        let payload = CarriedPayload {
            b: Some(b),
            b_confidence_score: Some(b_confidence_score),
            ..carried
        };
        return gate(
            config,
            reprompt(FIRST_NUMBER_NOT_UNDERSTOOD, payload, Some(NUMBER_ONE)),
        );
    }

    // 5. Second operand too uncertain: keep the first one
    if b_confidence_score < config.confidence_score_threshold {
        let payload = CarriedPayload {
            a: Some(a),
            a_confidence_score: Some(a_confidence_score),
            ..carried
        };
        return gate(
            config,
            reprompt(SECOND_NUMBER_NOT_UNDERSTOOD, payload, Some(NUMBER_TWO)),
        );
    }

    // 7. Both accepted
    if b == 0 {
        return TurnOutcome::Result(DIVISION_BY_ZERO.to_string());
    }
    TurnOutcome::Result(answer(render_quotient(quotient(a, b))))
}

/// Real-valued `a / b`.
///
/// Exact to one rounding while both operands fit in 53 bits, which covers
/// every spoken number. Beyond 2^53 each operand is rounded to `f64` before
/// dividing, so the last digit can differ from a correctly rounded integer
/// division.
pub fn quotient(a: i64, b: i64) -> f64 {
    a as f64 / b as f64
}

fn reprompt(text: &str, payload: CarriedPayload, slot_to_fill: Option<&str>) -> TurnOutcome {
    TurnOutcome::Reprompt {
        text: text.to_string(),
        intent_filter: vec![DIVISION_INTENT.to_string()],
        payload,
        slot_to_fill: slot_to_fill.map(str::to_string),
    }
}

/// 6. Retry budget. A reprompt past the ceiling is never sent.
fn gate(config: &SkillConfig, outcome: TurnOutcome) -> TurnOutcome {
    match &outcome {
        TurnOutcome::Reprompt { payload, .. }
            if payload.request_count > config.request_count_threshold =>
        {
            debug!(
                request_count = payload.request_count,
                threshold = config.request_count_threshold,
                "Retry budget exhausted"
            );
            TurnOutcome::GiveUp(GIVE_UP.to_string())
        }
        _ => outcome,
    }
}

/// Text form of a real-valued quotient.
///
/// Integral values keep one fractional digit (`2.0`), very large or very
/// small magnitudes switch to exponent form (`1e+16`, `2.5e-05`), everything
/// else is the shortest decimal that reads back to the same value.
pub fn render_quotient(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        return format!("{:.1}", value);
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    if magnitude >= 1e16 || magnitude < 1e-4 {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        return format!("{:.1}", value);
    }
    format!("{}", value)
}

fn exponent_form(value: f64) -> String {
    let raw = format!("{:e}", value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}
