use calc_skill::config::SkillConfig;
use calc_skill::kernel::division::{self, render_quotient};
use calc_skill::kernel::event::{IntentMessage, NUMBER_ONE, NUMBER_TWO};
use calc_skill::kernel::outcome::{
    TurnOutcome, DIVISION_BY_ZERO, FIRST_NUMBER_NOT_UNDERSTOOD, GIVE_UP,
    SECOND_NUMBER_NOT_UNDERSTOOD, TASK_NOT_UNDERSTOOD,
};
use calc_skill::kernel::payload::CarriedPayload;
use calc_skill::kernel::DIVISION_INTENT;
use calc_skill::session::{self, ContinueSession, EndSession, RecordingSession, SessionAction};

fn intent() -> IntentMessage {
    IntentMessage::new("foo", DIVISION_INTENT).with_custom_data(r#"{"request_count": 0}"#)
}

fn strict_config() -> SkillConfig {
    SkillConfig {
        confidence_score_threshold: 0.9,
        ..SkillConfig::default()
    }
}

/// Runs one turn through the session port, like the driver does.
fn turn(message: &IntentMessage, config: &SkillConfig) -> (TurnOutcome, Vec<SessionAction>) {
    let outcome = division::handle(message, config);
    let mut session = RecordingSession::new();
    session::apply(&outcome, &message.session_id, &mut session);
    (outcome, session.take())
}

fn continued(actions: &[SessionAction]) -> &ContinueSession {
    assert_eq!(actions.len(), 1, "Exactly one publish per turn");
    match &actions[0] {
        SessionAction::ContinueSession(c) => c,
        other => panic!("Expected continueSession, got {:?}", other),
    }
}

fn ended(actions: &[SessionAction]) -> &EndSession {
    assert_eq!(actions.len(), 1, "Exactly one publish per turn");
    match &actions[0] {
        SessionAction::EndSession(e) => e,
        other => panic!("Expected endSession, got {:?}", other),
    }
}

#[test]
fn test_dialogue_is_aborted_when_request_count_is_above_3() {
    let message = intent().with_custom_data(r#"{"request_count": 3}"#);

    let (outcome, actions) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::GiveUp(GIVE_UP.to_string()));
    let end = ended(&actions);
    assert_eq!(end.session_id, "foo");
    assert_eq!(end.text, GIVE_UP);
}

#[test]
fn test_dialogue_is_continued_if_no_slot_was_recognized() {
    let (_, actions) = turn(&intent(), &SkillConfig::default());

    let cont = continued(&actions);
    assert_eq!(cont.session_id, "foo");
    assert_eq!(cont.text, TASK_NOT_UNDERSTOOD);
    assert_eq!(cont.intent_filter, vec![DIVISION_INTENT.to_string()]);
    assert_eq!(cont.custom_data, r#"{"request_count":1}"#);
    assert_eq!(cont.slot, None);
}

#[test]
fn test_missing_custom_data_starts_a_fresh_conversation() {
    let message = IntentMessage::new("foo", DIVISION_INTENT);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    match outcome {
        TurnOutcome::Reprompt { text, payload, .. } => {
            assert_eq!(text, TASK_NOT_UNDERSTOOD);
            assert_eq!(payload, CarriedPayload { request_count: 1, ..Default::default() });
        }
        other => panic!("Expected Reprompt, got {:?}", other),
    }
}

#[test]
fn test_unreadable_custom_data_is_treated_as_empty() {
    let message = intent().with_custom_data("not json at all");

    let (_, actions) = turn(&message, &SkillConfig::default());

    let cont = continued(&actions);
    assert_eq!(cont.text, TASK_NOT_UNDERSTOOD);
    assert_eq!(cont.custom_data, r#"{"request_count":1}"#);
}

#[test]
fn test_single_confident_slot_asks_for_the_missing_second_number() {
    // Only NumberOne recognized: the missing slot reads as confidence 0.0
    let message = intent().with_slot(NUMBER_ONE, 2.0, 0.8);

    let (_, actions) = turn(&message, &SkillConfig::default());

    let cont = continued(&actions);
    assert_eq!(cont.text, SECOND_NUMBER_NOT_UNDERSTOOD);
    assert_eq!(cont.slot.as_deref(), Some(NUMBER_TWO));
    assert_eq!(
        cont.custom_data,
        r#"{"request_count":1,"a":2,"a_confidence_score":0.8}"#
    );
}

#[test]
fn test_first_number_is_requested_again_if_the_confidence_score_is_less_than_the_threshold() {
    let message = intent()
        .with_slot(NUMBER_ONE, 2.0, 0.8)
        .with_slot(NUMBER_TWO, 3.0, 1.0);

    let (_, actions) = turn(&message, &strict_config());

    let cont = continued(&actions);
    assert_eq!(cont.text, FIRST_NUMBER_NOT_UNDERSTOOD);
    assert_eq!(cont.intent_filter, vec![DIVISION_INTENT.to_string()]);
    assert_eq!(cont.slot.as_deref(), Some(NUMBER_ONE));
    assert_eq!(
        cont.custom_data,
        r#"{"request_count":1,"b":3,"b_confidence_score":1.0}"#
    );
}

#[test]
fn test_second_number_is_requested_again_if_the_confidence_score_is_less_than_the_threshold() {
    let message = intent()
        .with_slot(NUMBER_ONE, 2.0, 1.0)
        .with_slot(NUMBER_TWO, 3.0, 0.8);

    let (_, actions) = turn(&message, &strict_config());

    let cont = continued(&actions);
    assert_eq!(cont.text, SECOND_NUMBER_NOT_UNDERSTOOD);
    assert_eq!(cont.slot.as_deref(), Some(NUMBER_TWO));
    assert_eq!(
        cont.custom_data,
        r#"{"request_count":1,"a":2,"a_confidence_score":1.0}"#
    );
}

#[test]
fn test_successful_division() {
    let message = intent()
        .with_slot(NUMBER_ONE, 4.0, 1.0)
        .with_slot(NUMBER_TWO, 2.0, 1.0);

    let (outcome, actions) = turn(&message, &SkillConfig::default());

    assert!(outcome.ends_session());
    assert_eq!(ended(&actions).text, "Die Antwort ist: 2.0");
}

#[test]
fn test_division_by_zero() {
    let message = intent()
        .with_slot(NUMBER_ONE, 4.0, 1.0)
        .with_slot(NUMBER_TWO, 0.0, 1.0);

    let (_, actions) = turn(&message, &SkillConfig::default());

    assert_eq!(ended(&actions).text, DIVISION_BY_ZERO);
}

#[test]
fn test_only_the_top_candidate_is_consulted() {
    let message = intent()
        .with_slot(NUMBER_ONE, 9.0, 1.0)
        .with_slot(NUMBER_ONE, 1.0, 0.1)
        .with_slot(NUMBER_TWO, 3.0, 1.0);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::Result("Die Antwort ist: 3.0".to_string()));
}

#[test]
fn test_stashed_operand_completes_the_task_on_the_next_turn() {
    // Turn 1: second number unclear
    let first_turn = intent()
        .with_slot(NUMBER_ONE, 9.0, 0.95)
        .with_slot(NUMBER_TWO, 4.0, 0.2);
    let (_, actions) = turn(&first_turn, &SkillConfig::default());
    let carried = continued(&actions).custom_data.clone();

    // Turn 2: only the re-elicited slot is recognized
    let second_turn = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(&carried)
        .with_slot(NUMBER_TWO, 4.0, 0.9);
    let (outcome, _) = turn(&second_turn, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::Result("Die Antwort ist: 2.25".to_string()));
}

#[test]
fn test_stashed_operand_wins_over_a_new_recognition() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":1,"b":5,"b_confidence_score":1.0}"#)
        .with_slot(NUMBER_ONE, 10.0, 1.0)
        .with_slot(NUMBER_TWO, 2.0, 1.0);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::Result("Die Antwort ist: 2.0".to_string()));
}

#[test]
fn test_request_count_grows_by_one_per_reprompt() {
    let config = SkillConfig {
        request_count_threshold: 10,
        ..SkillConfig::default()
    };
    let mut custom_data = String::new();

    for expected in 1..=5u32 {
        let message = IntentMessage::new("foo", DIVISION_INTENT)
            .with_custom_data(&custom_data)
            .with_slot(NUMBER_ONE, 1.0, 0.1)
            .with_slot(NUMBER_TWO, 2.0, 1.0);
        let (outcome, actions) = turn(&message, &config);

        match outcome {
            TurnOutcome::Reprompt { payload, .. } => assert_eq!(payload.request_count, expected),
            other => panic!("Expected Reprompt on turn {}, got {:?}", expected, other),
        }
        custom_data = continued(&actions).custom_data.clone();
    }
}

#[test]
fn test_reprompt_past_the_budget_becomes_give_up() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":3,"b":3,"b_confidence_score":1.0}"#)
        .with_slot(NUMBER_ONE, 2.0, 0.1);

    let (outcome, actions) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::GiveUp(GIVE_UP.to_string()));
    assert_eq!(ended(&actions).text, GIVE_UP);
}

#[test]
fn test_zero_ceiling_gives_up_on_the_first_reprompt() {
    let config = SkillConfig {
        request_count_threshold: 0,
        ..SkillConfig::default()
    };

    let (outcome, _) = turn(&intent(), &config);

    assert_eq!(outcome, TurnOutcome::GiveUp(GIVE_UP.to_string()));
}

#[test]
fn test_confident_answer_is_delivered_even_past_the_budget() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":7}"#)
        .with_slot(NUMBER_ONE, 8.0, 1.0)
        .with_slot(NUMBER_TWO, 4.0, 1.0);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::Result("Die Antwort ist: 2.0".to_string()));
}

#[test]
fn test_reprompt_keeps_previously_stashed_keys() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":1,"b":3,"b_confidence_score":0.95}"#)
        .with_slot(NUMBER_ONE, 6.0, 0.3);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    match outcome {
        TurnOutcome::Reprompt { payload, slot_to_fill, .. } => {
            assert_eq!(slot_to_fill.as_deref(), Some(NUMBER_ONE));
            assert_eq!(payload.request_count, 2);
            assert_eq!(payload.b, Some(3));
            assert_eq!(payload.b_confidence_score, Some(0.95));
            assert_eq!(payload.a, None);
        }
        other => panic!("Expected Reprompt, got {:?}", other),
    }
}

#[test]
fn test_quotient_rendering() {
    assert_eq!(render_quotient(2.0), "2.0");
    assert_eq!(render_quotient(-2.0), "-2.0");
    assert_eq!(render_quotient(0.0), "0.0");
    assert_eq!(render_quotient(2.5), "2.5");
    assert_eq!(render_quotient(1.0 / 3.0), "0.3333333333333333");
    assert_eq!(render_quotient(0.0001), "0.0001");
    assert_eq!(render_quotient(0.00005), "5e-05");
    assert_eq!(render_quotient(1e16), "1e+16");
    assert_eq!(render_quotient(123456789.0), "123456789.0");
}

#[test]
fn test_float_request_count_keeps_counting() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count": 2.0}"#)
        .with_slot(NUMBER_ONE, 6.0, 0.2)
        .with_slot(NUMBER_TWO, 3.0, 1.0);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    match outcome {
        TurnOutcome::Reprompt { payload, .. } => assert_eq!(payload.request_count, 3),
        other => panic!("Expected Reprompt, got {:?}", other),
    }
}

#[test]
fn test_float_stashed_operand_still_completes_the_task() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":1,"b":3.0,"b_confidence_score":1.0}"#)
        .with_slot(NUMBER_ONE, 6.0, 1.0);

    let (outcome, _) = turn(&message, &SkillConfig::default());

    assert_eq!(outcome, TurnOutcome::Result("Die Antwort ist: 2.0".to_string()));
}

#[test]
fn test_no_slots_with_stashed_operand_asks_for_the_missing_one() {
    // Nothing recognized this turn, but the second number was kept earlier
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":1,"b":3,"b_confidence_score":1.0}"#);

    let (outcome, actions) = turn(&message, &SkillConfig::default());

    match outcome {
        TurnOutcome::Reprompt { text, payload, slot_to_fill, .. } => {
            assert_eq!(text, FIRST_NUMBER_NOT_UNDERSTOOD);
            assert_eq!(slot_to_fill.as_deref(), Some(NUMBER_ONE));
            assert_eq!(payload.request_count, 2);
            assert_eq!(payload.b, Some(3));
        }
        other => panic!("Expected Reprompt, got {:?}", other),
    }
    assert_ne!(continued(&actions).text, TASK_NOT_UNDERSTOOD);
}

#[test]
fn test_no_slots_with_stashed_first_operand_asks_for_the_second() {
    let message = IntentMessage::new("foo", DIVISION_INTENT)
        .with_custom_data(r#"{"request_count":2,"a":8,"a_confidence_score":0.9}"#);

    let (_, actions) = turn(&message, &SkillConfig::default());

    let cont = continued(&actions);
    assert_eq!(cont.text, SECOND_NUMBER_NOT_UNDERSTOOD);
    assert_eq!(cont.slot.as_deref(), Some(NUMBER_TWO));
    assert_eq!(cont.custom_data, r#"{"request_count":3,"a":8,"a_confidence_score":0.9}"#);
}

#[test]
fn test_quotient_is_exact_within_53_bits() {
    let max_exact = 1i64 << 53;
    assert_eq!(division::quotient(max_exact, 1), 9007199254740992.0);
    assert_eq!(division::quotient(-max_exact, 2), -4503599627370496.0);
    assert_eq!(render_quotient(division::quotient(max_exact, 4)), "2251799813685248.0");
}
