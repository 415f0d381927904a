use tokio::sync::mpsc;

use parley::interpret::{Interpreter, LexicalInterpreter};
use parley::kernel::engine::{Engine, NO_INPUT_PROMPT};
use parley::kernel::event::{DmEvent, Recognition, SpeechCommand};
use parley::kernel::phase::{Phase, RegionStep};
use parley::kernel::region::{RegionId, RegionSpec, RegionTable};

fn engine(interpreter: Box<dyn Interpreter>) -> Engine {
    let (_event_tx, event_rx) = mpsc::channel(16);
    let (speech_tx, _speech_rx) = mpsc::channel(16);
    Engine::new(event_rx, speech_tx, interpreter).expect("valid engine")
}

fn heard(utterance: &str) -> DmEvent {
    DmEvent::Recognised(Recognition::text(utterance, 0.95))
}

fn spoken(commands: &[SpeechCommand]) -> &str {
    match commands {
        [SpeechCommand::Speak { utterance }] => utterance,
        other => panic!("expected exactly one speak command, got {other:?}"),
    }
}

/// Drive a fresh lexical engine into the Day region's listen state.
fn to_day_ask(engine: &mut Engine) {
    engine.handle(DmEvent::Ready);
    engine.handle(DmEvent::Start);
    engine.handle(DmEvent::SpeakDone); // greeting spoken, listening
    engine.handle(heard("vlad")); // person filled, Day prompted
    engine.handle(DmEvent::SpeakDone); // Day prompt spoken, listening
    assert_eq!(
        engine.phase(),
        Phase::Region {
            id: RegionId::Day,
            step: RegionStep::Ask
        }
    );
}

#[tokio::test]
async fn no_input_clears_recognition_and_keeps_slots() {
    let mut engine = engine(Box::new(LexicalInterpreter));
    to_day_ask(&mut engine);

    let commands = engine.handle(DmEvent::NoInput);
    assert_eq!(engine.phase(), Phase::NoInputReprompt);
    assert_eq!(spoken(&commands), NO_INPUT_PROMPT);
    assert!(engine.context().last_recognition.is_none());
    assert_eq!(
        engine.context().slots.person.as_deref(),
        Some("Vladislav Maraev")
    );
}

#[tokio::test]
async fn no_input_recovery_resumes_same_region() {
    let mut engine = engine(Box::new(LexicalInterpreter));
    to_day_ask(&mut engine);

    engine.handle(DmEvent::NoInput);
    let commands = engine.handle(DmEvent::SpeakDone);
    assert_eq!(
        engine.phase(),
        Phase::Region {
            id: RegionId::Day,
            step: RegionStep::Prompt
        }
    );
    assert_eq!(spoken(&commands), "On which day is your meeting?");
}

#[tokio::test]
async fn repeated_timeouts_reprompt_identically() {
    let mut engine = engine(Box::new(LexicalInterpreter));
    to_day_ask(&mut engine);

    let slots_before = engine.context().slots.clone();
    for _ in 0..3 {
        let reprompt = engine.handle(DmEvent::NoInput);
        assert_eq!(spoken(&reprompt), NO_INPUT_PROMPT);

        engine.handle(DmEvent::SpeakDone); // back to the Day prompt
        engine.handle(DmEvent::SpeakDone); // listening again
        assert_eq!(
            engine.phase(),
            Phase::Region {
                id: RegionId::Day,
                step: RegionStep::Ask
            }
        );
        assert_eq!(engine.context().slots, slots_before);
    }
    assert_eq!(engine.transcript().stats().no_inputs, 3);
}

#[tokio::test]
async fn invalid_input_echoes_utterance_and_resumes() {
    let mut engine = engine(Box::new(LexicalInterpreter));
    to_day_ask(&mut engine);

    let commands = engine.handle(heard("banana"));
    assert_eq!(engine.phase(), Phase::InvalidReprompt);
    assert_eq!(
        spoken(&commands),
        "You just said: banana. And it is not an option."
    );
    // The misheard turn is retained for the echo, not cleared.
    assert!(engine.context().last_recognition.is_some());

    let resumed = engine.handle(DmEvent::SpeakDone);
    assert_eq!(
        engine.phase(),
        Phase::Region {
            id: RegionId::Day,
            step: RegionStep::Prompt
        }
    );
    assert_eq!(spoken(&resumed), "On which day is your meeting?");
    assert_eq!(engine.transcript().stats().rejections, 1);
}

#[tokio::test]
async fn greeting_timeout_falls_back_to_router() {
    let mut engine = engine(Box::new(LexicalInterpreter));
    engine.handle(DmEvent::Ready);
    engine.handle(DmEvent::Start);
    engine.handle(DmEvent::SpeakDone); // greeting spoken, listening

    engine.handle(DmEvent::NoInput);
    assert_eq!(engine.phase(), Phase::NoInputReprompt);

    // No resumption marker exists yet, so the router picks the first
    // unmet slot.
    let commands = engine.handle(DmEvent::SpeakDone);
    assert_eq!(
        engine.phase(),
        Phase::Region {
            id: RegionId::Who,
            step: RegionStep::Prompt
        }
    );
    assert_eq!(spoken(&commands), "Who are you meeting with?");
}

#[test]
fn empty_region_table_fails_validation() {
    assert!(RegionTable::new(Vec::new()).validate().is_err());
}

#[test]
fn duplicate_region_fails_validation() {
    let mut specs: Vec<RegionSpec> = RegionId::ALL.iter().map(|id| RegionSpec { id: *id }).collect();
    specs.push(RegionSpec { id: RegionId::Who });
    assert!(RegionTable::new(specs).validate().is_err());
}

#[test]
fn standard_region_table_is_valid() {
    assert!(RegionTable::standard().validate().is_ok());
}
