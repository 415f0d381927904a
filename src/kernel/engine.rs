use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::context::DialogueContext;
use super::event::{DmEvent, Recognition, SpeechCommand};
use super::phase::{Phase, RegionStep};
use super::region::{RegionId, RegionTable};
use super::router::route;
use super::transcript::{SessionStats, Transcript, TurnEvent};
use crate::interpret::{Interpreter, TopIntent};

pub const GREETING_PROMPT: &str = "Hello!";
pub const NO_INPUT_PROMPT: &str = "I can't hear you!";
pub const CONFIRMED_PROMPT: &str = "Your appointment has been created";

#[derive(Debug, Error)]
pub enum EngineError {
    /// The region table failed validation at construction.
    #[error("invalid region table: {0}")]
    RegionTable(String),
    /// The speech subsystem hung up its command channel.
    #[error("speech command channel closed")]
    SpeechChannelClosed,
}

/// Snapshot published to the surface after every step. Display only; the
/// surface never mutates context.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub session: Uuid,
    pub phase: Phase,
    pub label: String,
    pub context: DialogueContext,
    pub stats: SessionStats,
}

/// The dialogue orchestrator. One instance per session stream, constructed
/// with its collaborators injected: the event receiver, the speech command
/// sender, and the interpretation strategy. No process-global state.
///
/// `handle` is a synchronous step: it runs entry actions and guards to
/// completion before the next event is accepted, so the context is never
/// mutated concurrently.
pub struct Engine {
    pub receiver: mpsc::Receiver<DmEvent>,
    speech_tx: mpsc::Sender<SpeechCommand>,
    interpreter: Box<dyn Interpreter>,
    regions: RegionTable,
    phase: Phase,
    ctx: DialogueContext,
    transcript: Transcript,
    session: Uuid,
    snapshot_tx: watch::Sender<EngineSnapshot>,
}

impl Engine {
    pub fn new(
        receiver: mpsc::Receiver<DmEvent>,
        speech_tx: mpsc::Sender<SpeechCommand>,
        interpreter: Box<dyn Interpreter>,
    ) -> Result<Self, EngineError> {
        let regions = RegionTable::standard();
        regions.validate()?;

        let session = Uuid::new_v4();
        let initial = EngineSnapshot {
            session,
            phase: Phase::Prepare,
            label: Phase::Prepare.label().to_string(),
            context: DialogueContext::default(),
            stats: SessionStats::default(),
        };
        let (snapshot_tx, _) = watch::channel(initial);

        Ok(Self {
            receiver,
            speech_tx,
            interpreter,
            regions,
            phase: Phase::Prepare,
            ctx: DialogueContext::default(),
            transcript: Transcript::new(),
            session,
            snapshot_tx,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> &DialogueContext {
        &self.ctx
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            session: self.session,
            phase: self.phase,
            label: self.phase.label().to_string(),
            context: self.ctx.clone(),
            stats: self.transcript.stats(),
        }
    }

    /// First commands of the process: kick off the readiness handshake.
    pub fn boot(&mut self) -> Vec<SpeechCommand> {
        info!("preparing speech subsystem");
        self.publish();
        vec![SpeechCommand::Prepare]
    }

    /// Synchronous step: one external event in, speech commands out.
    pub fn handle(&mut self, event: DmEvent) -> Vec<SpeechCommand> {
        let commands = self.step(event);
        self.publish();
        commands
    }

    /// Async driver loop. Ends when the event channel closes.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        let boot = self.boot();
        self.dispatch(boot).await?;
        while let Some(event) = self.receiver.recv().await {
            let commands = self.handle(event);
            self.dispatch(commands).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, commands: Vec<SpeechCommand>) -> Result<(), EngineError> {
        for command in commands {
            self.speech_tx
                .send(command)
                .await
                .map_err(|_| EngineError::SpeechChannelClosed)?;
        }
        Ok(())
    }

    fn step(&mut self, event: DmEvent) -> Vec<SpeechCommand> {
        match (self.phase, event) {
            (Phase::Prepare, DmEvent::Ready) => {
                info!("speech subsystem ready");
                self.phase = Phase::Idle;
                Vec::new()
            }

            // Start is only honored between sessions. Mid-dialogue it is
            // dropped; the next greeting entry performs the bulk clear.
            (Phase::Idle | Phase::Done, DmEvent::Start) => self.enter_greeting(),

            (Phase::Greeting(RegionStep::Prompt), DmEvent::SpeakDone) => {
                self.listen(Phase::Greeting(RegionStep::Ask))
            }
            (Phase::Greeting(RegionStep::Ask), DmEvent::Recognised(recognition)) => {
                self.greeting_heard(recognition)
            }
            (Phase::Greeting(RegionStep::Ask), DmEvent::NoInput) => self.silence(),

            (Phase::Region { id, step: RegionStep::Prompt }, DmEvent::SpeakDone) => {
                self.listen(Phase::Region { id, step: RegionStep::Ask })
            }
            (Phase::Region { id, step: RegionStep::Ask }, DmEvent::Recognised(recognition)) => {
                self.region_heard(id, recognition)
            }
            (Phase::Region { step: RegionStep::Ask, .. }, DmEvent::NoInput) => self.silence(),

            // Recovery handlers return through the resumption marker, not
            // to a fixed sibling.
            (Phase::NoInputReprompt | Phase::InvalidReprompt, DmEvent::SpeakDone) => self.resume(),

            (Phase::WhoIs, DmEvent::SpeakDone) => {
                self.phase = Phase::Done;
                Vec::new()
            }
            (Phase::Confirmed, DmEvent::SpeakDone) => {
                self.phase = Phase::Done;
                Vec::new()
            }

            (phase, event) => {
                debug!(?phase, ?event, "event ignored in this phase");
                Vec::new()
            }
        }
    }

    fn enter_greeting(&mut self) -> Vec<SpeechCommand> {
        self.ctx.reset();
        self.transcript.clear();
        self.session = Uuid::new_v4();
        info!(session = %self.session, "session started");
        self.phase = Phase::Greeting(RegionStep::Prompt);
        self.say(GREETING_PROMPT)
    }

    fn greeting_heard(&mut self, recognition: Recognition) -> Vec<SpeechCommand> {
        let frame = self.interpreter.interpret(&recognition);
        self.hear(recognition);
        self.ctx.slots.merge(&frame, None);

        if !self.interpreter.wants_nlu() {
            // Lexical sessions have no intent layer; any recognition
            // advances into the appointment composite.
            return self.advance();
        }
        match frame.intent {
            Some(TopIntent::CreateMeeting) => self.advance(),
            Some(TopIntent::WhoIs) => self.answer_who_is(),
            Some(TopIntent::Unknown) | None => self.reject(),
        }
    }

    fn region_heard(&mut self, id: RegionId, recognition: Recognition) -> Vec<SpeechCommand> {
        let frame = self.interpreter.interpret(&recognition);
        self.hear(recognition);
        self.ctx.slots.merge(&frame, Some(id.target()));

        if id == RegionId::Create {
            return self.confirm_outcome();
        }
        if self.ctx.slots.is_filled(id.target()) {
            self.advance()
        } else {
            self.reject()
        }
    }

    fn confirm_outcome(&mut self) -> Vec<SpeechCommand> {
        match self.ctx.slots.confirmed {
            Some(true) => {
                self.transcript.record(TurnEvent::Booked);
                self.phase = Phase::Confirmed;
                self.say(CONFIRMED_PROMPT)
            }
            Some(false) => {
                // Rejected summary: keep nothing, collect from the top.
                self.ctx.slots.clear();
                self.ctx.last_recognition = None;
                self.transcript.record(TurnEvent::SlotsReset);
                self.advance()
            }
            None => self.reject(),
        }
    }

    fn answer_who_is(&mut self) -> Vec<SpeechCommand> {
        match self.ctx.slots.person.clone() {
            Some(person) => {
                self.phase = Phase::WhoIs;
                self.say(&format!("{person} is a well known famous person."))
            }
            // The intent arrived without a person entity to talk about.
            None => self.reject(),
        }
    }

    /// Reenter the appointment composite through the router.
    fn advance(&mut self) -> Vec<SpeechCommand> {
        let id = route(&self.ctx.slots);
        self.enter_region(id)
    }

    fn enter_region(&mut self, id: RegionId) -> Vec<SpeechCommand> {
        let prompt = match self.regions.spec(id) {
            Some(spec) => spec.prompt(&self.ctx.slots),
            None => {
                // Unreachable after validation. Refuse to act rather than panic.
                warn!(?id, "region missing from table");
                return Vec::new();
            }
        };
        self.ctx.resume = Some(id);
        self.phase = Phase::Region {
            id,
            step: RegionStep::Prompt,
        };
        self.say(&prompt)
    }

    fn resume(&mut self) -> Vec<SpeechCommand> {
        match self.ctx.resume {
            Some(id) => self.enter_region(id),
            // No marker: the composite was never entered. The router
            // recomputes the first unmet slot deterministically.
            None => self.advance(),
        }
    }

    fn silence(&mut self) -> Vec<SpeechCommand> {
        self.ctx.observe_silence();
        self.transcript.record(TurnEvent::NoInput);
        self.phase = Phase::NoInputReprompt;
        self.say(NO_INPUT_PROMPT)
    }

    fn reject(&mut self) -> Vec<SpeechCommand> {
        let heard = self.ctx.best_utterance().to_string();
        self.transcript.record(TurnEvent::Rejected {
            utterance: heard.clone(),
        });
        self.phase = Phase::InvalidReprompt;
        self.say(&format!("You just said: {heard}. And it is not an option."))
    }

    fn hear(&mut self, recognition: Recognition) {
        if let Some(best) = recognition.best() {
            info!(utterance = %best.utterance, confidence = best.confidence, "heard");
            self.transcript.record(TurnEvent::Heard {
                utterance: best.utterance.clone(),
                confidence: best.confidence,
            });
        }
        self.ctx.observe(recognition);
    }

    fn listen(&mut self, next: Phase) -> Vec<SpeechCommand> {
        self.phase = next;
        vec![SpeechCommand::Listen {
            nlu: self.interpreter.wants_nlu(),
        }]
    }

    fn say(&mut self, utterance: &str) -> Vec<SpeechCommand> {
        info!(%utterance, "speak");
        self.transcript.record(TurnEvent::Prompted {
            utterance: utterance.to_string(),
        });
        vec![SpeechCommand::Speak {
            utterance: utterance.to_string(),
        }]
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
