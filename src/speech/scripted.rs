use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::kernel::event::{DmEvent, Recognition, SpeechCommand};

/// What the scripted subsystem should answer to the next listen request.
#[derive(Debug, Clone)]
pub enum ListenOutcome {
    Heard(Recognition),
    Silence,
}

/// Deterministic stand-in for the speech subsystem: acknowledges prepare
/// and speak immediately and answers each listen from a fixed script.
/// Everything spoken is retained for assertions.
pub struct ScriptedSpeech {
    script: VecDeque<ListenOutcome>,
    pub spoken: Vec<String>,
}

impl ScriptedSpeech {
    pub fn new(script: Vec<ListenOutcome>) -> Self {
        Self {
            script: script.into(),
            spoken: Vec::new(),
        }
    }

    /// Drive one command, returning the completion event the real
    /// subsystem would emit for it.
    pub fn answer(&mut self, command: SpeechCommand) -> DmEvent {
        match command {
            SpeechCommand::Prepare => DmEvent::Ready,
            SpeechCommand::Speak { utterance } => {
                self.spoken.push(utterance);
                DmEvent::SpeakDone
            }
            SpeechCommand::Listen { .. } => match self.script.pop_front() {
                Some(ListenOutcome::Heard(recognition)) => DmEvent::Recognised(recognition),
                Some(ListenOutcome::Silence) | None => DmEvent::NoInput,
            },
        }
    }

    /// Serve the engine over channels until a listen request arrives with
    /// the script exhausted, then hang up. Returns the spoken log.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SpeechCommand>,
        events: mpsc::Sender<DmEvent>,
    ) -> Vec<String> {
        while let Some(command) = commands.recv().await {
            if matches!(command, SpeechCommand::Listen { .. }) && self.script.is_empty() {
                break;
            }
            let event = self.answer(command);
            if events.send(event).await.is_err() {
                break;
            }
        }
        self.spoken
    }
}
