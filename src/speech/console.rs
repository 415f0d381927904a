use std::io::Write;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SpeechConfig;
use crate::kernel::event::{DmEvent, Recognition, SpeechCommand};
use crate::services::nlu::NluClient;

/// Development stand-in for the speech subsystem. Synthesis prints to
/// stdout, recognition reads one typed line from stdin, and silence is a
/// real timeout. It honors the same command/completion contract as the
/// production collaborator, one completion event per request.
pub struct ConsoleSpeech {
    commands: mpsc::Receiver<SpeechCommand>,
    events: mpsc::Sender<DmEvent>,
    nlu: Option<NluClient>,
    config: SpeechConfig,
    cancel: CancellationToken,
}

impl ConsoleSpeech {
    pub fn new(
        commands: mpsc::Receiver<SpeechCommand>,
        events: mpsc::Sender<DmEvent>,
        nlu: Option<NluClient>,
        config: SpeechConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            commands,
            events,
            nlu,
            config,
            cancel,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let command = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(()),
                command = self.commands.recv() => match command {
                    Some(command) => command,
                    None => return Ok(()),
                },
            };

            match command {
                SpeechCommand::Prepare => self.send(DmEvent::Ready).await?,
                SpeechCommand::Speak { utterance } => {
                    println!("assistant> {utterance}");
                    self.send(DmEvent::SpeakDone).await?;
                }
                SpeechCommand::Listen { nlu } => {
                    print!("you> ");
                    let _ = std::io::stdout().flush();
                    let event = self.listen_once(&mut lines, nlu).await;
                    self.send(event).await?;
                }
            }
        }
    }

    async fn listen_once(&self, lines: &mut Lines<BufReader<Stdin>>, want_nlu: bool) -> DmEvent {
        match timeout(self.config.no_input_timeout, lines.next_line()).await {
            // Timed out: the recognizer heard nothing.
            Err(_) => DmEvent::NoInput,
            Ok(Ok(Some(line))) if !line.trim().is_empty() => {
                let utterance = line.trim();
                let mut recognition = Recognition::text(utterance, 1.0);
                if want_nlu {
                    recognition.interpretation = self.analyze(utterance).await;
                }
                DmEvent::Recognised(recognition)
            }
            // Blank line: treat as silence.
            Ok(Ok(Some(_))) => DmEvent::NoInput,
            Ok(Ok(None)) => {
                info!("stdin closed, hanging up");
                self.cancel.cancel();
                DmEvent::NoInput
            }
            Ok(Err(err)) => {
                warn!(%err, "stdin read failed");
                DmEvent::NoInput
            }
        }
    }

    async fn analyze(&self, utterance: &str) -> Option<crate::interpret::Interpretation> {
        match self.nlu.as_ref() {
            Some(client) => match client.analyze(utterance).await {
                Ok(parse) => Some(parse),
                Err(err) => {
                    // Degrade to a parse-less recognition; the engine
                    // treats it as uninterpretable input and reprompts.
                    warn!(%err, "analysis call failed, continuing without a parse");
                    None
                }
            },
            None => {
                warn!("nlu requested but no client is configured");
                None
            }
        }
    }

    async fn send(&self, event: DmEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| anyhow!("engine event channel closed"))
    }
}
