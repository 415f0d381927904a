use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use parley::config::{NluConfig, SpeechConfig, Strategy};
use parley::interpret::{Interpreter, LexicalInterpreter, NluInterpreter};
use parley::kernel::engine::Engine;
use parley::kernel::event::DmEvent;
use parley::kernel::phase::Phase;
use parley::services::nlu::NluClient;
use parley::speech::ConsoleSpeech;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let strategy = if std::env::args().any(|arg| arg == "--nlu") {
        Strategy::Nlu
    } else {
        Strategy::Lexical
    };
    info!(?strategy, "parley booting");

    let (event_tx, event_rx) = mpsc::channel(64);
    let (speech_tx, speech_rx) = mpsc::channel(64);
    let cancel = CancellationToken::new();

    let interpreter: Box<dyn Interpreter> = match strategy {
        Strategy::Lexical => Box::new(LexicalInterpreter),
        Strategy::Nlu => Box::new(NluInterpreter),
    };
    let nlu = match strategy {
        Strategy::Nlu => Some(NluClient::new(NluConfig::from_env()?)),
        Strategy::Lexical => None,
    };

    let mut engine = Engine::new(event_rx, speech_tx, interpreter)?;

    // Surface task: print state changes, kick the session off once the
    // subsystem is ready, and treat a finished session as process exit.
    let mut snapshots = engine.subscribe();
    let starter = event_tx.clone();
    let session_cancel = cancel.clone();
    tokio::spawn(async move {
        loop {
            let changed = tokio::select! {
                _ = session_cancel.cancelled() => break,
                changed = snapshots.changed() => changed,
            };
            if changed.is_err() {
                break;
            }
            let snapshot = snapshots.borrow().clone();
            info!(phase = %snapshot.label, slots = ?snapshot.context.slots, "state");
            match snapshot.phase {
                Phase::Idle => {
                    let _ = starter.send(DmEvent::Start).await;
                }
                Phase::Done => {
                    let booked = serde_json::to_string(&snapshot.context.slots).unwrap_or_default();
                    info!(stats = ?snapshot.stats, %booked, "session complete");
                    session_cancel.cancel();
                    break;
                }
                _ => {}
            }
        }
    });

    let speech = ConsoleSpeech::new(
        speech_rx,
        event_tx.clone(),
        nlu,
        SpeechConfig::default(),
        cancel.clone(),
    );
    let speech_task = tokio::spawn(speech.run());

    // Ctrl-C hangs up the console adapter, which ends the engine loop.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            cancel.cancel();
        });
    }

    // Once the local senders are gone, the engine loop ends when the
    // adapter hangs up.
    drop(event_tx);

    let engine_task = tokio::spawn(async move { engine.run().await });

    let (engine_result, speech_result) = tokio::join!(engine_task, speech_task);
    engine_result??;
    speech_result??;
    info!("parley stopped");
    Ok(())
}
