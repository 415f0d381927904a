//! Speech subsystem adapters.
//!
//! The engine only knows the command/completion contract in
//! `kernel::event`. These adapters implement it for development and test
//! environments; the production subsystem lives outside this repository.

pub mod console;
pub mod scripted;

pub use console::ConsoleSpeech;
pub use scripted::{ListenOutcome, ScriptedSpeech};
