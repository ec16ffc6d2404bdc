//! Voice narration of cooking steps.
//!
//! # Architecture
//!
//! ```text
//!  Narrator ──speak/cancel──▶ Arc<dyn SpeechOutput>
//!     ▲                           │
//!     └──── SpeechEvent ──────────┘   (Started / Finished, per utterance)
//! ```
//!
//! [`Narrator`] owns the speaking flag and guarantees that a new utterance
//! never overlaps the previous one.  [`SpeechOutput`] is the platform speech
//! device; [`CommandSpeech`] drives `espeak-ng` / `say`, [`SilentSpeech`] is
//! used when narration is disabled.

pub mod command;
pub mod narrator;

use thiserror::Error;

pub use command::CommandSpeech;
pub use narrator::{step_narration, Narrator};

// ---------------------------------------------------------------------------
// Utterance / SpeechEvent
// ---------------------------------------------------------------------------

/// One piece of text to speak.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Narrator-assigned identifier, increasing per utterance.
    pub id: u64,
    pub text: String,
    /// Relative speaking rate (1.0 = engine default).
    pub rate: f32,
    /// Relative pitch (1.0 = engine default).
    pub pitch: f32,
}

/// Lifecycle events reported by a [`SpeechOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Audio started playing.
    Started,
    /// Audio played to the end.  Not sent for cancelled utterances.
    Finished,
}

/// Callback receiving the events of one utterance.
pub type SpeechListener = Box<dyn Fn(SpeechEvent) + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors raised by speech devices.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The speech program could not be started.
    #[error("failed to start speech program {program}: {reason}")]
    Spawn { program: String, reason: String },
}

// ---------------------------------------------------------------------------
// SpeechOutput trait
// ---------------------------------------------------------------------------

/// A non-blocking speech device.
///
/// `speak` returns as soon as playback has been started; progress is reported
/// through `listener`.  `cancel` stops the active utterance before returning.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, utterance: Utterance, listener: SpeechListener) -> Result<(), SpeechError>;

    fn cancel(&self);
}

// Compile-time assertion: Box<dyn SpeechOutput> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechOutput>) {}
};

// ---------------------------------------------------------------------------
// SilentSpeech
// ---------------------------------------------------------------------------

/// Speech device used when narration is disabled.  Produces no audio and no
/// events, so the speaking flag stays false.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechOutput for SilentSpeech {
    fn speak(&self, utterance: Utterance, _listener: SpeechListener) -> Result<(), SpeechError> {
        log::debug!("voice disabled, not speaking: {}", utterance.text);
        Ok(())
    }

    fn cancel(&self) {}
}
