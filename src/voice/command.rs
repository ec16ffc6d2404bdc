//! Speech output through the platform's command-line TTS program.
//!
//! Each utterance runs as a child process (`espeak-ng` or `say`).  A watcher
//! thread polls the child and reports [`SpeechEvent::Finished`] when it exits
//! on its own; [`CommandSpeech::cancel`] kills and reaps the child before
//! returning, so two utterances never overlap.

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::{VoiceConfig, VoiceEngine};
use crate::voice::{SpeechError, SpeechEvent, SpeechListener, SpeechOutput, Utterance};

/// How often the watcher thread checks whether the child has exited.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default speaking rate of both engines, in words per minute.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

impl VoiceEngine {
    /// Executable name looked up on `PATH`.
    pub fn binary(&self) -> &'static str {
        match self {
            VoiceEngine::EspeakNg => "espeak-ng",
            VoiceEngine::Say => "say",
        }
    }

    /// Command-line arguments speaking `utterance`.
    pub fn args(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate).round().clamp(80.0, 450.0) as u32;
        match self {
            VoiceEngine::EspeakNg => {
                // espeak-ng pitch runs 0-99 with 50 as the default.
                let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32;
                vec![
                    "-s".into(),
                    wpm.to_string(),
                    "-p".into(),
                    pitch.to_string(),
                    utterance.text.clone(),
                ]
            }
            // `say` has no pitch flag.
            VoiceEngine::Say => vec!["-r".into(), wpm.to_string(), utterance.text.clone()],
        }
    }
}

struct Playback {
    id: u64,
    child: Child,
}

/// [`SpeechOutput`] backed by `espeak-ng` / `say`.
pub struct CommandSpeech {
    engine: VoiceEngine,
    program: String,
    active: Arc<Mutex<Option<Playback>>>,
}

impl CommandSpeech {
    pub fn new(engine: VoiceEngine) -> Self {
        Self::with_program(engine, engine.binary())
    }

    /// Use `program` instead of the engine's default executable, keeping the
    /// engine's argument style.
    pub fn with_program(engine: VoiceEngine, program: impl Into<String>) -> Self {
        Self {
            engine,
            program: program.into(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        match &config.program {
            Some(program) => Self::with_program(config.engine, program.clone()),
            None => Self::new(config.engine),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Playback>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SpeechOutput for CommandSpeech {
    fn speak(&self, utterance: Utterance, listener: SpeechListener) -> Result<(), SpeechError> {
        self.cancel();

        let child = Command::new(&self.program)
            .args(self.engine.args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let id = utterance.id;
        *self.slot() = Some(Playback { id, child });
        listener(SpeechEvent::Started);

        let active = Arc::clone(&self.active);
        let spawned = std::thread::Builder::new()
            .name("speech-watch".into())
            .spawn(move || watch(active, id, listener));
        if let Err(e) = spawned {
            log::warn!("speech: watcher thread failed to start ({e}); finish will not be reported");
        }
        Ok(())
    }

    fn cancel(&self) {
        if let Some(mut playback) = self.slot().take() {
            let _ = playback.child.kill();
            let _ = playback.child.wait();
            log::debug!("speech: cancelled utterance #{}", playback.id);
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Wait for utterance `id` to exit.  Returns silently if it was cancelled or
/// replaced.
fn watch(active: Arc<Mutex<Option<Playback>>>, id: u64, listener: SpeechListener) {
    loop {
        std::thread::sleep(POLL_INTERVAL);

        let mut slot = active.lock().unwrap_or_else(PoisonError::into_inner);
        let playback = match slot.as_mut() {
            Some(playback) if playback.id == id => playback,
            _ => return,
        };

        match playback.child.try_wait() {
            Ok(None) => continue,
            Ok(Some(status)) => {
                if !status.success() {
                    log::warn!("speech: utterance #{id} exited with {status}");
                }
            }
            Err(e) => log::warn!("speech: lost track of utterance #{id}: {e}"),
        }

        *slot = None;
        drop(slot);
        listener(SpeechEvent::Finished);
        return;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
