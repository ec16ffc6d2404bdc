//! Speaking-state tracking on top of a [`SpeechOutput`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::VoiceConfig;
use crate::voice::{SpeechEvent, SpeechListener, SpeechOutput, Utterance};

/// Narration text for the step at zero-based `index`.
///
/// ```
/// use fridge_chef::voice::step_narration;
///
/// assert_eq!(step_narration(2, "Preheat the oven."), "Step 3. Preheat the oven.");
/// ```
pub fn step_narration(index: usize, instruction: &str) -> String {
    format!("Step {}. {}", index + 1, instruction)
}

/// Flag and generation counter shared with the speech listeners.
#[derive(Debug, Default)]
struct NarrationState {
    speaking: AtomicBool,
    /// Id of the utterance whose events are honoured.  Bumped on every
    /// speak and cancel, which orphans listeners of older utterances.
    current: AtomicU64,
}

impl NarrationState {
    fn on_event(&self, id: u64, event: SpeechEvent) {
        if self.current.load(Ordering::SeqCst) != id {
            return;
        }
        match event {
            SpeechEvent::Started => self.speaking.store(true, Ordering::SeqCst),
            SpeechEvent::Finished => self.speaking.store(false, Ordering::SeqCst),
        }
    }
}

/// Single-voice narrator.  Cheap to clone; clones share the same flag.
#[derive(Clone)]
pub struct Narrator {
    output: Arc<dyn SpeechOutput>,
    state: Arc<NarrationState>,
    rate: f32,
    pitch: f32,
}

impl Narrator {
    pub fn new(output: Arc<dyn SpeechOutput>, config: &VoiceConfig) -> Self {
        Self {
            output,
            state: Arc::new(NarrationState::default()),
            rate: config.rate,
            pitch: config.pitch,
        }
    }

    /// Cancel whatever is playing, then start narrating `text`.
    pub fn speak(&self, text: impl Into<String>) {
        self.cancel();

        let id = self.state.current.fetch_add(1, Ordering::SeqCst) + 1;
        let utterance = Utterance {
            id,
            text: text.into(),
            rate: self.rate,
            pitch: self.pitch,
        };
        log::debug!("narrator: speaking #{id}: {}", utterance.text);

        let state = Arc::clone(&self.state);
        let listener: SpeechListener = Box::new(move |event| state.on_event(id, event));

        if let Err(e) = self.output.speak(utterance, listener) {
            log::error!("narrator: {e}");
            self.state.speaking.store(false, Ordering::SeqCst);
        }
    }

    /// Stop any active narration.  Safe to call when nothing is playing.
    pub fn cancel(&self) {
        self.state.current.fetch_add(1, Ordering::SeqCst);
        self.output.cancel();
        self.state.speaking.store(false, Ordering::SeqCst);
    }

    pub fn is_speaking(&self) -> bool {
        self.state.speaking.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("speaking", &self.is_speaking())
            .field("rate", &self.rate)
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

/// Speech device that records calls and lets tests fire lifecycle events.
#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;

    use crate::voice::{SpeechError, SpeechEvent, SpeechListener, SpeechOutput, Utterance};

    #[derive(Default)]
    pub struct RecordingSpeech {
        pub spoken: Mutex<Vec<Utterance>>,
        pub cancels: Mutex<usize>,
        pub listeners: Mutex<Vec<SpeechListener>>,
        pub fail: bool,
    }

    impl RecordingSpeech {
        pub fn texts(&self) -> Vec<String> {
            self.spoken.lock().unwrap().iter().map(|u| u.text.clone()).collect()
        }

        /// Fire `event` on the listener of the `n`-th utterance.
        pub fn emit(&self, n: usize, event: SpeechEvent) {
            (self.listeners.lock().unwrap()[n])(event);
        }
    }

    impl SpeechOutput for RecordingSpeech {
        fn speak(&self, utterance: Utterance, listener: SpeechListener) -> Result<(), SpeechError> {
            if self.fail {
                return Err(SpeechError::Spawn {
                    program: "mock".into(),
                    reason: "unavailable".into(),
                });
            }
            self.spoken.lock().unwrap().push(utterance);
            listener(SpeechEvent::Started);
            self.listeners.lock().unwrap().push(listener);
            Ok(())
        }

        fn cancel(&self) {
            *self.cancels.lock().unwrap() += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
