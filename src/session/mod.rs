//! Application session: screens, shared state and the state machine.
//!
//! # Architecture
//!
//! ```text
//! KitchenApp (egui) ──Command (mpsc)──▶ SessionRunner::run()  ← async tokio task
//!        ▲                                   │
//!        │                                   ├─ KitchenAssistant  (transitions)
//!        │                                   │     ├─ Camera
//!        │                                   │     ├─ RecipeAnalyzer  (spawned task)
//!        │                                   │     └─ Narrator
//!        │                                   ▼
//!        └──── read every frame ──── SharedSession (Arc<Mutex<SessionState>>)
//! ```
//!
//! The UI never mutates the session; every change goes through a
//! [`Command`] and is applied serially by the runner.

pub mod assistant;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use assistant::{KitchenAssistant, PendingScan, ANALYSIS_NOTICE, CAMERA_NOTICE};
pub use runner::{Command, SessionRunner};
pub use state::{new_shared_session, Screen, SessionState, SharedSession, LOADING_TEXT};
