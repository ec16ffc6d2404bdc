//! Session runner: applies UI commands to the [`KitchenAssistant`].
//!
//! [`SessionRunner`] receives [`Command`]s over a `tokio::sync::mpsc`
//! channel.  Analysis requests run as separate tasks and report back over a
//! second channel, so the loop keeps serving commands (e.g. `GoBack`) while a
//! request is outstanding.
//!
//! ```text
//! Command::Capture
//!   └─▶ assistant.capture()                     [Recipes, loading]
//!         └─▶ tokio::spawn(analyzer.analyze)
//!               └─▶ ScanOutcome ─▶ assistant.complete_scan(id, result)
//! ```

use tokio::sync::mpsc;

use crate::analysis::AnalysisError;
use crate::recipe::FridgeAnalysis;

use super::assistant::{KitchenAssistant, PendingScan};

/// Capacity of the internal completion channel.
const OUTCOME_CAPACITY: usize = 4;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// User intents sent from the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartScan,
    Capture,
    SelectRecipe(String),
    NextStep,
    PrevStep,
    RepeatStep,
    GoBack,
    SetDiet(String),
    AddToShoppingList(String),
    RemoveFromShoppingList(String),
    ShowShoppingList,
    DismissNotice,
}

/// Result of one analysis request, tagged with its scan id.
#[derive(Debug)]
struct ScanOutcome {
    id: u64,
    result: Result<FridgeAnalysis, AnalysisError>,
}

// ---------------------------------------------------------------------------
// SessionRunner
// ---------------------------------------------------------------------------

/// Drives the [`KitchenAssistant`] from a command channel.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fridge_chef::session::{Command, KitchenAssistant, SessionRunner, new_shared_session};
/// # use fridge_chef::camera::Camera;
/// # use fridge_chef::analysis::RecipeAnalyzer;
/// # use fridge_chef::voice::Narrator;
/// # async fn example(camera: Arc<dyn Camera>, analyzer: Arc<dyn RecipeAnalyzer>, narrator: Narrator) {
/// let session = new_shared_session();
/// let assistant = KitchenAssistant::new(session.clone(), camera, analyzer, narrator);
///
/// let (tx, rx) = tokio::sync::mpsc::channel(32);
/// tokio::spawn(SessionRunner::new(assistant).run(rx));
/// tx.send(Command::StartScan).await.unwrap();
/// # }
/// ```
pub struct SessionRunner {
    assistant: KitchenAssistant,
}

impl SessionRunner {
    pub fn new(assistant: KitchenAssistant) -> Self {
        Self { assistant }
    }

    /// Run until `commands` is closed, then wait for outstanding analysis
    /// requests and apply their results.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<ScanOutcome>(OUTCOME_CAPACITY);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command, &outcome_tx).await,
                    None => break,
                },
                Some(outcome) = outcome_rx.recv() => {
                    self.assistant.complete_scan(outcome.id, outcome.result);
                }
            }
        }

        drop(outcome_tx);
        while let Some(outcome) = outcome_rx.recv().await {
            self.assistant.complete_scan(outcome.id, outcome.result);
        }

        log::info!("session: command channel closed, runner shutting down");
    }

    async fn handle(&mut self, command: Command, outcome_tx: &mpsc::Sender<ScanOutcome>) {
        log::debug!("session: {command:?}");

        match command {
            Command::StartScan => self.assistant.start_scan().await,
            Command::Capture => {
                if let Some(scan) = self.assistant.capture() {
                    self.spawn_analysis(scan, outcome_tx.clone());
                }
            }
            Command::SelectRecipe(id) => self.assistant.select_recipe(&id),
            Command::NextStep => self.assistant.next_step(),
            Command::PrevStep => self.assistant.prev_step(),
            Command::RepeatStep => self.assistant.repeat_step(),
            Command::GoBack => self.assistant.go_back(),
            Command::SetDiet(diet) => self.assistant.set_diet(&diet),
            Command::AddToShoppingList(item) => self.assistant.add_to_shopping_list(&item),
            Command::RemoveFromShoppingList(item) => {
                self.assistant.remove_from_shopping_list(&item)
            }
            Command::ShowShoppingList => self.assistant.show_shopping_list(),
            Command::DismissNotice => self.assistant.dismiss_notice(),
        }
    }

    fn spawn_analysis(&self, scan: PendingScan, outcome_tx: mpsc::Sender<ScanOutcome>) {
        let analyzer = self.assistant.analyzer();
        tokio::spawn(async move {
            let result = analyzer.analyze(&scan.image).await;
            let outcome = ScanOutcome {
                id: scan.id,
                result,
            };
            if outcome_tx.send(outcome).await.is_err() {
                log::debug!("session: runner gone, dropping result of scan #{}", scan.id);
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
