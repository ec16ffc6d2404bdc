//! Kitchen assistant state machine.
//!
//! [`KitchenAssistant`] owns the capabilities (camera, analyzer, narrator)
//! and applies every transition to the [`SharedSession`].  It is driven
//! serially by [`SessionRunner`](super::SessionRunner); tests drive it
//! directly.
//!
//! # Scan flow
//!
//! ```text
//! start_scan ─▶ camera.open()                    [Scanning, preview held]
//! capture    ─▶ capture_jpeg + release           [Recipes, loading]
//!                 └─▶ PendingScan { id, image }  (request issued by caller)
//! complete_scan(id, result)
//!   ├─ id stale / screen moved on → discarded
//!   ├─ Ok  → replace ingredients + recipes       [loading = false]
//!   └─ Err → notice                              [Home, loading = false]
//! ```

use std::sync::{Arc, MutexGuard, PoisonError};

use crate::analysis::{AnalysisError, RecipeAnalyzer};
use crate::camera::{Camera, CameraError, CameraStream};
use crate::recipe::FridgeAnalysis;
use crate::voice::{step_narration, Narrator};

use super::state::{Screen, SessionState, SharedSession};

/// Notice shown when the camera cannot be opened or read.
pub const CAMERA_NOTICE: &str = "Camera access is required to scan your fridge.";

/// Notice shown when the analysis request fails.
pub const ANALYSIS_NOTICE: &str = "Could not analyze the fridge. Please try again.";

/// A captured frame waiting to be analysed.
#[derive(Debug)]
pub struct PendingScan {
    /// Sequence id to hand back to [`KitchenAssistant::complete_scan`].
    pub id: u64,
    /// JPEG-encoded frame.
    pub image: Vec<u8>,
}

// ---------------------------------------------------------------------------
// KitchenAssistant
// ---------------------------------------------------------------------------

pub struct KitchenAssistant {
    session: SharedSession,
    camera: Arc<dyn Camera>,
    analyzer: Arc<dyn RecipeAnalyzer>,
    narrator: Narrator,
    /// Open preview stream while on the Scanning screen.
    preview: Option<Box<dyn CameraStream>>,
    /// Last issued scan id.
    scan_seq: u64,
    /// Id of the scan whose result is still awaited.
    pending_scan: Option<u64>,
}

impl KitchenAssistant {
    pub fn new(
        session: SharedSession,
        camera: Arc<dyn Camera>,
        analyzer: Arc<dyn RecipeAnalyzer>,
        narrator: Narrator,
    ) -> Self {
        Self {
            session,
            camera,
            analyzer,
            narrator,
            preview: None,
            scan_seq: 0,
            pending_scan: None,
        }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Handle to the analyzer, for issuing a request off the state machine.
    pub fn analyzer(&self) -> Arc<dyn RecipeAnalyzer> {
        Arc::clone(&self.analyzer)
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    /// `true` while a scan result is awaited.
    pub fn scan_pending(&self) -> bool {
        self.pending_scan.is_some()
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    /// Home → Scanning.  Opens the camera and keeps the preview stream.
    pub async fn start_scan(&mut self) {
        if self.lock().screen != Screen::Home {
            log::debug!("session: start_scan ignored outside Home");
            return;
        }
        self.lock().notice = None;

        match self.camera.open().await {
            Ok(stream) => {
                self.release_preview();
                self.preview = Some(stream);
                self.lock().screen = Screen::Scanning;
                log::info!("session: camera open, scanning");
            }
            Err(e) => self.camera_failed(e),
        }
    }

    /// Scanning → Recipes.  Captures a frame, releases the camera and marks
    /// the session as loading.  The caller issues the analysis request for
    /// the returned frame and reports back through
    /// [`complete_scan`](Self::complete_scan).
    pub fn capture(&mut self) -> Option<PendingScan> {
        if self.lock().screen != Screen::Scanning {
            log::debug!("session: capture ignored outside Scanning");
            return None;
        }
        let Some(mut stream) = self.preview.take() else {
            self.camera_failed(CameraError::NoDevice("preview is not running".into()));
            return None;
        };

        let frame = stream.capture_jpeg();
        stream.release();

        let image = match frame {
            Ok(image) => image,
            Err(e) => {
                self.camera_failed(e);
                return None;
            }
        };

        self.scan_seq += 1;
        let id = self.scan_seq;
        self.pending_scan = Some(id);

        let mut st = self.lock();
        st.screen = Screen::Recipes;
        st.loading = true;
        st.notice = None;
        drop(st);

        log::info!("session: captured frame for scan #{id} ({} bytes)", image.len());
        Some(PendingScan { id, image })
    }

    /// Apply the outcome of scan `id`.
    pub fn complete_scan(&mut self, id: u64, result: Result<FridgeAnalysis, AnalysisError>) {
        if self.pending_scan != Some(id) {
            log::info!("session: discarding result of abandoned scan #{id}");
            return;
        }
        self.pending_scan = None;

        let mut st = self.lock();
        st.loading = false;

        if !st.screen.accepts_scan_result() {
            log::info!(
                "session: discarding result of scan #{id}, screen is {}",
                st.screen.label()
            );
            return;
        }

        match result {
            Ok(analysis) => {
                log::info!(
                    "session: scan #{id} found {} ingredients, {} recipes",
                    analysis.ingredients.len(),
                    analysis.recipes.len()
                );
                st.fridge_ingredients = analysis.ingredients;
                st.recipes = analysis.recipes;
            }
            Err(e) => {
                log::error!("session: scan #{id} failed: {e}");
                let was_cooking = st.screen == Screen::Cooking;
                st.notice = Some(ANALYSIS_NOTICE.to_string());
                st.screen = Screen::Home;
                drop(st);
                if was_cooking {
                    self.narrator.cancel();
                }
            }
        }
    }

    /// Capture and analyse in one go, awaiting the request inline.
    pub async fn scan(&mut self) {
        let Some(pending) = self.capture() else {
            return;
        };
        let result = self.analyzer.analyze(&pending.image).await;
        self.complete_scan(pending.id, result);
    }

    // -----------------------------------------------------------------------
    // Cooking
    // -----------------------------------------------------------------------

    /// Recipes → Cooking on recipe `id`; narrates the first step.
    pub fn select_recipe(&mut self, id: &str) {
        let mut st = self.lock();
        if st.screen != Screen::Recipes {
            log::debug!("session: select_recipe ignored outside Recipes");
            return;
        }
        let Some(recipe) = st.find_recipe(id).cloned() else {
            log::warn!("session: no recipe with id {id:?}");
            return;
        };

        log::info!("session: cooking {:?}", recipe.name);
        st.current_recipe = Some(recipe);
        st.current_step_index = 0;
        st.screen = Screen::Cooking;
        let narration = st.current_step().map(|step| step_narration(0, step));
        drop(st);

        if let Some(text) = narration {
            self.narrator.speak(text);
        }
    }

    pub fn next_step(&mut self) {
        self.move_cursor(|index, count| (index + 1 < count).then_some(index + 1));
    }

    pub fn prev_step(&mut self) {
        self.move_cursor(|index, _| index.checked_sub(1));
    }

    /// Narrate the current step again.
    pub fn repeat_step(&mut self) {
        self.move_cursor(|index, _| Some(index));
    }

    /// Move the cursor to `target(index, step_count)` and narrate it.  `None`
    /// leaves the cursor alone and stays silent.
    fn move_cursor(&mut self, target: impl FnOnce(usize, usize) -> Option<usize>) {
        let mut st = self.lock();
        if st.screen != Screen::Cooking {
            return;
        }
        let Some(index) = target(st.current_step_index, st.step_count()) else {
            return;
        };
        st.current_step_index = index;
        let narration = st.current_step().map(|step| step_narration(index, step));
        drop(st);

        if let Some(text) = narration {
            self.narrator.speak(text);
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Step back one screen.  Always silences the narrator.
    pub fn go_back(&mut self) {
        self.narrator.cancel();

        let from = self.lock().screen;
        if from == Screen::Scanning {
            self.release_preview();
        }

        let to = from.back();
        let abandoned = to == Screen::Home && self.pending_scan.take().is_some();

        let mut st = self.lock();
        st.screen = to;
        if abandoned {
            st.loading = false;
        }
        drop(st);

        if abandoned {
            log::info!("session: scan abandoned");
        }
        log::debug!("session: {} → {}", from.label(), to.label());
    }

    /// Recipes → Shopping.  Ignored while a scan is loading.
    pub fn show_shopping_list(&mut self) {
        let mut st = self.lock();
        if st.screen == Screen::Recipes && !st.loading {
            st.screen = Screen::Shopping;
        }
    }

    // -----------------------------------------------------------------------
    // Filters, shopping list, notices
    // -----------------------------------------------------------------------

    pub fn set_diet(&mut self, diet: &str) {
        self.lock().selected_diet = diet.to_string();
    }

    pub fn add_to_shopping_list(&mut self, item: &str) {
        if self.lock().add_to_shopping_list(item) {
            log::debug!("session: added {item:?} to shopping list");
        }
    }

    pub fn remove_from_shopping_list(&mut self, item: &str) {
        if self.lock().remove_from_shopping_list(item) {
            log::debug!("session: removed {item:?} from shopping list");
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.lock().notice = None;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release_preview(&mut self) {
        if let Some(stream) = self.preview.take() {
            stream.release();
        }
    }

    fn camera_failed(&mut self, error: CameraError) {
        log::error!("session: camera error: {error}");
        self.release_preview();
        let mut st = self.lock();
        st.notice = Some(CAMERA_NOTICE.to_string());
        st.screen = Screen::Home;
    }
}

impl Drop for KitchenAssistant {
    fn drop(&mut self) {
        self.release_preview();
        self.narrator.cancel();
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::analysis::{AnalysisError, RecipeAnalyzer};
    use crate::camera::{Camera, CameraError, CameraStream};
    use crate::recipe::{Difficulty, FridgeAnalysis, Ingredient, Recipe};

    /// Camera counting opens and releases.
    #[derive(Default)]
    pub struct MockCamera {
        pub opens: AtomicUsize,
        pub releases: Arc<AtomicUsize>,
        pub deny: bool,
        pub fail_capture: bool,
    }

    impl MockCamera {
        pub fn released(&self) -> usize {
            self.releases.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Camera for MockCamera {
        async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError> {
            if self.deny {
                return Err(CameraError::PermissionDenied("denied by test".into()));
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockStream {
                releases: Arc::clone(&self.releases),
                fail_capture: self.fail_capture,
            }))
        }
    }

    struct MockStream {
        releases: Arc<AtomicUsize>,
        fail_capture: bool,
    }

    impl CameraStream for MockStream {
        fn capture_jpeg(&mut self) -> Result<Vec<u8>, CameraError> {
            if self.fail_capture {
                return Err(CameraError::Capture("blank frame".into()));
            }
            Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
        }

        fn release(self: Box<Self>) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Analyzer returning a fixed analysis, or a 500 when `analysis` is
    /// `None`.
    #[derive(Default)]
    pub struct MockAnalyzer {
        pub analysis: Option<FridgeAnalysis>,
        pub delay: Option<Duration>,
        pub images: Mutex<Vec<Vec<u8>>>,
    }

    impl MockAnalyzer {
        pub fn ok(analysis: FridgeAnalysis) -> Self {
            Self {
                analysis: Some(analysis),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.images.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecipeAnalyzer for MockAnalyzer {
        async fn analyze(&self, image: &[u8]) -> Result<FridgeAnalysis, AnalysisError> {
            self.images.lock().unwrap().push(image.to_vec());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.analysis.clone().ok_or(AnalysisError::Status {
                status: 500,
                body: "internal error".into(),
            })
        }
    }

    pub fn recipe(id: &str, tags: &[&str], steps: &[&str]) -> Recipe {
        Recipe {
            id: id.into(),
            name: format!("Recipe {id}"),
            description: String::new(),
            prep_time: 15.0,
            calories: 320.0,
            difficulty: Difficulty::Easy,
            dietary_tags: tags.iter().map(|t| t.to_string()).collect(),
            ingredients: vec![
                Ingredient {
                    name: "Eggs".into(),
                    amount: "2".into(),
                    is_missing: false,
                },
                Ingredient {
                    name: "Milk".into(),
                    amount: "1 cup".into(),
                    is_missing: true,
                },
            ],
            steps: steps.iter().map(|s| s.to_string()).collect(),
            image_url: None,
        }
    }

    /// Two recipes: `r1` is Vegan, `r2` is Keto.
    pub fn vegan_and_keto() -> FridgeAnalysis {
        FridgeAnalysis {
            ingredients: vec!["Eggs".into(), "Spinach".into()],
            recipes: vec![
                recipe("r1", &["Vegan"], &["Wash the spinach."]),
                recipe("r2", &["Keto"], &["Beat the eggs."]),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::mock::{recipe, vegan_and_keto, MockAnalyzer, MockCamera};
    use super::*;
    use crate::config::VoiceConfig;
    use crate::session::state::new_shared_session;
    use crate::voice::narrator::mock::RecordingSpeech;
    use crate::voice::SpeechEvent;

    struct Harness {
        assistant: KitchenAssistant,
        camera: Arc<MockCamera>,
        analyzer: Arc<MockAnalyzer>,
        speech: Arc<RecordingSpeech>,
    }

    impl Harness {
        fn new(camera: MockCamera, analyzer: MockAnalyzer) -> Self {
            let camera = Arc::new(camera);
            let analyzer = Arc::new(analyzer);
            let speech = Arc::new(RecordingSpeech::default());
            let narrator = Narrator::new(speech.clone(), &VoiceConfig::default());
            let assistant = KitchenAssistant::new(
                new_shared_session(),
                camera.clone(),
                analyzer.clone(),
                narrator,
            );
            Self {
                assistant,
                camera,
                analyzer,
                speech,
            }
        }

        fn with(analysis: FridgeAnalysis) -> Self {
            Self::new(MockCamera::default(), MockAnalyzer::ok(analysis))
        }

        fn state(&self) -> SessionState {
            self.assistant.session().lock().unwrap().clone()
        }

        /// Home → Scanning → Recipes with the analysis applied.
        async fn scanned(analysis: FridgeAnalysis) -> Self {
            let mut h = Self::with(analysis);
            h.assistant.start_scan().await;
            h.assistant.scan().await;
            h
        }

        async fn cooking(steps: &[&str]) -> Self {
            let analysis = FridgeAnalysis {
                ingredients: vec!["Eggs".into()],
                recipes: vec![recipe("r1", &[], steps)],
            };
            let mut h = Self::scanned(analysis).await;
            h.assistant.select_recipe("r1");
            h
        }
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn start_scan_opens_camera() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;

        assert_eq!(h.state().screen, Screen::Scanning);
        assert_eq!(h.camera.opens.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(h.camera.released(), 0);
    }

    #[tokio::test]
    async fn denied_camera_returns_home_with_notice() {
        let camera = MockCamera {
            deny: true,
            ..MockCamera::default()
        };
        let mut h = Harness::new(camera, MockAnalyzer::ok(vegan_and_keto()));
        h.assistant.start_scan().await;

        let st = h.state();
        assert_eq!(st.screen, Screen::Home);
        assert_eq!(st.notice.as_deref(), Some(CAMERA_NOTICE));
    }

    #[tokio::test]
    async fn successful_scan_replaces_data() {
        let h = Harness::scanned(vegan_and_keto()).await;

        let st = h.state();
        assert_eq!(st.screen, Screen::Recipes);
        assert!(!st.loading);
        assert_eq!(st.fridge_ingredients, vec!["Eggs", "Spinach"]);
        assert_eq!(st.recipes.len(), 2);
        assert_eq!(h.analyzer.calls(), 1);
    }

    #[tokio::test]
    async fn capture_releases_camera_once_before_request() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;

        let pending = h.assistant.capture().expect("frame");
        assert_eq!(h.camera.released(), 1);
        assert_eq!(h.analyzer.calls(), 0);

        let st = h.state();
        assert_eq!(st.screen, Screen::Recipes);
        assert!(st.loading);
        assert_eq!(st.loading_text, "Analyzing your fridge...");

        h.assistant.complete_scan(pending.id, Ok(vegan_and_keto()));
        h.assistant.go_back();
        assert_eq!(h.camera.released(), 1);
    }

    #[tokio::test]
    async fn failed_capture_is_camera_error() {
        let camera = MockCamera {
            fail_capture: true,
            ..MockCamera::default()
        };
        let mut h = Harness::new(camera, MockAnalyzer::ok(vegan_and_keto()));
        h.assistant.start_scan().await;
        assert!(h.assistant.capture().is_none());

        let st = h.state();
        assert_eq!(st.screen, Screen::Home);
        assert!(!st.loading);
        assert_eq!(st.notice.as_deref(), Some(CAMERA_NOTICE));
        assert_eq!(h.camera.released(), 1);
        assert_eq!(h.analyzer.calls(), 0);
    }

    #[tokio::test]
    async fn failed_analysis_returns_home_and_keeps_prior_data() {
        let mut h = Harness::scanned(vegan_and_keto()).await;
        h.assistant.go_back();
        assert_eq!(h.state().screen, Screen::Home);

        h.assistant.start_scan().await;
        let pending = h.assistant.capture().expect("frame");
        h.assistant.complete_scan(pending.id, Err(AnalysisError::Timeout));

        let st = h.state();
        assert_eq!(st.screen, Screen::Home);
        assert!(!st.loading);
        assert_eq!(st.notice.as_deref(), Some(ANALYSIS_NOTICE));
        assert_eq!(st.recipes.len(), 2);
        assert_eq!(st.fridge_ingredients, vec!["Eggs", "Spinach"]);
    }

    #[tokio::test]
    async fn going_home_abandons_outstanding_scan() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;
        let pending = h.assistant.capture().expect("frame");

        h.assistant.go_back();
        let st = h.state();
        assert_eq!(st.screen, Screen::Home);
        assert!(!st.loading);
        assert!(!h.assistant.scan_pending());

        h.assistant.complete_scan(pending.id, Ok(vegan_and_keto()));
        let st = h.state();
        assert_eq!(st.screen, Screen::Home);
        assert!(st.recipes.is_empty());
        assert!(st.fridge_ingredients.is_empty());
    }

    #[tokio::test]
    async fn stale_failure_does_not_disturb_newer_scan() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;
        let first = h.assistant.capture().expect("frame");
        h.assistant.go_back();

        h.assistant.start_scan().await;
        let second = h.assistant.capture().expect("frame");
        assert_ne!(first.id, second.id);

        h.assistant.complete_scan(first.id, Err(AnalysisError::Timeout));
        let st = h.state();
        assert_eq!(st.screen, Screen::Recipes);
        assert!(st.loading);
        assert!(st.notice.is_none());

        h.assistant.complete_scan(second.id, Ok(vegan_and_keto()));
        assert_eq!(h.state().recipes.len(), 2);
    }

    #[tokio::test]
    async fn leaving_scanning_releases_preview() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;
        h.assistant.go_back();

        assert_eq!(h.state().screen, Screen::Home);
        assert_eq!(h.camera.released(), 1);

        h.assistant.go_back();
        assert_eq!(h.camera.released(), 1);
    }

    #[tokio::test]
    async fn next_scan_clears_notice() {
        let mut h = Harness::new(MockCamera::default(), MockAnalyzer::failing());
        h.assistant.start_scan().await;
        h.assistant.scan().await;
        assert_eq!(h.state().notice.as_deref(), Some(ANALYSIS_NOTICE));

        h.assistant.start_scan().await;
        let st = h.state();
        assert_eq!(st.screen, Screen::Scanning);
        assert!(st.notice.is_none());
    }

    #[tokio::test]
    async fn dismiss_notice_clears_it() {
        let camera = MockCamera {
            deny: true,
            ..MockCamera::default()
        };
        let mut h = Harness::new(camera, MockAnalyzer::failing());
        h.assistant.start_scan().await;
        assert!(h.state().notice.is_some());
        h.assistant.dismiss_notice();
        assert!(h.state().notice.is_none());
        assert_eq!(h.state().screen, Screen::Home);
    }

    #[tokio::test]
    async fn transitions_from_wrong_screen_are_ignored() {
        let mut h = Harness::with(vegan_and_keto());
        assert!(h.assistant.capture().is_none());
        h.assistant.select_recipe("r1");
        h.assistant.next_step();
        h.assistant.show_shopping_list();
        assert_eq!(h.state().screen, Screen::Home);
        assert!(h.speech.texts().is_empty());
    }

    // -----------------------------------------------------------------------
    // Recipes and filtering
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn vegan_and_keto_scenario() {
        let mut h = Harness::scanned(vegan_and_keto()).await;

        h.assistant.set_diet("Vegan");
        let st = h.state();
        let ids: Vec<&str> = st.filtered_recipes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);

        h.assistant.set_diet("All");
        let st = h.state();
        let ids: Vec<&str> = st.filtered_recipes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(st.screen, Screen::Recipes);
    }

    #[tokio::test]
    async fn shopping_list_round_trip() {
        let mut h = Harness::scanned(vegan_and_keto()).await;
        h.assistant.show_shopping_list();
        assert_eq!(h.state().screen, Screen::Shopping);

        h.assistant.add_to_shopping_list("Milk");
        h.assistant.add_to_shopping_list("Milk");
        assert_eq!(h.state().shopping_list, vec!["Milk"]);
        h.assistant.remove_from_shopping_list("Milk");
        assert!(h.state().shopping_list.is_empty());

        h.assistant.go_back();
        assert_eq!(h.state().screen, Screen::Recipes);
    }

    #[tokio::test]
    async fn shopping_list_unavailable_while_loading() {
        let mut h = Harness::with(vegan_and_keto());
        h.assistant.start_scan().await;
        let _pending = h.assistant.capture().expect("frame");
        h.assistant.show_shopping_list();
        assert_eq!(h.state().screen, Screen::Recipes);
    }

    // -----------------------------------------------------------------------
    // Cooking
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn selecting_recipe_resets_cursor_and_narrates_first_step() {
        let mut h = Harness::cooking(&["Boil water.", "Add pasta."]).await;
        h.assistant.next_step();
        h.assistant.go_back();
        h.assistant.select_recipe("r1");

        let st = h.state();
        assert_eq!(st.screen, Screen::Cooking);
        assert_eq!(st.current_step_index, 0);
        assert_eq!(
            h.speech.texts().last().map(String::as_str),
            Some("Step 1. Boil water.")
        );
    }

    #[tokio::test]
    async fn unknown_recipe_is_ignored() {
        let mut h = Harness::scanned(vegan_and_keto()).await;
        h.assistant.select_recipe("nope");
        assert_eq!(h.state().screen, Screen::Recipes);
        assert!(h.speech.texts().is_empty());
    }

    #[tokio::test]
    async fn three_step_walkthrough_narrates_each_step_once() {
        let mut h = Harness::cooking(&["A", "B", "C"]).await;
        h.assistant.next_step();
        h.assistant.next_step();
        h.assistant.next_step();

        assert_eq!(h.state().current_step_index, 2);
        assert_eq!(h.speech.texts(), vec!["Step 1. A", "Step 2. B", "Step 3. C"]);
    }

    #[tokio::test]
    async fn cursor_is_clamped_at_both_ends() {
        let mut h = Harness::cooking(&["A", "B"]).await;
        h.assistant.prev_step();
        assert_eq!(h.state().current_step_index, 0);
        assert_eq!(h.speech.texts().len(), 1);

        h.assistant.next_step();
        h.assistant.next_step();
        assert_eq!(h.state().current_step_index, 1);

        h.assistant.prev_step();
        assert_eq!(h.state().current_step_index, 0);
        assert_eq!(h.speech.texts(), vec!["Step 1. A", "Step 2. B", "Step 1. A"]);
    }

    #[tokio::test]
    async fn repeat_step_narrates_current_step() {
        let mut h = Harness::cooking(&["A", "B"]).await;
        h.assistant.next_step();
        h.assistant.repeat_step();
        assert_eq!(h.state().current_step_index, 1);
        assert_eq!(h.speech.texts(), vec!["Step 1. A", "Step 2. B", "Step 2. B"]);
    }

    #[tokio::test]
    async fn going_back_from_cooking_stops_narration() {
        let mut h = Harness::cooking(&["A", "B"]).await;
        assert!(h.assistant.narrator().is_speaking());

        h.assistant.go_back();
        assert!(!h.assistant.narrator().is_speaking());
        assert_eq!(h.state().screen, Screen::Recipes);

        // A finish from the cancelled utterance arriving late changes nothing.
        h.speech.emit(0, SpeechEvent::Finished);
        assert!(!h.assistant.narrator().is_speaking());
    }

    #[tokio::test]
    async fn narration_finishing_clears_speaking_flag() {
        let h = Harness::cooking(&["A"]).await;
        assert!(h.assistant.narrator().is_speaking());
        h.speech.emit(0, SpeechEvent::Finished);
        assert!(!h.assistant.narrator().is_speaking());
    }
}
