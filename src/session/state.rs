//! Screen enum and the shared session record.
//!
//! [`Screen`] is the state of the application state machine.  The UI reads it
//! via [`SharedSession`] to pick which view to render.
//!
//! [`SessionState`] is the single source of truth for everything the UI
//! needs: current screen, scan results, shopping list, cooking cursor and
//! the last user-facing notice.  Derived views (the diet-filtered recipe list,
//! the current step text) are computed from it on demand, never stored.
//!
//! [`SharedSession`] is a type alias for `Arc<Mutex<SessionState>>`: cheap to
//! clone and safe to share between the runner task and the UI thread.

use std::sync::{Arc, Mutex};

use crate::recipe::{filter_by_diet, Recipe, ALL_DIETS};

/// Message shown while an analysis request is outstanding.
pub const LOADING_TEXT: &str = "Analyzing your fridge...";

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Screens of the kitchen assistant.
///
/// The state machine transitions are:
///
/// ```text
/// Home ──start_scan──▶ Scanning ──capture──▶ Recipes ──select_recipe──▶ Cooking
///  ▲  ◀──camera error──┘                        │  ▲                       │
///  ├──────────────analysis error────────────────┤  └───────go_back─────────┘
///  └──────────────────go_back───────────────────┘
///                                  Recipes ──show_shopping_list──▶ Shopping
///                                  Recipes ◀──────go_back───────── Shopping
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Landing screen with the scan button.
    #[default]
    Home,

    /// Camera preview is live; waiting for the user to capture.
    Scanning,

    /// Recipe list (or the loading view while analysis runs).
    Recipes,

    /// Step-by-step cooking with narration.
    Cooking,

    /// Shopping list of missing ingredients.
    Shopping,
}

impl Screen {
    /// Destination of `go_back` from this screen.
    ///
    /// ```
    /// use fridge_chef::session::Screen;
    ///
    /// assert_eq!(Screen::Cooking.back(), Screen::Recipes);
    /// assert_eq!(Screen::Recipes.back(), Screen::Home);
    /// assert_eq!(Screen::Shopping.back(), Screen::Recipes);
    /// assert_eq!(Screen::Scanning.back(), Screen::Home);
    /// assert_eq!(Screen::Home.back(), Screen::Home);
    /// ```
    pub fn back(&self) -> Screen {
        match self {
            Screen::Cooking => Screen::Recipes,
            Screen::Recipes => Screen::Home,
            Screen::Shopping => Screen::Recipes,
            Screen::Home | Screen::Scanning => Screen::Home,
        }
    }

    /// `true` for the screens a scan result may still be applied on.
    pub fn accepts_scan_result(&self) -> bool {
        matches!(self, Screen::Recipes | Screen::Cooking)
    }

    /// A short human-readable label suitable for the window title.
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Scanning => "Scan your fridge",
            Screen::Recipes => "Recipes",
            Screen::Cooking => "Cooking",
            Screen::Shopping => "Shopping list",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Shared session record: the single source of truth for the UI.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Current screen.
    pub screen: Screen,

    /// `true` while an analysis request is outstanding.
    pub loading: bool,

    /// Items detected by the last successful scan.
    pub fridge_ingredients: Vec<String>,

    /// Recipes from the last successful scan.  Replaced wholesale, never
    /// merged.
    pub recipes: Vec<Recipe>,

    /// Items to buy, duplicate-free, in insertion order.
    pub shopping_list: Vec<String>,

    /// Active dietary filter; [`ALL_DIETS`] disables filtering.
    pub selected_diet: String,

    /// Recipe being cooked.
    pub current_recipe: Option<Recipe>,

    /// Zero-based index into `current_recipe.steps`.
    pub current_step_index: usize,

    /// Last user-facing error, shown until dismissed or the next scan.
    pub notice: Option<String>,

    /// Message shown while `loading` is set.
    pub loading_text: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            loading: false,
            fridge_ingredients: Vec::new(),
            recipes: Vec::new(),
            shopping_list: Vec::new(),
            selected_diet: ALL_DIETS.to_string(),
            current_recipe: None,
            current_step_index: 0,
            notice: None,
            loading_text: LOADING_TEXT.to_string(),
        }
    }

    /// Recipes passing the selected dietary filter.
    pub fn filtered_recipes(&self) -> Vec<&Recipe> {
        filter_by_diet(&self.recipes, &self.selected_diet)
    }

    pub fn find_recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Number of steps in the current recipe (0 when none is selected).
    pub fn step_count(&self) -> usize {
        self.current_recipe.as_ref().map_or(0, |r| r.steps.len())
    }

    /// Instruction at the cursor, while cooking.
    pub fn current_step(&self) -> Option<&str> {
        self.current_recipe
            .as_ref()
            .and_then(|r| r.steps.get(self.current_step_index))
            .map(String::as_str)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 >= self.step_count()
    }

    /// Append `item` unless already present.  Returns `true` if added.
    pub fn add_to_shopping_list(&mut self, item: &str) -> bool {
        if self.shopping_list.iter().any(|i| i == item) {
            return false;
        }
        self.shopping_list.push(item.to_string());
        true
    }

    /// Remove `item`.  Returns `true` if it was present.
    pub fn remove_from_shopping_list(&mut self, item: &str) -> bool {
        let before = self.shopping_list.len();
        self.shopping_list.retain(|i| i != item);
        self.shopping_list.len() != before
    }

    pub fn in_shopping_list(&self, item: &str) -> bool {
        self.shopping_list.iter().any(|i| i == item)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Construct a new [`SharedSession`] on the Home screen.
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(SessionState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Difficulty;

    fn recipe(id: &str, steps: &[&str]) -> Recipe {
        Recipe {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            prep_time: 5.0,
            calories: 100.0,
            difficulty: Difficulty::Medium,
            dietary_tags: vec!["Vegan".into()],
            ingredients: Vec::new(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            image_url: None,
        }
    }

    #[test]
    fn new_session_is_on_home_with_all_diet() {
        let st = SessionState::default();
        assert_eq!(st.screen, Screen::Home);
        assert!(!st.loading);
        assert_eq!(st.selected_diet, "All");
        assert!(st.current_recipe.is_none());
        assert!(st.notice.is_none());
        assert_eq!(st.loading_text, "Analyzing your fridge...");
    }

    #[test]
    fn shopping_list_never_duplicates() {
        let mut st = SessionState::new();
        assert!(st.add_to_shopping_list("Milk"));
        assert!(!st.add_to_shopping_list("Milk"));
        assert!(st.add_to_shopping_list("milk"));
        assert_eq!(st.shopping_list, vec!["Milk", "milk"]);
    }

    #[test]
    fn remove_then_add_restores_single_entry() {
        let mut st = SessionState::new();
        st.add_to_shopping_list("Eggs");
        st.add_to_shopping_list("Butter");
        assert!(st.remove_from_shopping_list("Eggs"));
        assert!(!st.remove_from_shopping_list("Eggs"));
        st.add_to_shopping_list("Eggs");
        assert_eq!(st.shopping_list, vec!["Butter", "Eggs"]);
    }

    #[test]
    fn current_step_follows_cursor() {
        let mut st = SessionState::new();
        assert!(st.current_step().is_none());
        assert_eq!(st.step_count(), 0);

        st.current_recipe = Some(recipe("r", &["a", "b"]));
        assert_eq!(st.current_step(), Some("a"));
        assert!(!st.is_last_step());
        st.current_step_index = 1;
        assert_eq!(st.current_step(), Some("b"));
        assert!(st.is_last_step());
    }

    #[test]
    fn filtered_recipes_uses_selected_diet() {
        let mut st = SessionState::new();
        st.recipes = vec![recipe("a", &["x"]), recipe("b", &["y"])];
        assert_eq!(st.filtered_recipes().len(), 2);
        st.selected_diet = "keto".into();
        assert!(st.filtered_recipes().is_empty());
        st.selected_diet = "vegan".into();
        assert_eq!(st.filtered_recipes().len(), 2);
        // Filtering leaves the stored list alone.
        assert_eq!(st.recipes.len(), 2);
    }

    #[test]
    fn only_recipes_and_cooking_accept_scan_results() {
        assert!(Screen::Recipes.accepts_scan_result());
        assert!(Screen::Cooking.accepts_scan_result());
        assert!(!Screen::Home.accepts_scan_result());
        assert!(!Screen::Scanning.accepts_scan_result());
        assert!(!Screen::Shopping.accepts_scan_result());
    }

    #[test]
    fn shared_session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedSession>();
    }

    #[test]
    fn shared_session_can_be_cloned_and_mutated() {
        let session = new_shared_session();
        let session2 = Arc::clone(&session);

        session.lock().unwrap().screen = Screen::Shopping;
        assert_eq!(session2.lock().unwrap().screen, Screen::Shopping);
    }
}
