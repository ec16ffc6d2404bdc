//! Dietary filter over the recipe list.
//!
//! The filtered list is never stored; the UI recomputes it from the session's
//! `recipes` and `selected_diet` on every frame.

use super::Recipe;

/// Sentinel diet that disables filtering.  Compared case-sensitively.
pub const ALL_DIETS: &str = "All";

/// Filters offered when the config does not override them.
pub const DEFAULT_DIETARY_OPTIONS: [&str; 6] =
    ["All", "Vegetarian", "Keto", "Vegan", "Gluten-Free", "Low-Carb"];

/// Recipes matching `diet`, in their original order.
///
/// ```
/// use fridge_chef::recipe::{filter_by_diet, ALL_DIETS};
///
/// let recipes = Vec::new();
/// assert!(filter_by_diet(&recipes, ALL_DIETS).is_empty());
/// ```
pub fn filter_by_diet<'a>(recipes: &'a [Recipe], diet: &str) -> Vec<&'a Recipe> {
    if diet == ALL_DIETS {
        return recipes.iter().collect();
    }
    recipes.iter().filter(|r| r.has_tag(diet)).collect()
}
