//! Recipe data model shared by the analysis client, the session and the UI.
//!
//! Field names follow the camelCase JSON the vision model is asked to produce
//! (`prepTime`, `dietaryTags`, `isMissing`, …).  Required fields are plain
//! (non-`Option`) so serde rejects a reply that omits them; optional ones carry
//! `#[serde(default)]`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How demanding a recipe is to cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

// ---------------------------------------------------------------------------
// Ingredient
// ---------------------------------------------------------------------------

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    /// `true` when the item was not visible in the fridge photo.
    #[serde(default)]
    pub is_missing: bool,
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A recipe proposed by the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Model-generated identifier, unique within one analysis result.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Preparation time in minutes.
    pub prep_time: f64,
    pub calories: f64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    /// Ordered cooking instructions; never empty once validated.
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    /// Ingredients flagged as not present in the fridge.
    pub fn missing_ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| i.is_missing)
    }

    /// `true` when any dietary tag equals `tag`, ignoring case.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.dietary_tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Check the invariants serde cannot express.
    ///
    /// Returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("recipe has an empty id".into());
        }
        if self.name.trim().is_empty() {
            return Err(format!("recipe {} has an empty name", self.id));
        }
        if !self.prep_time.is_finite() || self.prep_time < 0.0 {
            return Err(format!("recipe {} has invalid prepTime {}", self.id, self.prep_time));
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(format!("recipe {} has invalid calories {}", self.id, self.calories));
        }
        if self.steps.is_empty() {
            return Err(format!("recipe {} has no steps", self.id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FridgeAnalysis
// ---------------------------------------------------------------------------

/// Everything one successful scan produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FridgeAnalysis {
    /// Distinct food items seen in the photo, in model order.
    pub ingredients: Vec<String>,
    pub recipes: Vec<Recipe>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
