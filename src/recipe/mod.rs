//! Recipe data model and the dietary view filter.

pub mod filter;
pub mod model;

pub use filter::{filter_by_diet, ALL_DIETS, DEFAULT_DIETARY_OPTIONS};
pub use model::{Difficulty, FridgeAnalysis, Ingredient, Recipe};
