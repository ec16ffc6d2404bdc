//! Recipe analysis client.
//!
//! This module provides:
//! * [`RecipeAnalyzer`]: async trait implemented by every analysis backend.
//! * [`GeminiAnalyzer`]: Gemini `generateContent` backend.
//! * [`PromptBuilder`]: instruction text and JSON response schema.
//! * [`parse_analysis`]: reply validation; rejects any incomplete recipe.
//! * [`AnalysisError`]: error variants for analysis requests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use fridge_chef::analysis::{GeminiAnalyzer, RecipeAnalyzer};
//! use fridge_chef::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let analyzer = GeminiAnalyzer::from_config(&config.analysis);
//!
//!     let jpeg = std::fs::read("fridge.jpg").unwrap();
//!     let analysis = analyzer.analyze(&jpeg).await.unwrap();
//!     for recipe in &analysis.recipes {
//!         println!("{} ({} min)", recipe.name, recipe.prep_time);
//!     }
//! }
//! ```

pub mod client;
pub mod parse;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{AnalysisError, GeminiAnalyzer, RecipeAnalyzer};
pub use parse::{extract_json, parse_analysis};
pub use prompt::{PromptBuilder, REQUIRED_RECIPE_FIELDS};
