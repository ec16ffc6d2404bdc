//! Model reply parsing and validation.
//!
//! A reply is accepted only as a whole: if any recipe is incomplete or
//! invalid, the entire analysis is rejected.

use std::collections::HashSet;

use crate::analysis::AnalysisError;
use crate::recipe::FridgeAnalysis;

/// Strip an optional Markdown code fence around the JSON document.
///
/// Models sometimes wrap JSON in ```` ```json ```` even when asked for
/// `application/json`.
///
/// ```
/// use fridge_chef::analysis::extract_json;
///
/// assert_eq!(extract_json("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(extract_json("  {\"a\":1} "), "{\"a\":1}");
/// ```
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_fence) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening fence line.
    let body = match after_fence.find('\n') {
        Some(newline) => &after_fence[newline + 1..],
        None => after_fence,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and validate the model's text output into a [`FridgeAnalysis`].
///
/// # Errors
///
/// * [`AnalysisError::NotJson`]: the text is not a JSON document.
/// * [`AnalysisError::Malformed`]: valid JSON that misses a required field,
///   has a wrongly typed value, or breaks a recipe invariant.
pub fn parse_analysis(text: &str) -> Result<FridgeAnalysis, AnalysisError> {
    let json = extract_json(text);

    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| AnalysisError::NotJson(e.to_string()))?;

    let analysis: FridgeAnalysis =
        serde_json::from_value(value).map_err(|e| AnalysisError::Malformed(e.to_string()))?;

    let mut seen = HashSet::new();
    for recipe in &analysis.recipes {
        recipe.validate().map_err(AnalysisError::Malformed)?;
        if !seen.insert(recipe.id.as_str()) {
            return Err(AnalysisError::Malformed(format!(
                "duplicate recipe id {}",
                recipe.id
            )));
        }
    }

    Ok(analysis)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
