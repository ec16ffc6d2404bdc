//! Instruction prompt and JSON response schema for fridge analysis.
//!
//! The schema is sent as Gemini's `responseSchema` so the model is
//! constrained to the [`FridgeAnalysis`](crate::recipe::FridgeAnalysis) shape;
//! the reply is still validated locally because the schema is advisory.

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

const INSTRUCTION_HEADER: &str = "\
Analyze this fridge image.
1. Identify all distinct visible food items and ingredients.";

const INSTRUCTION_FOOTER: &str = "\
3. For each recipe, list its ingredients with amounts and set isMissing to true \
for every ingredient that is not visible in the fridge.
4. Provide clear, ordered, step-by-step instructions. Each step is one \
human-readable sentence without a step number.
5. Give every recipe a short unique id, a prepTime in minutes, estimated \
calories per serving, a difficulty of Easy, Medium or Hard, and dietary tags \
such as Vegetarian, Vegan, Keto, Gluten-Free or Low-Carb where they apply.";

/// Fields every recipe in the reply must carry.
pub const REQUIRED_RECIPE_FIELDS: [&str; 7] = [
    "id",
    "name",
    "prepTime",
    "calories",
    "difficulty",
    "ingredients",
    "steps",
];

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the fridge-analysis instruction text and response schema.
///
/// # Example
/// ```rust
/// use fridge_chef::analysis::PromptBuilder;
///
/// let builder = PromptBuilder::new(4);
/// assert!(builder.instructions().contains("exactly 4"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    recipe_count: usize,
}

impl PromptBuilder {
    /// `recipe_count` is the number of recipes the model must propose.
    pub fn new(recipe_count: usize) -> Self {
        Self {
            recipe_count: recipe_count.max(1),
        }
    }

    pub fn recipe_count(&self) -> usize {
        self.recipe_count
    }

    /// The text part sent next to the image.
    pub fn instructions(&self) -> String {
        format!(
            "{INSTRUCTION_HEADER}\n2. Suggest exactly {} unique recipes that can be made \
             primarily from these items.\n{INSTRUCTION_FOOTER}",
            self.recipe_count
        )
    }

    /// Gemini `responseSchema` for a fridge analysis.
    pub fn response_schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "ingredients": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                },
                "recipes": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "id":          { "type": "STRING" },
                            "name":        { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "prepTime":    { "type": "NUMBER" },
                            "calories":    { "type": "NUMBER" },
                            "difficulty":  { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
                            "dietaryTags": { "type": "ARRAY", "items": { "type": "STRING" } },
                            "ingredients": {
                                "type": "ARRAY",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "name":      { "type": "STRING" },
                                        "amount":    { "type": "STRING" },
                                        "isMissing": { "type": "BOOLEAN" }
                                    },
                                    "required": ["name"]
                                }
                            },
                            "steps":    { "type": "ARRAY", "items": { "type": "STRING" } },
                            "imageUrl": { "type": "STRING" }
                        },
                        "required": REQUIRED_RECIPE_FIELDS
                    }
                }
            },
            "required": ["ingredients", "recipes"]
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_cover_every_task() {
        let text = PromptBuilder::new(4).instructions();
        assert!(text.contains("distinct visible food items"));
        assert!(text.contains("exactly 4 unique recipes"));
        assert!(text.contains("isMissing"));
        assert!(text.contains("step-by-step"));
    }

    #[test]
    fn recipe_count_is_at_least_one() {
        assert_eq!(PromptBuilder::new(0).recipe_count(), 1);
    }

    #[test]
    fn schema_requires_recipe_fields() {
        let schema = PromptBuilder::new(4).response_schema();
        let required = schema["properties"]["recipes"]["items"]["required"]
            .as_array()
            .unwrap();
        let names: Vec<_> = required.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(names, REQUIRED_RECIPE_FIELDS.to_vec());
    }

    #[test]
    fn schema_types_use_gemini_names() {
        let schema = PromptBuilder::new(4).response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["ingredients"]["items"]["type"], "STRING");
        assert_eq!(
            schema["properties"]["recipes"]["items"]["properties"]["prepTime"]["type"],
            "NUMBER"
        );
    }
}
