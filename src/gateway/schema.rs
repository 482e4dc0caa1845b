//! Structured-output schemas sent with each `generateContent` request.

use serde_json::{json, Value};

/// Schema of the ingredient extraction answer: `{ingredients: string[]}`
pub fn ingredient_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ingredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Food and drink items detected in the image"
            }
        },
        "required": ["ingredients"]
    })
}

/// Schema of the recipe generation answer.
///
/// `difficulty_labels` are the labels the model may use, in the prompt
/// language (the sanitizer accepts the labels of every supported language).
pub fn recipe_response_schema(difficulty_labels: &[String]) -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "usedIngredients": string_list,
                "missingIngredients": string_list,
                "instructions": string_list,
                "prepTime": { "type": "STRING" },
                "difficulty": {
                    "type": "STRING",
                    "enum": difficulty_labels
                },
                "calories": { "type": "NUMBER" }
            },
            "required": [
                "id", "title", "description", "usedIngredients",
                "instructions", "prepTime", "difficulty"
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_schema_optional_fields() {
        let schema = recipe_response_schema(&["Kolay".into(), "Orta".into(), "Zor".into()]);
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(!required.contains(&json!("missingIngredients")));
        assert!(!required.contains(&json!("calories")));
        assert!(required.contains(&json!("difficulty")));
        assert_eq!(
            schema["items"]["properties"]["difficulty"]["enum"],
            json!(["Kolay", "Orta", "Zor"])
        );
    }

    #[test]
    fn test_ingredient_schema_requires_list() {
        let schema = ingredient_response_schema();
        assert_eq!(schema["required"], json!(["ingredients"]));
        assert_eq!(schema["properties"]["ingredients"]["type"], "ARRAY");
    }
}
