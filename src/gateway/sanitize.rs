//! # Response Sanitization
//!
//! The model is asked for structured JSON, but fields can still be missing,
//! blank or of the wrong type. Sanitization turns whatever came back into
//! well-formed values:
//!
//! - empty answer text → empty list
//! - `usedIngredients`, `missingIngredients`, `instructions` → always present
//! - blank or duplicate `id` → `recipe-<index>` (response order)
//! - unknown `difficulty` → Medium
//! - negative or non-numeric `calories` → dropped
//!
//! Only an answer whose top level has the wrong shape is an error.
//! Sanitizing already-sanitized recipes leaves them unchanged.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::model::{Difficulty, Recipe};

/// Parse the ingredient extraction answer into trimmed, non-blank names
pub fn parse_ingredient_response(text: &str) -> Result<Vec<String>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON answer: {}", e))?;
    let object = value
        .as_object()
        .ok_or_else(|| "answer is not a JSON object".to_string())?;

    match object.get("ingredients") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(clean_strings(items)),
        Some(other) => Err(format!("'ingredients' is not a list: {}", other)),
    }
}

/// Parse the recipe generation answer and sanitize every recipe
pub fn parse_recipe_response(text: &str) -> Result<Vec<Recipe>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON answer: {}", e))?;
    let items = value
        .as_array()
        .ok_or_else(|| "answer is not a JSON array".to_string())?;

    let objects = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .ok_or_else(|| format!("recipe {} is not a JSON object", index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sanitize_recipes(objects))
}

/// Sanitize raw recipe objects, in response order
pub fn sanitize_recipes<'a>(raw: impl IntoIterator<Item = &'a Map<String, Value>>) -> Vec<Recipe> {
    let mut seen_ids = HashSet::new();

    raw.into_iter()
        .enumerate()
        .map(|(index, object)| {
            let id = unique_id(text_field(object, "id"), index, &mut seen_ids);
            Recipe {
                id,
                title: text_field(object, "title"),
                description: text_field(object, "description"),
                used_ingredients: list_field(object, "usedIngredients"),
                missing_ingredients: list_field(object, "missingIngredients"),
                instructions: list_field(object, "instructions"),
                prep_time: text_field(object, "prepTime"),
                difficulty: object
                    .get("difficulty")
                    .and_then(Value::as_str)
                    .and_then(Difficulty::from_label)
                    .unwrap_or_default(),
                calories: calories_field(object),
            }
        })
        .collect()
}

fn unique_id(candidate: String, index: usize, seen: &mut HashSet<String>) -> String {
    let id = if candidate.is_empty() || seen.contains(&candidate) {
        let mut synthesized = format!("recipe-{}", index);
        let mut suffix = 1;
        while seen.contains(&synthesized) {
            synthesized = format!("recipe-{}-{}", index, suffix);
            suffix += 1;
        }
        synthesized
    } else {
        candidate
    };

    seen.insert(id.clone());
    id
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => clean_strings(items),
        _ => Vec::new(),
    }
}

fn clean_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn calories_field(object: &Map<String, Value>) -> Option<u32> {
    let kcal = match object.get("calories")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !kcal.is_finite() || kcal < 0.0 {
        return None;
    }

    Some(kcal.round().min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitize_value(value: Value) -> Vec<Recipe> {
        parse_recipe_response(&value.to_string()).unwrap()
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let recipes = sanitize_value(json!([{
            "id": "a",
            "title": "Menemen",
            "description": "Eggs and peppers",
            "usedIngredients": ["egg", "pepper"],
            "prepTime": "15 min",
            "difficulty": "Kolay"
        }]));

        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].missing_ingredients.is_empty());
        assert!(recipes[0].instructions.is_empty());
        assert_eq!(recipes[0].used_ingredients, vec!["egg", "pepper"]);
        assert_eq!(recipes[0].difficulty, Difficulty::Easy);
        assert_eq!(recipes[0].calories, None);
    }

    #[test]
    fn test_second_recipe_without_id_gets_index_id() {
        let recipes = sanitize_value(json!([
            { "id": "first", "title": "A" },
            { "title": "B" },
            { "id": "   ", "title": "C" }
        ]));

        assert_eq!(recipes[0].id, "first");
        assert_eq!(recipes[1].id, "recipe-1");
        assert_eq!(recipes[2].id, "recipe-2");
    }

    #[test]
    fn test_duplicate_ids_are_made_unique() {
        let recipes = sanitize_value(json!([
            { "id": "recipe-1", "title": "A" },
            { "id": "recipe-1", "title": "B" }
        ]));

        assert_eq!(recipes[0].id, "recipe-1");
        assert_eq!(recipes[1].id, "recipe-1-1");
    }

    #[test]
    fn test_unknown_difficulty_and_bad_calories() {
        let recipes = sanitize_value(json!([
            { "id": "a", "difficulty": "Extreme", "calories": -20 },
            { "id": "b", "difficulty": "hard", "calories": 349.6 },
            { "id": "c", "calories": "410" }
        ]));

        assert_eq!(recipes[0].difficulty, Difficulty::Medium);
        assert_eq!(recipes[0].calories, None);
        assert_eq!(recipes[1].difficulty, Difficulty::Hard);
        assert_eq!(recipes[1].calories, Some(350));
        assert_eq!(recipes[2].calories, Some(410));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_value(json!([
            { "title": "  Soup ", "usedIngredients": ["leek", " ", 4], "difficulty": "Zor" },
            { "id": "recipe-0", "instructions": ["Boil", ""], "calories": 120.2 },
            { "id": "x", "missingIngredients": ["rice"] }
        ]));

        let serialized = serde_json::to_string(&once).unwrap();
        let twice = parse_recipe_response(&serialized).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_answer_is_empty_list() {
        assert!(parse_recipe_response("").unwrap().is_empty());
        assert!(parse_recipe_response("  \n").unwrap().is_empty());
        assert!(parse_ingredient_response("").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        assert!(parse_recipe_response(r#"{"recipes": []}"#).is_err());
        assert!(parse_recipe_response(r#"[1, 2]"#).is_err());
        assert!(parse_recipe_response("not json").is_err());
        assert!(parse_ingredient_response(r#"["egg"]"#).is_err());
        assert!(parse_ingredient_response(r#"{"ingredients": "egg"}"#).is_err());
    }

    #[test]
    fn test_ingredient_names_are_cleaned() {
        let names =
            parse_ingredient_response(r#"{"ingredients": [" Yumurta ", "", "Ispanak", null]}"#)
                .unwrap();
        assert_eq!(names, vec!["Yumurta", "Ispanak"]);

        assert!(parse_ingredient_response(r#"{}"#).unwrap().is_empty());
    }
}
