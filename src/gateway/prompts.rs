//! Localized instructions sent to the model.

use crate::gateway::RecipeRequest;
use crate::localization::LocalizationManager;
use crate::model::Difficulty;
use crate::urgency::expiring_soon;

/// Instruction accompanying the fridge photo
pub fn extraction_prompt(localization: &LocalizationManager, language: &str) -> String {
    localization.get_message_in_language("prompt-extract-ingredients", language, None)
}

/// Recipe generation prompt.
///
/// Lists every ingredient, flags the expiring-soon subset as priority (the
/// line is left out when nothing is about to expire) and states the diet and
/// allergy constraints.
pub fn recipe_prompt(localization: &LocalizationManager, request: &RecipeRequest) -> String {
    let language = request.language.as_str();

    let ingredients = request
        .ingredients
        .iter()
        .map(|ingredient| ingredient.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let expiring = expiring_soon(&request.ingredients, request.today);
    let priority = if expiring.is_empty() {
        String::new()
    } else {
        localization.get_message_with_args_in_language(
            "prompt-recipes-priority",
            language,
            &[("items", expiring.join(", ").as_str())],
        )
    };

    let diet = localization.get_message_in_language(
        request.dietary_preference.message_key(),
        language,
        None,
    );

    let allergies = if request.allergies.trim().is_empty() {
        localization.get_message_in_language("allergies-none", language, None)
    } else {
        request.allergies.trim().to_string()
    };

    let prompt = localization.get_message_with_args_in_language(
        "prompt-recipes",
        language,
        &[
            ("ingredients", ingredients.as_str()),
            ("priority", priority.as_str()),
            ("diet", diet.as_str()),
            ("allergies", allergies.as_str()),
        ],
    );

    // Drop the blank line left behind by an empty priority line
    prompt
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Difficulty labels the model may answer with, in `language`
pub fn difficulty_labels(localization: &LocalizationManager, language: &str) -> Vec<String> {
    Difficulty::ALL
        .iter()
        .map(|difficulty| localization.get_message_in_language(difficulty.message_key(), language, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DietaryPreference, Ingredient};
    use chrono::{Duration, NaiveDate};

    fn request(language: &str) -> RecipeRequest {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        RecipeRequest {
            ingredients: vec![
                Ingredient::new("egg"),
                Ingredient::new("spinach").with_expiry(today),
                Ingredient::new("cheese").with_expiry(today + Duration::days(20)),
            ],
            dietary_preference: DietaryPreference::Vegetarian,
            allergies: String::new(),
            today,
            language: language.to_string(),
        }
    }

    #[test]
    fn test_recipe_prompt_flags_expiring_items() {
        let localization = LocalizationManager::new().unwrap();
        let prompt = recipe_prompt(&localization, &request("en"));

        assert!(prompt.contains("egg, spinach, cheese"));
        assert!(prompt.contains("MUST BE USED FIRST (expiring soon): spinach."));
        assert!(prompt.contains("Diet: Vegetarian"));
        assert!(prompt.contains("Allergies/excluded foods: None"));
    }

    #[test]
    fn test_priority_line_omitted_when_nothing_expires() {
        let localization = LocalizationManager::new().unwrap();
        let mut req = request("tr");
        req.ingredients = vec![Ingredient::new("yumurta")];
        req.allergies = "Fıstık".to_string();

        let prompt = recipe_prompt(&localization, &req);
        assert!(!prompt.contains("ÖNCELİKLİ"));
        assert!(!prompt.contains("\n\n"));
        assert!(prompt.contains("Alerjiler/Yasaklılar: Fıstık"));
        assert!(prompt.contains("Beslenme Şekli: Vejetaryen"));
    }

    #[test]
    fn test_difficulty_labels_follow_language() {
        let localization = LocalizationManager::new().unwrap();
        assert_eq!(difficulty_labels(&localization, "tr"), vec!["Kolay", "Orta", "Zor"]);
        assert_eq!(difficulty_labels(&localization, "en"), vec!["Easy", "Medium", "Hard"]);
    }
}
