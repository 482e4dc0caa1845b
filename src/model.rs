//! Ingredient and recipe records shared by the gateway, the session and the bot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A food item found in the fridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl Ingredient {
    /// Create an ingredient with no category and no expiry date
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            expiry_date: None,
        }
    }

    pub fn with_expiry(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }
}

/// Recipe difficulty. Display labels come from the localization bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse a difficulty label as returned by the model.
    ///
    /// Accepts the English and Turkish labels, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" | "kolay" => Some(Difficulty::Easy),
            "medium" | "orta" => Some(Difficulty::Medium),
            "hard" | "zor" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Localization key for the display label
    pub fn message_key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty-easy",
            Difficulty::Medium => "difficulty-medium",
            Difficulty::Hard => "difficulty-hard",
        }
    }
}

/// A generated recipe. Immutable once produced by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub used_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    pub difficulty: Difficulty,
    pub calories: Option<u32>,
}

impl Recipe {
    /// True when every ingredient of the recipe is already in the fridge
    pub fn is_complete(&self) -> bool {
        self.missing_ingredients.is_empty()
    }

    /// File name used when the recipe card is exported
    pub fn card_file_name(&self) -> String {
        format!("fridgelens-{}.png", self.id)
    }
}

/// Dietary preference applied to recipe generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DietaryPreference {
    #[default]
    All,
    Vegetarian,
    Vegan,
    GlutenFree,
    LowCarb,
    HighProtein,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 6] = [
        DietaryPreference::All,
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::LowCarb,
        DietaryPreference::HighProtein,
    ];

    /// Stable key used in callback data
    pub fn key(&self) -> &'static str {
        match self {
            DietaryPreference::All => "all",
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten_free",
            DietaryPreference::LowCarb => "low_carb",
            DietaryPreference::HighProtein => "high_protein",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pref| pref.key() == key)
    }

    /// Localization key for the display label
    pub fn message_key(&self) -> &'static str {
        match self {
            DietaryPreference::All => "diet-all",
            DietaryPreference::Vegetarian => "diet-vegetarian",
            DietaryPreference::Vegan => "diet-vegan",
            DietaryPreference::GlutenFree => "diet-gluten-free",
            DietaryPreference::LowCarb => "diet-low-carb",
            DietaryPreference::HighProtein => "diet-high-protein",
        }
    }

    pub fn is_restricted(&self) -> bool {
        *self != DietaryPreference::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_label() {
        assert_eq!(Difficulty::from_label("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label(" kolay "), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("ORTA"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("Zor"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("impossible"), None);
    }

    #[test]
    fn test_dietary_preference_keys_round_trip() {
        for pref in DietaryPreference::ALL {
            assert_eq!(DietaryPreference::from_key(pref.key()), Some(pref));
        }
        assert_eq!(DietaryPreference::from_key("carnivore"), None);
        assert!(!DietaryPreference::All.is_restricted());
        assert!(DietaryPreference::Vegan.is_restricted());
    }

    #[test]
    fn test_ingredient_serializes_iso_date() {
        let ingredient = Ingredient::new("milk")
            .with_expiry(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        let json = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(json["name"], "milk");
        assert_eq!(json["expiryDate"], "2025-03-09");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_recipe_card_file_name() {
        let recipe = Recipe {
            id: "recipe-2".to_string(),
            title: "Omelette".to_string(),
            description: String::new(),
            used_ingredients: vec![],
            missing_ingredients: vec!["chives".to_string()],
            instructions: vec![],
            prep_time: "10 min".to_string(),
            difficulty: Difficulty::Easy,
            calories: None,
        };
        assert_eq!(recipe.card_file_name(), "fridgelens-recipe-2.png");
        assert!(!recipe.is_complete());
    }
}
