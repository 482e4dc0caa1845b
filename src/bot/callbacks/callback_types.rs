//! Callback data carried by inline keyboard buttons

use crate::model::DietaryPreference;

/// A button press, decoded from its callback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Start,
    RemoveIngredient(usize),
    SetExpiry(usize),
    Diet(DietaryPreference),
    Allergies,
    Generate,
    SelectRecipe(usize),
    Back,
    EditIngredients,
    Share,
    Order(usize),
    DismissError,
    NewPhoto,
}

impl CallbackAction {
    /// Encode as callback data (at most 64 bytes)
    pub fn data(&self) -> String {
        match self {
            CallbackAction::Start => "start".to_string(),
            CallbackAction::RemoveIngredient(i) => format!("remove_{}", i),
            CallbackAction::SetExpiry(i) => format!("expiry_{}", i),
            CallbackAction::Diet(diet) => format!("diet_{}", diet.key()),
            CallbackAction::Allergies => "allergies".to_string(),
            CallbackAction::Generate => "generate".to_string(),
            CallbackAction::SelectRecipe(i) => format!("recipe_{}", i),
            CallbackAction::Back => "back".to_string(),
            CallbackAction::EditIngredients => "edit_ingredients".to_string(),
            CallbackAction::Share => "share".to_string(),
            CallbackAction::Order(i) => format!("order_{}", i),
            CallbackAction::DismissError => "dismiss_error".to_string(),
            CallbackAction::NewPhoto => "new_photo".to_string(),
        }
    }

    /// Decode callback data; unknown or malformed data yields `None`
    pub fn parse(data: &str) -> Option<Self> {
        let index = |rest: &str| rest.parse::<usize>().ok();

        match data {
            "start" => return Some(CallbackAction::Start),
            "allergies" => return Some(CallbackAction::Allergies),
            "generate" => return Some(CallbackAction::Generate),
            "back" => return Some(CallbackAction::Back),
            "edit_ingredients" => return Some(CallbackAction::EditIngredients),
            "share" => return Some(CallbackAction::Share),
            "dismiss_error" => return Some(CallbackAction::DismissError),
            "new_photo" => return Some(CallbackAction::NewPhoto),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("remove_") {
            index(rest).map(CallbackAction::RemoveIngredient)
        } else if let Some(rest) = data.strip_prefix("expiry_") {
            index(rest).map(CallbackAction::SetExpiry)
        } else if let Some(rest) = data.strip_prefix("diet_") {
            DietaryPreference::from_key(rest).map(CallbackAction::Diet)
        } else if let Some(rest) = data.strip_prefix("recipe_") {
            index(rest).map(CallbackAction::SelectRecipe)
        } else if let Some(rest) = data.strip_prefix("order_") {
            index(rest).map(CallbackAction::Order)
        } else {
            None
        }
    }

    /// Label used for spans and metrics
    pub fn name(&self) -> &'static str {
        match self {
            CallbackAction::Start => "start",
            CallbackAction::RemoveIngredient(_) => "remove_ingredient",
            CallbackAction::SetExpiry(_) => "set_expiry",
            CallbackAction::Diet(_) => "set_diet",
            CallbackAction::Allergies => "set_allergies",
            CallbackAction::Generate => "generate",
            CallbackAction::SelectRecipe(_) => "select_recipe",
            CallbackAction::Back => "back",
            CallbackAction::EditIngredients => "edit_ingredients",
            CallbackAction::Share => "share",
            CallbackAction::Order(_) => "order",
            CallbackAction::DismissError => "dismiss_error",
            CallbackAction::NewPhoto => "new_photo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_parses_back() {
        let actions = [
            CallbackAction::Start,
            CallbackAction::RemoveIngredient(3),
            CallbackAction::SetExpiry(0),
            CallbackAction::Diet(DietaryPreference::GlutenFree),
            CallbackAction::SelectRecipe(2),
            CallbackAction::Order(1),
            CallbackAction::NewPhoto,
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.data()), Some(action));
        }
    }

    #[test]
    fn test_rejects_malformed_data() {
        assert_eq!(CallbackAction::parse("remove_"), None);
        assert_eq!(CallbackAction::parse("remove_-1"), None);
        assert_eq!(CallbackAction::parse("diet_keto"), None);
        assert_eq!(CallbackAction::parse("edit_0"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
