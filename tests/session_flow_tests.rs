//! # Session Flow Tests
//!
//! End-to-end walks through the fridge session: photo → ingredients →
//! recipes → detail, using in-process gateway doubles.


use chrono::NaiveDate;
use fridge_lens::gateway::sanitize::parse_recipe_response;
use fridge_lens::model::{DietaryPreference, Difficulty};
use fridge_lens::session::{FridgeSession, Phase, TransitionError, View};
use fridge_lens::urgency::{expiring_soon, urgency_on, UrgencyLevel};
use test_helpers::{
    sample_image, sample_recipe, FixedExtractor, RecordingGenerator, RAW_RECIPES_JSON,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
    }

    /// A session sitting on the ingredient editor with the given names
    async fn session_with_ingredients(names: &[&str]) -> FridgeSession {
        let mut session = FridgeSession::new("en");
        session.start().expect("start from home");
        session
            .begin_analysis(sample_image())
            .expect("capture from camera");
        session
            .analyze(&FixedExtractor::returning(names))
            .await
            .expect("analysis runs while analyzing");
        session
    }

    #[tokio::test]
    async fn test_photo_to_recipe_detail() {
        let mut session = session_with_ingredients(&["egg", "spinach", "cheese"]).await;
        assert_eq!(session.phase(), Phase::Ingredients);
        assert_eq!(session.ingredients().len(), 3);
        assert!(session.ingredients().iter().all(|i| i.expiry_date.is_none()));

        // Spinach goes off today
        session.set_expiry(1, Some(today())).expect("valid index");
        assert_eq!(
            urgency_on(session.ingredients()[1].expiry_date, today()),
            UrgencyLevel::Critical
        );
        session.set_dietary_preference(DietaryPreference::Vegetarian);

        let recipes = parse_recipe_response(RAW_RECIPES_JSON).expect("well-formed answer");
        let generator = RecordingGenerator::returning(recipes);
        session
            .generate(&generator, today())
            .await
            .expect("generation allowed");

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].dietary_preference, DietaryPreference::Vegetarian);
        assert_eq!(
            expiring_soon(&requests[0].ingredients, requests[0].today),
            vec!["spinach".to_string()]
        );

        assert_eq!(session.view(), View::RecipeList);
        assert_eq!(session.recipes().len(), 3);
        for recipe in session.recipes() {
            assert!(Difficulty::ALL.contains(&recipe.difficulty));
        }

        session.select_recipe(0).expect("first recipe exists");
        assert_eq!(session.view(), View::RecipeDetail { sharing: false });
        assert_eq!(
            session.selected_recipe().map(|r| r.title.as_str()),
            Some("Spinach Frittata")
        );

        session.back().expect("back to list");
        assert_eq!(session.view(), View::RecipeList);
        assert!(session.selected_recipe().is_none());
    }

    #[tokio::test]
    async fn test_failed_analysis_returns_home_with_error() {
        let mut session = FridgeSession::new("en");
        session.start().expect("start from home");
        session
            .begin_analysis(sample_image())
            .expect("capture from camera");
        session
            .analyze(&FixedExtractor::failing("Could not read the photo"))
            .await
            .expect("analysis runs while analyzing");

        assert_eq!(session.phase(), Phase::Home);
        assert!(session.ingredients().is_empty());
        assert!(session.error().is_some_and(|e| !e.is_empty()));

        session.dismiss_error();
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_ingredients() {
        let mut session = session_with_ingredients(&["egg"]).await;
        let generator = RecordingGenerator::failing("The kitchen is closed");

        session
            .generate(&generator, today())
            .await
            .expect("generation allowed");

        assert_eq!(session.phase(), Phase::Ingredients);
        assert_eq!(session.ingredients().len(), 1);
        assert!(session.recipes().is_empty());
        assert_eq!(session.error(), Some("The kitchen is closed"));
    }

    #[tokio::test]
    async fn test_removing_every_ingredient_blocks_generation() {
        let mut session = session_with_ingredients(&["egg", "milk"]).await;
        session.remove_ingredient(0).expect("valid index");
        session.remove_ingredient(0).expect("valid index");
        assert!(!session.can_generate());

        let generator = RecordingGenerator::returning(vec![sample_recipe("r1", "Soup")]);
        let result = session.generate(&generator, today()).await;

        assert_eq!(result, Err(TransitionError::NoIngredients));
        assert!(generator.requests().is_empty());
        assert_eq!(session.phase(), Phase::Ingredients);
    }

    #[tokio::test]
    async fn test_edit_and_regenerate_keeps_preferences() {
        let mut session = session_with_ingredients(&["egg", "rice"]).await;
        session.set_dietary_preference(DietaryPreference::GlutenFree);
        session.set_allergies("peanuts");

        let generator = RecordingGenerator::returning(vec![sample_recipe("r1", "Fried Rice")]);
        session.generate(&generator, today()).await.expect("first run");
        session.edit_ingredients().expect("list → editor");
        session.remove_ingredient(1).expect("valid index");
        session.generate(&generator, today()).await.expect("second run");

        let requests = generator.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].ingredients.len(), 1);
        assert_eq!(requests[1].allergies, "peanuts");
        assert_eq!(requests[1].dietary_preference, DietaryPreference::GlutenFree);
    }

    #[tokio::test]
    async fn test_reset_from_recipes_clears_session_data() {
        let mut session = session_with_ingredients(&["egg"]).await;
        session.set_allergies("shellfish");
        let generator = RecordingGenerator::returning(vec![sample_recipe("r1", "Eggs")]);
        session.generate(&generator, today()).await.expect("generation");
        session.select_recipe(0).expect("recipe exists");

        session.reset();

        assert_eq!(session.phase(), Phase::Home);
        assert!(session.ingredients().is_empty());
        assert!(session.recipes().is_empty());
        assert!(session.image().is_none());
        assert_eq!(session.allergies(), "shellfish");
    }

    #[tokio::test]
    async fn test_actions_out_of_order_are_rejected() {
        let mut session = FridgeSession::new("en");

        assert!(matches!(
            session.begin_analysis(sample_image()),
            Err(TransitionError::InvalidTransition { from: Phase::Home, .. })
        ));
        assert!(session.select_recipe(0).is_err());
        assert!(session.back().is_err());
        assert_eq!(session.phase(), Phase::Home);
    }
}
