//! # AI Gateway
//!
//! The boundary around the hosted vision/text model. The rest of the crate
//! only sees two narrow capabilities:
//!
//! - [`IngredientExtractor`]: photo → ingredient names
//! - [`RecipeGenerator`]: ingredients + preferences → three recipes
//!
//! [`GeminiGateway`] implements both against the Gemini `generateContent`
//! endpoint. Every failure is reported as a [`FridgeError`] carrying a
//! localized message; nothing is retried or cached.

pub mod gemini;
pub mod prompts;
pub mod sanitize;
pub mod schema;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::capture::CapturedImage;
use crate::errors::FridgeError;
use crate::model::{DietaryPreference, Ingredient, Recipe};

pub use gemini::GeminiGateway;

/// Everything recipe generation needs from the session
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRequest {
    pub ingredients: Vec<Ingredient>,
    pub dietary_preference: DietaryPreference,
    /// Free text, blank when the user has no allergies
    pub allergies: String,
    /// Date the expiring-soon subset is computed against
    pub today: NaiveDate,
    /// Language of the prompt and of the generated recipes
    pub language: String,
}

/// Identifies the food items visible in a photo
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientExtractor: Send + Sync {
    /// Ingredient names, trimmed and non-blank, in the language given
    async fn extract_ingredients(
        &self,
        image: &CapturedImage,
        language: &str,
    ) -> Result<Vec<String>, FridgeError>;
}

/// Produces recipes from the tracked ingredients
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Sanitized recipes; see [`sanitize::sanitize_recipes`]
    async fn generate_recipes(&self, request: &RecipeRequest) -> Result<Vec<Recipe>, FridgeError>;
}
