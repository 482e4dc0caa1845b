//! # Session State Machine
//!
//! One [`FridgeSession`] per chat drives the whole flow:
//!
//! ```text
//!  Home ──start──► Camera ──frame──► Analyzing ──ok──► Ingredients ──generate──► GeneratingRecipes
//!   ▲               │  ▲                 │                ▲    ▲                      │      │
//!   │               └──┘ capture failed  │ failed         │    └──────── failed ──────┘      │ ok
//!   └────────────────────────────────────┘                │                                  ▼
//!                                                         └──── edit ──── Recipes (list ⇄ detail)
//! ```
//!
//! The screen is a single tagged value; the recipe detail view carries the
//! selected recipe and its sharing flag, so "sharing" cannot exist outside
//! the detail view. The error toast is orthogonal to the screen: failures set
//! it, `dismiss_error` clears it, and it never causes a transition of its own.
//!
//! Gateway calls are split into `begin_*` / `finish_*` pairs so the caller
//! can persist the busy state while the call is in flight; `analyze` and
//! `generate` run both halves against a gateway capability.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::capture::CapturedImage;
use crate::errors::FridgeError;
use crate::gateway::{IngredientExtractor, RecipeGenerator, RecipeRequest};
use crate::localization::DEFAULT_LANGUAGE;
use crate::model::{DietaryPreference, Ingredient, Recipe};
use crate::observability;
use crate::share::ShareOutcome;

#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Home,
    Camera,
    Analyzing,
    Ingredients,
    GeneratingRecipes,
    Recipes(RecipeView),
}

#[derive(Debug, Clone, PartialEq)]
enum RecipeView {
    List,
    Detail { recipe: Recipe, sharing: bool },
}

/// Discriminant of the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Home,
    Camera,
    Analyzing,
    Ingredients,
    GeneratingRecipes,
    Recipes,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Home => "home",
            Phase::Camera => "camera",
            Phase::Analyzing => "analyzing",
            Phase::Ingredients => "ingredients",
            Phase::GeneratingRecipes => "generating_recipes",
            Phase::Recipes => "recipes",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user sees for the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Capture,
    /// Spinner while a gateway call runs (`Analyzing` or `GeneratingRecipes`)
    Loading(Phase),
    IngredientEditor,
    RecipeList,
    RecipeDetail { sharing: bool },
}

/// A user action that is not valid in the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The action does not exist on the current screen
    InvalidTransition { from: Phase, action: &'static str },
    /// Recipe generation needs at least one ingredient
    NoIngredients,
    IndexOutOfRange { index: usize, len: usize },
    /// The same kind of action is already running
    ActionInProgress,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::InvalidTransition { from, action } => {
                write!(f, "[TRANSITION] '{}' is not available in {}", action, from)
            }
            TransitionError::NoIngredients => {
                write!(f, "[TRANSITION] recipe generation needs at least one ingredient")
            }
            TransitionError::IndexOutOfRange { index, len } => {
                write!(f, "[TRANSITION] index {} out of range (len {})", index, len)
            }
            TransitionError::ActionInProgress => write!(f, "[TRANSITION] action already in progress"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Per-chat application state
#[derive(Debug, Clone, PartialEq)]
pub struct FridgeSession {
    screen: Screen,
    image: Option<Arc<CapturedImage>>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    dietary_preference: DietaryPreference,
    allergies: String,
    error: Option<String>,
    language: String,
}

impl Default for FridgeSession {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl FridgeSession {
    pub fn new(language: &str) -> Self {
        Self {
            screen: Screen::Home,
            image: None,
            ingredients: Vec::new(),
            recipes: Vec::new(),
            dietary_preference: DietaryPreference::default(),
            allergies: String::new(),
            error: None,
            language: language.to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.screen {
            Screen::Home => Phase::Home,
            Screen::Camera => Phase::Camera,
            Screen::Analyzing => Phase::Analyzing,
            Screen::Ingredients => Phase::Ingredients,
            Screen::GeneratingRecipes => Phase::GeneratingRecipes,
            Screen::Recipes(_) => Phase::Recipes,
        }
    }

    pub fn view(&self) -> View {
        match &self.screen {
            Screen::Home => View::Home,
            Screen::Camera => View::Capture,
            Screen::Analyzing => View::Loading(Phase::Analyzing),
            Screen::Ingredients => View::IngredientEditor,
            Screen::GeneratingRecipes => View::Loading(Phase::GeneratingRecipes),
            Screen::Recipes(RecipeView::List) => View::RecipeList,
            Screen::Recipes(RecipeView::Detail { sharing, .. }) => View::RecipeDetail {
                sharing: *sharing,
            },
        }
    }

    /// Whether a gateway call or a share is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self.screen,
            Screen::Analyzing
                | Screen::GeneratingRecipes
                | Screen::Recipes(RecipeView::Detail { sharing: true, .. })
        )
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        match &self.screen {
            Screen::Recipes(RecipeView::Detail { recipe, .. }) => Some(recipe),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_deref()
    }

    pub fn dietary_preference(&self) -> DietaryPreference {
        self.dietary_preference
    }

    pub fn allergies(&self) -> &str {
        &self.allergies
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn set_error(&mut self, error: &FridgeError) {
        observability::record_error_metrics(error.kind(), "session");
        self.error = Some(error.user_message().to_string());
    }

    fn transition(&mut self, to: Screen) {
        let from = self.phase();
        self.screen = to;
        let to = self.phase();
        if from != to {
            debug!(from = %from, to = %to, "Session transition");
            observability::record_session_transition(from.as_str(), to.as_str());
        }
    }

    fn invalid(&self, action: &'static str) -> TransitionError {
        if self.is_busy() {
            TransitionError::ActionInProgress
        } else {
            TransitionError::InvalidTransition {
                from: self.phase(),
                action,
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), TransitionError> {
        if index >= self.ingredients.len() {
            return Err(TransitionError::IndexOutOfRange {
                index,
                len: self.ingredients.len(),
            });
        }
        Ok(())
    }

    /// Home → Camera, starting a new capture session
    pub fn start(&mut self) -> Result<(), TransitionError> {
        if self.screen != Screen::Home {
            return Err(self.invalid("start"));
        }

        self.image = None;
        self.ingredients.clear();
        self.recipes.clear();
        self.transition(Screen::Camera);
        Ok(())
    }

    /// The camera or file could not produce a frame; stay on the camera screen
    pub fn capture_failed(&mut self, error: FridgeError) -> Result<(), TransitionError> {
        if self.screen != Screen::Camera {
            return Err(self.invalid("capture_failed"));
        }

        self.set_error(&error);
        Ok(())
    }

    /// Camera → Analyzing with the captured frame
    pub fn begin_analysis(&mut self, image: CapturedImage) -> Result<(), TransitionError> {
        if self.screen != Screen::Camera {
            return Err(self.invalid("capture"));
        }

        self.image = Some(Arc::new(image));
        self.transition(Screen::Analyzing);
        Ok(())
    }

    /// Analyzing → Ingredients on success, → Home with the error toast on failure
    pub fn finish_analysis(
        &mut self,
        result: Result<Vec<String>, FridgeError>,
    ) -> Result<(), TransitionError> {
        if self.screen != Screen::Analyzing {
            return Err(TransitionError::InvalidTransition {
                from: self.phase(),
                action: "finish_analysis",
            });
        }

        match result {
            Ok(names) => {
                self.ingredients = names.into_iter().map(Ingredient::new).collect();
                info!(ingredient_count = self.ingredients.len(), "Ingredients extracted");
                self.transition(Screen::Ingredients);
            }
            Err(error) => {
                self.ingredients.clear();
                self.set_error(&error);
                self.transition(Screen::Home);
            }
        }
        Ok(())
    }

    /// Run ingredient extraction on the captured frame
    pub async fn analyze(
        &mut self,
        extractor: &dyn IngredientExtractor,
    ) -> Result<(), TransitionError> {
        let image = match (&self.screen, &self.image) {
            (Screen::Analyzing, Some(image)) => Arc::clone(image),
            _ => {
                return Err(TransitionError::InvalidTransition {
                    from: self.phase(),
                    action: "analyze",
                })
            }
        };

        let result = extractor.extract_ingredients(&image, &self.language).await;
        self.finish_analysis(result)
    }

    /// Remove the ingredient at `index`; later items shift left
    pub fn remove_ingredient(&mut self, index: usize) -> Result<Ingredient, TransitionError> {
        if self.screen != Screen::Ingredients {
            return Err(self.invalid("remove_ingredient"));
        }
        self.check_index(index)?;

        Ok(self.ingredients.remove(index))
    }

    /// Set or clear the expiry date of the ingredient at `index`
    pub fn set_expiry(
        &mut self,
        index: usize,
        date: Option<NaiveDate>,
    ) -> Result<(), TransitionError> {
        if self.screen != Screen::Ingredients {
            return Err(self.invalid("set_expiry"));
        }
        self.check_index(index)?;

        self.ingredients[index].expiry_date = date;
        Ok(())
    }

    pub fn set_dietary_preference(&mut self, preference: DietaryPreference) {
        self.dietary_preference = preference;
    }

    pub fn set_allergies(&mut self, allergies: impl Into<String>) {
        self.allergies = allergies.into();
    }

    /// Whether "generate recipes" is currently offered
    pub fn can_generate(&self) -> bool {
        self.screen == Screen::Ingredients && !self.ingredients.is_empty()
    }

    /// Ingredients → GeneratingRecipes, returning the request to send
    pub fn begin_generation(&mut self, today: NaiveDate) -> Result<RecipeRequest, TransitionError> {
        if self.screen != Screen::Ingredients {
            return Err(self.invalid("generate"));
        }
        if self.ingredients.is_empty() {
            return Err(TransitionError::NoIngredients);
        }

        let request = RecipeRequest {
            ingredients: self.ingredients.clone(),
            dietary_preference: self.dietary_preference,
            allergies: self.allergies.clone(),
            today,
            language: self.language.clone(),
        };
        self.transition(Screen::GeneratingRecipes);
        Ok(request)
    }

    /// GeneratingRecipes → recipe list on success, → Ingredients with the error toast on failure
    pub fn finish_generation(
        &mut self,
        result: Result<Vec<Recipe>, FridgeError>,
    ) -> Result<(), TransitionError> {
        if self.screen != Screen::GeneratingRecipes {
            return Err(TransitionError::InvalidTransition {
                from: self.phase(),
                action: "finish_generation",
            });
        }

        match result {
            Ok(recipes) => {
                info!(recipe_count = recipes.len(), "Recipes generated");
                self.recipes = recipes;
                self.transition(Screen::Recipes(RecipeView::List));
            }
            Err(error) => {
                self.set_error(&error);
                self.transition(Screen::Ingredients);
            }
        }
        Ok(())
    }

    /// Run recipe generation for the current ingredients and preferences
    pub async fn generate(
        &mut self,
        generator: &dyn RecipeGenerator,
        today: NaiveDate,
    ) -> Result<(), TransitionError> {
        let request = self.begin_generation(today)?;
        let result = generator.generate_recipes(&request).await;
        self.finish_generation(result)
    }

    /// Recipe list → detail view of the recipe at `index`
    pub fn select_recipe(&mut self, index: usize) -> Result<(), TransitionError> {
        if self.screen != Screen::Recipes(RecipeView::List) {
            return Err(self.invalid("select_recipe"));
        }
        let recipe = self
            .recipes
            .get(index)
            .cloned()
            .ok_or(TransitionError::IndexOutOfRange {
                index,
                len: self.recipes.len(),
            })?;

        self.transition(Screen::Recipes(RecipeView::Detail {
            recipe,
            sharing: false,
        }));
        Ok(())
    }

    /// Detail view → recipe list, clearing the selection
    pub fn back(&mut self) -> Result<(), TransitionError> {
        match self.screen {
            Screen::Recipes(RecipeView::Detail { sharing: false, .. }) => {
                self.transition(Screen::Recipes(RecipeView::List));
                Ok(())
            }
            _ => Err(self.invalid("back")),
        }
    }

    /// Recipe list → ingredient editor
    pub fn edit_ingredients(&mut self) -> Result<(), TransitionError> {
        if self.screen != Screen::Recipes(RecipeView::List) {
            return Err(self.invalid("edit_ingredients"));
        }

        self.transition(Screen::Ingredients);
        Ok(())
    }

    /// Mark the detail view as sharing and return the recipe to export
    pub fn begin_share(&mut self) -> Result<Recipe, TransitionError> {
        match &mut self.screen {
            Screen::Recipes(RecipeView::Detail { recipe, sharing }) => {
                if *sharing {
                    return Err(TransitionError::ActionInProgress);
                }
                *sharing = true;
                Ok(recipe.clone())
            }
            _ => Err(self.invalid("share")),
        }
    }

    /// Clear the sharing flag; a failure sets the error toast
    pub fn finish_share(
        &mut self,
        result: Result<ShareOutcome, FridgeError>,
    ) -> Result<Option<ShareOutcome>, TransitionError> {
        let sharing = match &mut self.screen {
            Screen::Recipes(RecipeView::Detail { sharing, .. }) if *sharing => sharing,
            _ => {
                return Err(TransitionError::InvalidTransition {
                    from: self.phase(),
                    action: "finish_share",
                })
            }
        };
        *sharing = false;

        match result {
            Ok(outcome) => Ok(Some(outcome)),
            Err(error) => {
                self.set_error(&error);
                Ok(None)
            }
        }
    }

    /// Back to Home from anywhere; preferences and language are kept
    pub fn reset(&mut self) {
        self.image = None;
        self.ingredients.clear();
        self.recipes.clear();
        self.error = None;
        self.transition(Screen::Home);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockIngredientExtractor, MockRecipeGenerator};
    use crate::model::Difficulty;

    fn jpeg() -> CapturedImage {
        // Minimal JPEG signature is enough for format sniffing
        CapturedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'])
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Recipe {}", id),
            description: String::new(),
            used_ingredients: vec!["egg".to_string()],
            missing_ingredients: vec![],
            instructions: vec![],
            prep_time: "10 min".to_string(),
            difficulty: Difficulty::Easy,
            calories: None,
        }
    }

    fn session_with_ingredients(names: &[&str]) -> FridgeSession {
        let mut session = FridgeSession::default();
        session.start().unwrap();
        session.begin_analysis(jpeg()).unwrap();
        session
            .finish_analysis(Ok(names.iter().map(|n| n.to_string()).collect()))
            .unwrap();
        session
    }

    fn session_with_recipes() -> FridgeSession {
        let mut session = session_with_ingredients(&["egg"]);
        session.begin_generation(today()).unwrap();
        session
            .finish_generation(Ok(vec![recipe("a"), recipe("b")]))
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_is_home() {
        let session = FridgeSession::default();
        assert_eq!(session.phase(), Phase::Home);
        assert_eq!(session.view(), View::Home);
        assert!(session.error().is_none());
        assert!(!session.can_generate());
    }

    #[test]
    fn test_start_clears_previous_session() {
        let mut session = session_with_recipes();
        session.reset();
        session.start().unwrap();

        assert_eq!(session.phase(), Phase::Camera);
        assert!(session.ingredients().is_empty());
        assert!(session.recipes().is_empty());
        assert!(session.image().is_none());
    }

    #[test]
    fn test_capture_failure_stays_on_camera() {
        let mut session = FridgeSession::default();
        session.start().unwrap();
        session
            .capture_failed(FridgeError::CameraAccess("no camera".to_string()))
            .unwrap();

        assert_eq!(session.phase(), Phase::Camera);
        assert_eq!(session.error(), Some("no camera"));
    }

    #[test]
    fn test_analysis_failure_returns_home() {
        let mut session = FridgeSession::default();
        session.start().unwrap();
        session.begin_analysis(jpeg()).unwrap();
        assert_eq!(session.view(), View::Loading(Phase::Analyzing));

        session
            .finish_analysis(Err(FridgeError::Analysis("failed".to_string())))
            .unwrap();

        assert_eq!(session.phase(), Phase::Home);
        assert_eq!(session.error(), Some("failed"));
        assert!(session.ingredients().is_empty());
    }

    #[test]
    fn test_remove_ingredient_shifts_left() {
        let mut session = session_with_ingredients(&["egg", "spinach", "cheese", "milk"]);
        let removed = session.remove_ingredient(1).unwrap();

        assert_eq!(removed.name, "spinach");
        let names: Vec<_> = session.ingredients().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["egg", "cheese", "milk"]);

        assert_eq!(
            session.remove_ingredient(3),
            Err(TransitionError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_set_expiry_by_index() {
        let mut session = session_with_ingredients(&["egg", "spinach"]);
        session.set_expiry(1, Some(today())).unwrap();
        assert_eq!(session.ingredients()[1].expiry_date, Some(today()));
        assert_eq!(session.ingredients()[0].expiry_date, None);

        session.set_expiry(1, None).unwrap();
        assert_eq!(session.ingredients()[1].expiry_date, None);
    }

    #[test]
    fn test_editing_only_on_ingredient_screen() {
        let mut session = session_with_recipes();
        assert!(matches!(
            session.remove_ingredient(0),
            Err(TransitionError::InvalidTransition {
                from: Phase::Recipes,
                ..
            })
        ));
        assert!(session.set_expiry(0, None).is_err());
    }

    #[test]
    fn test_generate_requires_ingredients() {
        let mut session = session_with_ingredients(&["egg"]);
        session.remove_ingredient(0).unwrap();

        assert!(!session.can_generate());
        assert_eq!(
            session.begin_generation(today()),
            Err(TransitionError::NoIngredients)
        );
        assert_eq!(session.phase(), Phase::Ingredients);
    }

    #[test]
    fn test_generation_failure_returns_to_ingredients() {
        let mut session = session_with_ingredients(&["egg"]);
        session.begin_generation(today()).unwrap();
        assert_eq!(
            session.begin_generation(today()),
            Err(TransitionError::ActionInProgress)
        );

        session
            .finish_generation(Err(FridgeError::RecipeGeneration("nope".to_string())))
            .unwrap();

        assert_eq!(session.phase(), Phase::Ingredients);
        assert_eq!(session.error(), Some("nope"));
        assert_eq!(session.ingredients().len(), 1);
    }

    #[test]
    fn test_request_carries_preferences() {
        let mut session = session_with_ingredients(&["egg"]);
        session.set_dietary_preference(DietaryPreference::Vegan);
        session.set_allergies("peanuts");
        session.set_language("tr");

        let request = session.begin_generation(today()).unwrap();
        assert_eq!(request.dietary_preference, DietaryPreference::Vegan);
        assert_eq!(request.allergies, "peanuts");
        assert_eq!(request.language, "tr");
        assert_eq!(request.today, today());
    }

    #[test]
    fn test_select_and_back() {
        let mut session = session_with_recipes();
        assert_eq!(session.view(), View::RecipeList);

        session.select_recipe(1).unwrap();
        assert_eq!(session.selected_recipe().map(|r| r.id.as_str()), Some("b"));
        assert_eq!(session.view(), View::RecipeDetail { sharing: false });

        session.back().unwrap();
        assert_eq!(session.view(), View::RecipeList);
        assert!(session.selected_recipe().is_none());

        assert!(matches!(
            session.select_recipe(5),
            Err(TransitionError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_edit_ingredients_from_list() {
        let mut session = session_with_recipes();
        session.edit_ingredients().unwrap();
        assert_eq!(session.phase(), Phase::Ingredients);
        assert!(session.can_generate());
    }

    #[test]
    fn test_share_busy_flag() {
        let mut session = session_with_recipes();
        assert!(session.begin_share().is_err());

        session.select_recipe(0).unwrap();
        let recipe = session.begin_share().unwrap();
        assert_eq!(recipe.id, "a");
        assert_eq!(session.view(), View::RecipeDetail { sharing: true });
        assert!(session.is_busy());

        assert_eq!(session.begin_share(), Err(TransitionError::ActionInProgress));
        assert_eq!(session.back(), Err(TransitionError::ActionInProgress));

        let outcome = session
            .finish_share(Err(FridgeError::ShareExport("share failed".to_string())))
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(session.view(), View::RecipeDetail { sharing: false });
        assert_eq!(session.error(), Some("share failed"));

        session.begin_share().unwrap();
        assert_eq!(
            session.finish_share(Ok(ShareOutcome::Downloaded)).unwrap(),
            Some(ShareOutcome::Downloaded)
        );
    }

    #[test]
    fn test_error_toast_is_orthogonal() {
        let mut session = FridgeSession::default();
        session.start().unwrap();
        session
            .capture_failed(FridgeError::CameraAccess("first".to_string()))
            .unwrap();
        session
            .capture_failed(FridgeError::CameraAccess("second".to_string()))
            .unwrap();
        assert_eq!(session.error(), Some("second"));

        session.dismiss_error();
        assert!(session.error().is_none());
        assert_eq!(session.phase(), Phase::Camera);
    }

    #[test]
    fn test_reset_keeps_preferences() {
        let mut session = session_with_recipes();
        session.set_dietary_preference(DietaryPreference::GlutenFree);
        session.reset();

        assert_eq!(session.phase(), Phase::Home);
        assert!(session.recipes().is_empty());
        assert_eq!(session.dietary_preference(), DietaryPreference::GlutenFree);
    }

    #[tokio::test]
    async fn test_analyze_with_mock_extractor() {
        let mut extractor = MockIngredientExtractor::new();
        extractor
            .expect_extract_ingredients()
            .withf(|_, language| language == "en")
            .times(1)
            .returning(|_, _| Ok(vec!["egg".to_string(), "spinach".to_string()]));

        let mut session = FridgeSession::default();
        session.start().unwrap();
        session.begin_analysis(jpeg()).unwrap();
        session.analyze(&extractor).await.unwrap();

        assert_eq!(session.phase(), Phase::Ingredients);
        assert_eq!(session.ingredients().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_with_mock_generator() {
        let mut generator = MockRecipeGenerator::new();
        generator
            .expect_generate_recipes()
            .withf(|request| request.ingredients.len() == 1)
            .times(1)
            .returning(|_| Ok(vec![recipe("x")]));

        let mut session = session_with_ingredients(&["egg"]);
        session.generate(&generator, today()).await.unwrap();

        assert_eq!(session.view(), View::RecipeList);
        assert_eq!(session.recipes()[0].id, "x");
    }

    #[tokio::test]
    async fn test_analyze_outside_analyzing_is_rejected() {
        let extractor = MockIngredientExtractor::new();
        let mut session = FridgeSession::default();
        assert!(matches!(
            session.analyze(&extractor).await,
            Err(TransitionError::InvalidTransition { from: Phase::Home, .. })
        ));
    }
}
