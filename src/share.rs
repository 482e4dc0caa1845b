//! # Share / Export
//!
//! Delivers a rendered recipe card. A [`ShareTarget`] that can share files
//! gets the card with a caption (the share sheet); any other target saves
//! the file (the download fallback). Either way the caller only learns
//! whether it worked.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::card::raster::{CardFonts, RasterSurface};
use crate::card::{render_recipe_card, CardLabels, RecipeCard, CARD_HEIGHT, CARD_WIDTH};
use crate::errors::FridgeError;
use crate::localization::LocalizationManager;
use crate::model::Recipe;
use crate::observability;

/// Platform share / download mechanism
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether files can go through the share sheet
    fn can_share_files(&self) -> bool;

    async fn share(&self, card: &RecipeCard, title: &str, text: &str) -> Result<(), String>;

    async fn save(&self, card: &RecipeCard) -> Result<(), String>;
}

/// How the card reached the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// File sharing unavailable; the card was downloaded instead
    Downloaded,
}

impl ShareOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareOutcome::Shared => "shared",
            ShareOutcome::Downloaded => "downloaded",
        }
    }
}

/// Localized text used while sharing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessages {
    pub caption: String,
    pub error: String,
}

impl ShareMessages {
    pub fn localized(localization: &LocalizationManager, language: &str, recipe: &Recipe) -> Self {
        Self {
            caption: localization.get_message_with_args_in_language(
                "share-caption",
                language,
                &[("title", recipe.title.as_str())],
            ),
            error: localization.get_message_in_language("error-share", language, None),
        }
    }
}

/// Card labels for `recipe` in `language`
pub fn card_labels(localization: &LocalizationManager, language: &str, recipe: &Recipe) -> CardLabels {
    let t = |key: &str| localization.get_message_in_language(key, language, None);

    CardLabels {
        brand: t("card-brand"),
        ingredients_heading: t("card-ingredients-heading"),
        missing_suffix: t("card-missing-suffix"),
        footer: t("card-footer"),
        difficulty: t(recipe.difficulty.message_key()),
        calories: recipe.calories.map(|calories| {
            localization.get_message_with_args_in_language(
                "card-calories",
                language,
                &[("calories", calories.to_string().as_str())],
            )
        }),
        export_error: t("error-share"),
    }
}

/// Renders cards on a raster surface with the loaded fonts
#[derive(Debug, Clone)]
pub struct CardExporter {
    fonts: Arc<CardFonts>,
}

impl CardExporter {
    pub fn new(fonts: Arc<CardFonts>) -> Self {
        Self { fonts }
    }

    pub fn render(&self, recipe: &Recipe, labels: &CardLabels) -> Result<RecipeCard, FridgeError> {
        let mut surface = RasterSurface::new(CARD_WIDTH, CARD_HEIGHT, &self.fonts);
        render_recipe_card(&mut surface, recipe, labels)
    }
}

/// Share the card, or save it when the target cannot share files
pub async fn share_recipe_card(
    target: &dyn ShareTarget,
    card: &RecipeCard,
    title: &str,
    messages: &ShareMessages,
) -> Result<ShareOutcome, FridgeError> {
    let result = if target.can_share_files() {
        target
            .share(card, title, &messages.caption)
            .await
            .map(|_| ShareOutcome::Shared)
    } else {
        target.save(card).await.map(|_| ShareOutcome::Downloaded)
    };

    match result {
        Ok(outcome) => {
            info!(file_name = %card.file_name, outcome = outcome.as_str(), "Recipe card delivered");
            observability::record_share_metrics(outcome.as_str(), true);
            Ok(outcome)
        }
        Err(detail) => {
            warn!(file_name = %card.file_name, error = %detail, "Recipe card delivery failed");
            observability::record_share_metrics("failed", false);
            Err(FridgeError::ShareExport(messages.error.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTarget {
        can_share: bool,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ShareTarget for RecordingTarget {
        fn can_share_files(&self) -> bool {
            self.can_share
        }

        async fn share(&self, card: &RecipeCard, title: &str, text: &str) -> Result<(), String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("share:{}:{}:{}", card.file_name, title, text));
            if self.fail {
                Err("cancelled".to_string())
            } else {
                Ok(())
            }
        }

        async fn save(&self, card: &RecipeCard) -> Result<(), String> {
            self.calls.lock().unwrap().push(format!("save:{}", card.file_name));
            if self.fail {
                Err("disk full".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn card() -> RecipeCard {
        RecipeCard {
            file_name: "fridgelens-recipe-0.png".to_string(),
            png: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn messages() -> ShareMessages {
        ShareMessages {
            caption: "A great recipe I found with FridgeLens: Menemen".to_string(),
            error: "Something went wrong while sharing.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_shares_when_files_supported() {
        let target = RecordingTarget {
            can_share: true,
            ..Default::default()
        };
        let outcome = share_recipe_card(&target, &card(), "Menemen", &messages())
            .await
            .unwrap();

        assert_eq!(outcome, ShareOutcome::Shared);
        assert_eq!(
            target.calls.lock().unwrap().as_slice(),
            ["share:fridgelens-recipe-0.png:Menemen:A great recipe I found with FridgeLens: Menemen"]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_download() {
        let target = RecordingTarget::default();
        let outcome = share_recipe_card(&target, &card(), "Menemen", &messages())
            .await
            .unwrap();

        assert_eq!(outcome, ShareOutcome::Downloaded);
        assert_eq!(
            target.calls.lock().unwrap().as_slice(),
            ["save:fridgelens-recipe-0.png"]
        );
    }

    #[tokio::test]
    async fn test_failure_maps_to_share_export_error() {
        let target = RecordingTarget {
            can_share: true,
            fail: true,
            ..Default::default()
        };
        let err = share_recipe_card(&target, &card(), "Menemen", &messages())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FridgeError::ShareExport("Something went wrong while sharing.".to_string())
        );
    }

    #[test]
    fn test_card_labels_localized() {
        let localization = LocalizationManager::new().unwrap();
        let recipe = Recipe {
            id: "r".to_string(),
            title: "Menemen".to_string(),
            description: String::new(),
            used_ingredients: vec![],
            missing_ingredients: vec![],
            instructions: vec![],
            prep_time: "15 dk".to_string(),
            difficulty: crate::model::Difficulty::Easy,
            calories: Some(320),
        };

        let labels = card_labels(&localization, "tr", &recipe);
        assert_eq!(labels.difficulty, "Kolay");
        assert_eq!(labels.missing_suffix, "(Eksik)");
        assert_eq!(labels.footer, "Yapay Zeka Destekli Atıksız Mutfak");
        assert_eq!(labels.calories.as_deref(), Some("320 kcal"));

        let messages = ShareMessages::localized(&localization, "tr", &recipe);
        assert_eq!(messages.caption, "FridgeLens ile bulduğum harika bir tarif: Menemen");
    }
}
