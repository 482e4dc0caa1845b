//! UI Builder module for creating keyboards and formatting messages
//!
//! Every screen of the session is rendered as one text message with an
//! inline keyboard. The functions here are pure so the layout can be tested
//! without a bot.

use chrono::NaiveDate;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::callbacks::callback_types::CallbackAction;
use crate::card::stats_line;
use crate::localization::LocalizationManager;
use crate::market::MOCK_STORES;
use crate::model::{DietaryPreference, Ingredient, Recipe};
use crate::session::{FridgeSession, Phase, View};
use crate::share::card_labels;
use crate::urgency::urgency_on;

/// Maximum characters of an ingredient name on a button
const BUTTON_LABEL_MAX_CHARS: usize = 20;

/// A rendered screen
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenMessage {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

struct Texts<'a> {
    localization: &'a LocalizationManager,
    language: &'a str,
}

impl Texts<'_> {
    fn t(&self, key: &str) -> String {
        self.localization
            .get_message_in_language(key, self.language, None)
    }

    fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.localization
            .get_message_with_args_in_language(key, self.language, args)
    }
}

fn button(text: String, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.data())
}

/// Shorten a label for a button, by characters
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > BUTTON_LABEL_MAX_CHARS {
        let head: String = label.chars().take(BUTTON_LABEL_MAX_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

/// Render the current screen of `session`
pub fn build_screen(
    localization: &LocalizationManager,
    session: &FridgeSession,
    today: NaiveDate,
) -> ScreenMessage {
    let texts = Texts {
        localization,
        language: session.language(),
    };

    let (body, mut rows) = match session.view() {
        View::Home => home_screen(&texts),
        View::Capture => (texts.t("camera-prompt"), Vec::new()),
        View::Loading(Phase::Analyzing) => (
            format!("{}\n{}", texts.t("analyzing-title"), texts.t("analyzing-description")),
            Vec::new(),
        ),
        View::Loading(_) => (
            format!(
                "{}\n{}",
                texts.t("generating-title"),
                texts.t("generating-description")
            ),
            Vec::new(),
        ),
        View::IngredientEditor => ingredient_screen(&texts, session, today),
        View::RecipeList => recipe_list_screen(&texts, session),
        View::RecipeDetail { sharing } => match session.selected_recipe() {
            Some(recipe) => recipe_detail_screen(&texts, recipe, sharing),
            None => recipe_list_screen(&texts, session),
        },
    };

    let text = match session.error() {
        Some(error) => {
            rows.push(vec![button(texts.t("button-dismiss"), CallbackAction::DismissError)]);
            format!("⚠️ {}\n\n{}", error, body)
        }
        None => body,
    };

    ScreenMessage {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

fn home_screen(texts: &Texts) -> (String, Vec<Vec<InlineKeyboardButton>>) {
    (
        format!(
            "{}\n\n{}",
            texts.t("welcome-title"),
            texts.t("welcome-description")
        ),
        vec![vec![button(texts.t("button-start"), CallbackAction::Start)]],
    )
}

/// One line per ingredient: urgency icon, name, expiry and badge
pub fn format_ingredient_line(
    localization: &LocalizationManager,
    language: &str,
    ingredient: &Ingredient,
    today: NaiveDate,
) -> String {
    let urgency = urgency_on(ingredient.expiry_date, today);
    let expiry = match ingredient.expiry_date {
        Some(date) => localization.get_message_with_args_in_language(
            "ingredient-expiry",
            language,
            &[("date", date.format("%Y-%m-%d").to_string().as_str())],
        ),
        None => localization.get_message_in_language("ingredient-no-expiry", language, None),
    };

    let mut line = format!("{} {} ({})", urgency.icon(), ingredient.name, expiry);
    if let Some(badge_key) = urgency.badge_key() {
        line.push_str(&format!(
            " [{}]",
            localization.get_message_in_language(badge_key, language, None)
        ));
    }
    line
}

fn diet_label(texts: &Texts, diet: DietaryPreference) -> String {
    texts.t(diet.message_key())
}

fn ingredient_screen(
    texts: &Texts,
    session: &FridgeSession,
    today: NaiveDate,
) -> (String, Vec<Vec<InlineKeyboardButton>>) {
    let mut lines = vec![texts.t("ingredients-title"), texts.t("ingredients-description"), String::new()];

    if session.ingredients().is_empty() {
        lines.push(texts.t("ingredients-empty"));
    } else {
        for (i, ingredient) in session.ingredients().iter().enumerate() {
            lines.push(format!(
                "{}. {}",
                i + 1,
                format_ingredient_line(texts.localization, texts.language, ingredient, today)
            ));
        }
    }

    let allergies = if session.allergies().trim().is_empty() {
        texts.t("allergies-none")
    } else {
        session.allergies().to_string()
    };
    lines.push(String::new());
    lines.push(texts.t_args(
        "diet-label",
        &[("diet", diet_label(texts, session.dietary_preference()).as_str())],
    ));
    lines.push(texts.t_args("allergies-label", &[("allergies", allergies.as_str())]));

    let mut rows: Vec<Vec<InlineKeyboardButton>> = session
        .ingredients()
        .iter()
        .enumerate()
        .map(|(i, ingredient)| {
            let name = truncate_label(&ingredient.name);
            vec![
                button(
                    texts.t_args("button-set-expiry", &[("name", name.as_str())]),
                    CallbackAction::SetExpiry(i),
                ),
                button(
                    texts.t_args("button-remove", &[("name", name.as_str())]),
                    CallbackAction::RemoveIngredient(i),
                ),
            ]
        })
        .collect();

    for chunk in DietaryPreference::ALL.chunks(3) {
        rows.push(
            chunk
                .iter()
                .map(|diet| {
                    let label = diet_label(texts, *diet);
                    let label = if *diet == session.dietary_preference() {
                        format!("✓ {}", label)
                    } else {
                        label
                    };
                    button(label, CallbackAction::Diet(*diet))
                })
                .collect(),
        );
    }

    rows.push(vec![button(texts.t("button-allergies"), CallbackAction::Allergies)]);
    if session.can_generate() {
        rows.push(vec![button(texts.t("button-generate"), CallbackAction::Generate)]);
    }
    rows.push(vec![button(texts.t("button-new-photo"), CallbackAction::NewPhoto)]);

    (lines.join("\n"), rows)
}

fn recipe_status(texts: &Texts, recipe: &Recipe) -> String {
    if recipe.is_complete() {
        texts.t("recipe-complete")
    } else {
        texts.t_args(
            "recipe-missing-count",
            &[("count", recipe.missing_ingredients.len().to_string().as_str())],
        )
    }
}

fn recipe_list_screen(
    texts: &Texts,
    session: &FridgeSession,
) -> (String, Vec<Vec<InlineKeyboardButton>>) {
    let count = session.ingredients().len().to_string();
    let summary = if session.dietary_preference().is_restricted() {
        texts.t_args(
            "recipes-summary-diet",
            &[
                ("diet", diet_label(texts, session.dietary_preference()).as_str()),
                ("count", count.as_str()),
            ],
        )
    } else {
        texts.t_args("recipes-summary", &[("count", count.as_str())])
    };

    let mut lines = vec![texts.t("recipes-title"), summary, String::new()];
    let mut rows = Vec::new();

    if session.recipes().is_empty() {
        lines.push(texts.t("recipes-empty"));
    }

    for (i, recipe) in session.recipes().iter().enumerate() {
        let difficulty = texts.t(recipe.difficulty.message_key());
        lines.push(format!(
            "{}. {} ({} • {}) {}",
            i + 1,
            recipe.title,
            recipe.prep_time,
            difficulty,
            recipe_status(texts, recipe)
        ));
        rows.push(vec![button(
            format!("{}. {}", i + 1, recipe.title),
            CallbackAction::SelectRecipe(i),
        )]);
    }

    rows.push(vec![
        button(texts.t("button-edit"), CallbackAction::EditIngredients),
        button(texts.t("button-new-photo"), CallbackAction::NewPhoto),
    ]);

    (lines.join("\n"), rows)
}

fn recipe_detail_screen(
    texts: &Texts,
    recipe: &Recipe,
    sharing: bool,
) -> (String, Vec<Vec<InlineKeyboardButton>>) {
    let labels = card_labels(texts.localization, texts.language, recipe);

    let mut lines = vec![recipe.title.clone()];
    if !recipe.description.is_empty() {
        lines.push(recipe.description.clone());
    }
    lines.push(stats_line(recipe, &labels));
    lines.push(String::new());

    lines.push(texts.t("recipe-ingredients-heading"));
    lines.extend(recipe.used_ingredients.iter().map(|item| format!("• {}", item)));
    let missing_suffix = texts.t("recipe-missing-suffix");
    lines.extend(
        recipe
            .missing_ingredients
            .iter()
            .map(|item| format!("• {} {}", item, missing_suffix)),
    );
    lines.push(String::new());

    lines.push(texts.t("recipe-instructions-heading"));
    lines.extend(
        recipe
            .instructions
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step)),
    );

    let mut rows = Vec::new();

    if !recipe.missing_ingredients.is_empty() {
        lines.push(String::new());
        lines.push(texts.t("market-title"));
        lines.push(texts.t_args(
            "market-description",
            &[
                ("count", recipe.missing_ingredients.len().to_string().as_str()),
                ("items", recipe.missing_ingredients.join(", ").as_str()),
            ],
        ));

        for (i, store) in MOCK_STORES.iter().enumerate() {
            rows.push(vec![button(
                texts.t_args(
                    "market-order-button",
                    &[
                        ("store", store.name),
                        ("distance", store.distance),
                        ("delivery", store.delivery_time),
                    ],
                ),
                CallbackAction::Order(i),
            )]);
        }
    }

    if sharing {
        lines.push(String::new());
        lines.push(texts.t("sharing-in-progress"));
    } else {
        rows.push(vec![
            button(texts.t("button-share"), CallbackAction::Share),
            button(texts.t("button-back"), CallbackAction::Back),
        ]);
    }

    (lines.join("\n"), rows)
}
