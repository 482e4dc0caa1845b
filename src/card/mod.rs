//! # Recipe Card Renderer
//!
//! Draws a shareable 800×1200 recipe card onto a [`DrawingSurface`] and
//! encodes it as PNG. The layout is fixed:
//!
//! ```text
//! ┌──────────────── header (brand) ────────────────┐
//! │  ┌──────────────── white panel ─────────────┐  │
//! │  │            title (wrapped, 600 px)       │  │
//! │  │            ────────────                  │  │
//! │  │       prep  •  difficulty  •  kcal       │  │
//! │  │  Ingredients                             │  │
//! │  │  • used (≤ 8)                            │  │
//! │  │  • missing (missing) (≤ 3)               │  │
//! │  └──────────────────────────────────────────┘  │
//! │                 footer tagline                 │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The renderer only talks to the surface trait; [`raster::RasterSurface`]
//! is the production implementation.

pub mod raster;

use crate::errors::FridgeError;
use crate::model::Recipe;

pub const CARD_WIDTH: u32 = 800;
pub const CARD_HEIGHT: u32 = 1200;

/// Used ingredients listed on the card
pub const MAX_USED_INGREDIENTS: usize = 8;
/// Missing ingredients listed on the card
pub const MAX_MISSING_INGREDIENTS: usize = 3;

const HEADER_HEIGHT: f32 = 120.0;
const PANEL: Rect = Rect {
    x: 50.0,
    y: 160.0,
    width: 700.0,
    height: 950.0,
};
const PANEL_RADIUS: f32 = 30.0;
const TITLE_TOP: f32 = 220.0;
const TITLE_MAX_WIDTH: f32 = 600.0;
const TITLE_LINE_HEIGHT: f32 = 70.0;
const LIST_X: f32 = 100.0;
const BULLET_SPACING: f32 = 45.0;
const FOOTER_OFFSET: f32 = 60.0;

/// An sRGB colour with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const EMERALD_50: Color = Color::rgb(0xec, 0xfd, 0xf5);
    pub const EMERALD_600: Color = Color::rgb(0x05, 0x96, 0x69);
    pub const SLATE_900: Color = Color::rgb(0x0f, 0x17, 0x2a);
    pub const SLATE_700: Color = Color::rgb(0x33, 0x41, 0x55);
    pub const SLATE_500: Color = Color::rgb(0x64, 0x74, 0x8b);
    pub const SLATE_200: Color = Color::rgb(0xe2, 0xe8, 0xf0);
    pub const ORANGE_600: Color = Color::rgb(0xea, 0x58, 0x0c);
    pub const SHADOW: Color = Color::rgba(0, 0, 0, 26);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
}

impl TextStyle {
    pub const fn new(size: f32, weight: FontWeight) -> Self {
        Self { size, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Vertical anchor of the `y` coordinate passed to `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
}

/// 2D drawing operations the card needs
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Advance width of `text` in pixels
    fn measure_text(&self, text: &str, style: TextStyle) -> f32;

    fn fill_vertical_gradient(&mut self, top: Color, bottom: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Soft drop shadow under a rounded rectangle
    fn drop_shadow(&mut self, rect: Rect, radius: f32, offset_y: f32, blur: f32, color: Color);

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color);

    #[allow(clippy::too_many_arguments)]
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: TextStyle,
        align: TextAlign,
        baseline: Baseline,
        color: Color,
    );

    fn encode_png(&self) -> Result<Vec<u8>, String>;
}

/// Localized text printed on the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLabels {
    pub brand: String,
    pub ingredients_heading: String,
    pub missing_suffix: String,
    pub footer: String,
    /// Display label of the recipe difficulty
    pub difficulty: String,
    /// Calories text such as "350 kcal", absent when unknown
    pub calories: Option<String>,
    /// Message used when encoding fails
    pub export_error: String,
}

/// An encoded card ready to share or download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Greedy word wrap: a word moves to the next line once the current line plus
/// that word would exceed `max_width`. The first word always stays on the
/// first line, so a single overlong word is never split.
pub fn wrap_text(
    surface: &dyn DrawingSurface,
    text: &str,
    style: TextStyle,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for (n, word) in text.split(' ').enumerate() {
        let candidate = format!("{}{} ", line, word);
        if n > 0 && surface.measure_text(&candidate, style) > max_width {
            lines.push(line.trim_end().to_string());
            line = format!("{} ", word);
        } else {
            line = candidate;
        }
    }
    lines.push(line.trim_end().to_string());

    lines
}

/// Stats line under the title: `prep  •  difficulty  •  N kcal`
pub fn stats_line(recipe: &Recipe, labels: &CardLabels) -> String {
    let mut parts = vec![recipe.prep_time.as_str(), labels.difficulty.as_str()];
    if let Some(calories) = &labels.calories {
        parts.push(calories.as_str());
    }
    parts.retain(|part| !part.trim().is_empty());
    parts.join("  •  ")
}

/// Draw the card for `recipe` and encode it as PNG
pub fn render_recipe_card(
    surface: &mut dyn DrawingSurface,
    recipe: &Recipe,
    labels: &CardLabels,
) -> Result<RecipeCard, FridgeError> {
    let width = surface.width() as f32;
    let height = surface.height() as f32;
    let center_x = width / 2.0;

    surface.fill_vertical_gradient(Color::EMERALD_50, Color::WHITE);

    surface.fill_rect(
        Rect {
            x: 0.0,
            y: 0.0,
            width,
            height: HEADER_HEIGHT,
        },
        Color::EMERALD_600,
    );
    surface.fill_text(
        &labels.brand,
        center_x,
        HEADER_HEIGHT / 2.0,
        TextStyle::new(48.0, FontWeight::Bold),
        TextAlign::Center,
        Baseline::Middle,
        Color::WHITE,
    );

    surface.drop_shadow(PANEL, PANEL_RADIUS, 10.0, 30.0, Color::SHADOW);
    surface.fill_rounded_rect(PANEL, PANEL_RADIUS, Color::WHITE);

    let title_style = TextStyle::new(56.0, FontWeight::Bold);
    let mut y = TITLE_TOP;
    for line in wrap_text(&*surface, &recipe.title, title_style, TITLE_MAX_WIDTH) {
        surface.fill_text(
            &line,
            center_x,
            y,
            title_style,
            TextAlign::Center,
            Baseline::Top,
            Color::SLATE_900,
        );
        y += TITLE_LINE_HEIGHT;
    }

    surface.stroke_line((200.0, y + 20.0), (600.0, y + 20.0), 2.0, Color::SLATE_200);

    y += 60.0;
    surface.fill_text(
        &stats_line(recipe, labels),
        center_x,
        y,
        TextStyle::new(28.0, FontWeight::Medium),
        TextAlign::Center,
        Baseline::Top,
        Color::SLATE_500,
    );

    y += 80.0;
    surface.fill_text(
        &labels.ingredients_heading,
        LIST_X,
        y,
        TextStyle::new(36.0, FontWeight::Bold),
        TextAlign::Left,
        Baseline::Top,
        Color::EMERALD_600,
    );

    y += 50.0;
    let bullet_style = TextStyle::new(28.0, FontWeight::Regular);
    for ingredient in recipe.used_ingredients.iter().take(MAX_USED_INGREDIENTS) {
        surface.fill_text(
            &format!("• {}", ingredient),
            LIST_X,
            y,
            bullet_style,
            TextAlign::Left,
            Baseline::Top,
            Color::SLATE_700,
        );
        y += BULLET_SPACING;
    }
    for ingredient in recipe.missing_ingredients.iter().take(MAX_MISSING_INGREDIENTS) {
        surface.fill_text(
            &format!("• {} {}", ingredient, labels.missing_suffix),
            LIST_X,
            y,
            bullet_style,
            TextAlign::Left,
            Baseline::Top,
            Color::ORANGE_600,
        );
        y += BULLET_SPACING;
    }

    surface.fill_text(
        &labels.footer,
        center_x,
        height - FOOTER_OFFSET,
        TextStyle::new(24.0, FontWeight::Italic),
        TextAlign::Center,
        Baseline::Top,
        Color::EMERALD_600,
    );

    let png = surface.encode_png().map_err(|detail| {
        tracing::error!(recipe_id = %recipe.id, error = %detail, "Failed to encode recipe card");
        FridgeError::ShareExport(labels.export_error.clone())
    })?;

    Ok(RecipeCard {
        file_name: recipe.card_file_name(),
        png,
    })
}
