//! # FridgeLens Telegram Bot
//!
//! A Telegram bot that reads the ingredients in a photo of your fridge with
//! a hosted vision model, tracks how soon they expire, and suggests
//! zero-waste recipes that can be exported as shareable recipe cards.

pub mod bot;
pub mod capture;
pub mod card;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod gateway;
pub mod localization;
pub mod market;
pub mod model;
pub mod observability;
pub mod observability_config;
pub mod session;
pub mod share;
pub mod urgency;
pub mod validation;

// Re-export types for easier access
pub use errors::{AppError, AppResult, FridgeError};
pub use model::{DietaryPreference, Difficulty, Ingredient, Recipe};
pub use session::{FridgeSession, Phase, TransitionError, View};
pub use urgency::UrgencyLevel;
