//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `callbacks`: Inline keyboard callback queries
//! - `command_handlers`: `/start`, `/help` and `/new`
//! - `message_handler`: Entry point for messages, including free-text input
//! - `media_handlers`: Photos and image documents
//! - `image_processing`: Downloading Telegram files as captured frames
//! - `dialogue_manager`: Drives the session and re-renders the screen
//! - `share_target`: Recipe card delivery to the chat
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callbacks;
pub mod command_handlers;
pub mod dialogue_manager;
pub mod image_processing;
pub mod media_handlers;
pub mod message_handler;
pub mod share_target;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::prelude::*;

use crate::gateway::{IngredientExtractor, RecipeGenerator};
use crate::localization::LocalizationManager;
use crate::share::CardExporter;

/// Long-lived dependencies shared by every handler
pub struct BotServices {
    pub localization: Arc<LocalizationManager>,
    pub extractor: Arc<dyn IngredientExtractor>,
    pub generator: Arc<dyn RecipeGenerator>,
    /// `None` when no card fonts could be loaded; sharing then fails with a toast
    pub exporter: Option<CardExporter>,
    pub max_image_size_bytes: u64,
    pub share_as_photo: bool,
}

/// Common context for bot handlers containing shared dependencies
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub services: &'a BotServices,
    pub chat_id: ChatId,
    /// Resolved language for this update
    pub language: String,
}

impl HandlerContext<'_> {
    pub fn t(&self, key: &str) -> String {
        self.services
            .localization
            .get_message_in_language(key, &self.language, None)
    }

    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.services
            .localization
            .get_message_with_args_in_language(key, &self.language, args)
    }
}

/// Language code of the Telegram user who sent the update, if any
pub fn user_language_code(user: Option<&teloxide::types::User>) -> Option<&str> {
    user.and_then(|user| user.language_code.as_deref())
}

pub use callbacks::callback_handler::callback_handler;
pub use message_handler::message_handler;
