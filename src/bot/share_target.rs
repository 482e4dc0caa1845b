//! Recipe card delivery into the chat

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::card::RecipeCard;
use crate::share::ShareTarget;

/// Sends cards to a chat: as a captioned photo when sharing files is
/// enabled, otherwise as a plain document download
pub struct TelegramShareTarget {
    bot: Bot,
    chat_id: ChatId,
    as_photo: bool,
}

impl TelegramShareTarget {
    pub fn new(bot: Bot, chat_id: ChatId, as_photo: bool) -> Self {
        Self {
            bot,
            chat_id,
            as_photo,
        }
    }
}

fn input_file(card: &RecipeCard) -> InputFile {
    InputFile::memory(card.png.clone()).file_name(card.file_name.clone())
}

#[async_trait]
impl ShareTarget for TelegramShareTarget {
    fn can_share_files(&self) -> bool {
        self.as_photo
    }

    async fn share(&self, card: &RecipeCard, _title: &str, text: &str) -> Result<(), String> {
        self.bot
            .send_photo(self.chat_id, input_file(card))
            .caption(text)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn save(&self, card: &RecipeCard) -> Result<(), String> {
        self.bot
            .send_document(self.chat_id, input_file(card))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
