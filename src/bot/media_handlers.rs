//! Media Handlers module for processing photo and document messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use super::dialogue_manager::capture_and_analyze;
use super::image_processing::TelegramImageSource;
use super::HandlerContext;
use crate::capture::CaptureOrigin;
use crate::dialogue::{ChatState, FridgeDialogue};
use crate::observability;

/// Handle photo messages: the camera path
pub async fn handle_photo_message(
    ctx: &HandlerContext<'_>,
    msg: &Message,
    dialogue: &FridgeDialogue,
    state: ChatState,
) -> Result<()> {
    let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) else {
        return Ok(());
    };

    debug!(chat_id = %ctx.chat_id, width = largest_photo.width, height = largest_photo.height, "Received photo message");
    observability::record_telegram_message("photo");

    let source = TelegramImageSource::new(
        ctx.bot.clone(),
        largest_photo.file.id.clone(),
        u64::from(largest_photo.file.size),
        CaptureOrigin::Camera,
        ctx.services.max_image_size_bytes,
    );
    capture_and_analyze(ctx, dialogue, state, Box::new(source)).await
}

/// Whether a document should be treated as an image upload
pub fn is_image_mime(mime_type: Option<&str>) -> bool {
    mime_type.is_some_and(|mime| mime.starts_with("image/"))
}

/// Handle document messages: the file picker path
pub async fn handle_document_message(
    ctx: &HandlerContext<'_>,
    msg: &Message,
    dialogue: &FridgeDialogue,
    state: ChatState,
) -> Result<()> {
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let mime_type = doc.mime_type.as_ref().map(|mime| mime.to_string());
    if !is_image_mime(mime_type.as_deref()) {
        debug!(chat_id = %ctx.chat_id, mime_type = ?mime_type, "Received non-image document");
        ctx.bot
            .send_message(ctx.chat_id, ctx.t("error-unsupported-format"))
            .await?;
        return Ok(());
    }

    debug!(chat_id = %ctx.chat_id, mime_type = ?mime_type, "Received image document");
    observability::record_telegram_message("document");

    let source = TelegramImageSource::new(
        ctx.bot.clone(),
        doc.file.id.clone(),
        u64::from(doc.file.size),
        CaptureOrigin::FilePicker,
        ctx.services.max_image_size_bytes,
    );
    capture_and_analyze(ctx, dialogue, state, Box::new(source)).await
}
