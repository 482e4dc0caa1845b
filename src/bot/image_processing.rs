//! Image Processing module: Telegram photos and image documents as capture sources

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{debug, info};

use crate::capture::{CaptureError, CaptureOrigin, CapturedImage, ImageSource};
use crate::errors::error_logging;
use crate::localization::LocalizationManager;
use crate::observability;
use crate::validation::validate_image_size;

/// A photo (camera) or image document (file picker) sent to the chat.
///
/// The file is only downloaded when the source is consumed by `acquire`.
pub struct TelegramImageSource {
    bot: Bot,
    file_id: FileId,
    declared_size: u64,
    origin: CaptureOrigin,
    max_size: u64,
}

impl TelegramImageSource {
    pub fn new(
        bot: Bot,
        file_id: FileId,
        declared_size: u64,
        origin: CaptureOrigin,
        max_size: u64,
    ) -> Self {
        Self {
            bot,
            file_id,
            declared_size,
            origin,
            max_size,
        }
    }
}

/// Map a `validate_image_size` rejection key to a capture error
fn size_error(key: &str, size: u64, max: u64) -> CaptureError {
    match key {
        "error-file-too-large" => CaptureError::TooLarge { size, max },
        "error-image-unreadable" => CaptureError::Unreadable("empty file".to_string()),
        other => CaptureError::Unreadable(format!("rejected by size check: {}", other)),
    }
}

#[async_trait]
impl ImageSource for TelegramImageSource {
    fn origin(&self) -> CaptureOrigin {
        self.origin
    }

    async fn acquire(self: Box<Self>) -> Result<CapturedImage, CaptureError> {
        // Telegram reports 0 when the size is unknown
        if self.declared_size > self.max_size {
            return Err(CaptureError::TooLarge {
                size: self.declared_size,
                max: self.max_size,
            });
        }

        let bytes = download_file(&self.bot, self.file_id.clone(), self.max_size).await?;
        let size = bytes.len() as u64;
        validate_image_size(size, self.max_size).map_err(|key| size_error(key, size, self.max_size))?;

        observability::record_capture_metrics(self.origin.as_str(), size);
        debug!(origin = self.origin.as_str(), size_bytes = size, "Image downloaded");

        CapturedImage::from_bytes(bytes)
    }
}

/// Download a Telegram file into memory
pub async fn download_file(
    bot: &Bot,
    file_id: FileId,
    max_size: u64,
) -> Result<Vec<u8>, CaptureError> {
    let file = bot.get_file(file_id).await.map_err(|e| {
        error_logging::log_network_error(&e, "get_file", None);
        CaptureError::Unavailable(e.to_string())
    })?;

    // Telegram reports the stored size; reject before transferring anything
    let stored_size = u64::from(file.size);
    if stored_size > max_size {
        return Err(CaptureError::TooLarge {
            size: stored_size,
            max: max_size,
        });
    }

    let mut bytes = Vec::with_capacity(stored_size as usize);
    bot.download_file(&file.path, &mut bytes).await.map_err(|e| {
        error_logging::log_network_error(&e, "download_file", None);
        CaptureError::Unavailable(e.to_string())
    })?;

    info!(size_bytes = bytes.len(), "Telegram file downloaded");
    Ok(bytes)
}

/// Localized message for a capture failure
pub fn capture_error_message(
    localization: &LocalizationManager,
    language: &str,
    error: &CaptureError,
) -> String {
    match error {
        CaptureError::TooLarge { size, max } => localization.get_message_with_args_in_language(
            error.message_key(),
            language,
            &[
                ("size", size.to_string().as_str()),
                ("max", max.to_string().as_str()),
            ],
        ),
        _ => localization.get_message_in_language(error.message_key(), language, None),
    }
}
