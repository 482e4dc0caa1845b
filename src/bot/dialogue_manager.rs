//! Dialogue Manager module: drives the session through its gateway calls
//! and keeps the chat's screen message in sync with the session state.
//!
//! The busy state is written to the dialogue storage before every gateway
//! call and replaced by the finished state on every exit path after it.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

use super::image_processing::capture_error_message;
use super::share_target::TelegramShareTarget;
use super::ui_builder::build_screen;
use super::HandlerContext;
use crate::capture::ImageSource;
use crate::dialogue::{ChatState, FridgeDialogue, PendingInput};
use crate::errors::{error_logging, FridgeError};
use crate::session::{Phase, TransitionError};
use crate::share::{card_labels, share_recipe_card, ShareMessages, ShareOutcome};
use crate::urgency::today;

/// Show the current screen, editing `edit` in place when given.
///
/// Returns the id of the message that now shows the screen.
pub async fn show_screen(
    ctx: &HandlerContext<'_>,
    state: &ChatState,
    edit: Option<MessageId>,
) -> Result<Option<MessageId>> {
    let screen = build_screen(&ctx.services.localization, &state.session, today());

    if let Some(message_id) = edit {
        let result = ctx
            .bot
            .edit_message_text(ctx.chat_id, message_id, screen.text.clone())
            .reply_markup(screen.keyboard.clone())
            .await;
        match result {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {
                return Ok(Some(message_id))
            }
            Err(e) => {
                debug!(chat_id = %ctx.chat_id, error = %e, "Could not edit screen message, sending a new one");
            }
        }
    }

    let request = ctx.bot.send_message(ctx.chat_id, screen.text);
    let message = if screen.keyboard.inline_keyboard.is_empty() {
        request.await?
    } else {
        request.reply_markup(screen.keyboard).await?
    };
    Ok(Some(message.id))
}

/// Show the busy screen before a slow call.
///
/// A failure here is logged and ignored so the call and its finishing
/// transition still run.
async fn show_busy_screen(
    ctx: &HandlerContext<'_>,
    state: &ChatState,
    edit: Option<MessageId>,
) -> Option<MessageId> {
    match show_screen(ctx, state, edit).await {
        Ok(message_id) => message_id,
        Err(e) => {
            error_logging::log_network_error(&e, "show_busy_screen", Some("telegram"));
            edit
        }
    }
}

/// Tell the user the pressed button or sent input does nothing right now
pub async fn notify_transition_error(ctx: &HandlerContext<'_>, error: &TransitionError) -> Result<()> {
    debug!(chat_id = %ctx.chat_id, error = %error, "Rejected session action");
    ctx.bot
        .send_message(ctx.chat_id, ctx.t("error-invalid-action"))
        .await?;
    Ok(())
}

/// Acquire a frame from `source` and run ingredient extraction on it.
///
/// A photo sent outside the camera screen starts a new capture session,
/// including one left busy by a failed call.
pub async fn capture_and_analyze(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
    source: Box<dyn ImageSource>,
) -> Result<()> {
    if state.session.phase() != Phase::Camera {
        state.session.reset();
        state.session.start()?;
    }
    state.pending_input = PendingInput::None;

    let origin = source.origin();
    let image = match source.acquire().await {
        Ok(image) => image,
        Err(e) => {
            error_logging::log_capture_error(&e, origin.as_str(), Some(ctx.chat_id.0), None);
            let message =
                capture_error_message(&ctx.services.localization, &ctx.language, &e);
            state.session.capture_failed(FridgeError::CameraAccess(message))?;
            dialogue.update(state.clone()).await?;
            show_screen(ctx, &state, None).await?;
            return Ok(());
        }
    };

    state.session.begin_analysis(image)?;
    dialogue.update(state.clone()).await?;
    let screen_id = show_busy_screen(ctx, &state, None).await;

    state
        .session
        .analyze(ctx.services.extractor.as_ref())
        .await?;
    dialogue.update(state.clone()).await?;
    show_screen(ctx, &state, screen_id).await?;
    Ok(())
}

/// Generate recipes for the current ingredients
pub async fn generate_recipes(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
    edit: Option<MessageId>,
) -> Result<()> {
    let request = match state.session.begin_generation(today()) {
        Ok(request) => request,
        Err(e) => return notify_transition_error(ctx, &e).await,
    };
    dialogue.update(state.clone()).await?;
    let screen_id = show_busy_screen(ctx, &state, edit).await;

    let result = ctx.services.generator.generate_recipes(&request).await;
    state.session.finish_generation(result)?;
    dialogue.update(state.clone()).await?;
    show_screen(ctx, &state, screen_id).await?;
    Ok(())
}

/// Render the selected recipe as a card and deliver it
pub async fn share_selected_recipe(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
    edit: Option<MessageId>,
) -> Result<()> {
    let recipe = match state.session.begin_share() {
        Ok(recipe) => recipe,
        Err(e) => return notify_transition_error(ctx, &e).await,
    };
    dialogue.update(state.clone()).await?;
    let screen_id = show_busy_screen(ctx, &state, edit).await;

    let language = state.session.language().to_string();
    let localization = &ctx.services.localization;

    let rendered = match ctx.services.exporter.clone() {
        Some(exporter) => {
            let labels = card_labels(localization, &language, &recipe);
            let to_render = recipe.clone();
            tokio::task::spawn_blocking(move || exporter.render(&to_render, &labels))
                .await
                .unwrap_or_else(|e| Err(FridgeError::ShareExport(e.to_string())))
        }
        None => {
            warn!(chat_id = %ctx.chat_id, "Card fonts unavailable, cannot export recipe card");
            Err(FridgeError::ShareExport(String::new()))
        }
    };

    let result = match rendered {
        Ok(card) => {
            let target = TelegramShareTarget::new(
                ctx.bot.clone(),
                ctx.chat_id,
                ctx.services.share_as_photo,
            );
            let messages = ShareMessages::localized(localization, &language, &recipe);
            share_recipe_card(&target, &card, &recipe.title, &messages).await
        }
        Err(e) => {
            error_logging::log_share_error(&e, "render_card", Some(ctx.chat_id.0), Some(&recipe.id));
            Err(FridgeError::ShareExport(ctx.t("error-share")))
        }
    };

    let outcome = state.session.finish_share(result)?;
    dialogue.update(state.clone()).await?;

    if outcome == Some(ShareOutcome::Downloaded) {
        ctx.bot
            .send_message(ctx.chat_id, ctx.t("share-fallback-notice"))
            .await?;
    }
    show_screen(ctx, &state, screen_id).await?;
    Ok(())
}
