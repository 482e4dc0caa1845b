//! Message Handler module: entry point for every incoming message

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, Instrument};

use super::command_handlers::{
    handle_help_command, handle_new_command, handle_start_command, handle_unsupported_message,
    Command,
};
use super::dialogue_manager::{notify_transition_error, show_screen};
use super::media_handlers::{handle_document_message, handle_photo_message};
use super::{user_language_code, BotServices, HandlerContext};
use crate::dialogue::{ChatState, FridgeDialogue, PendingInput};
use crate::errors::error_logging;
use crate::localization::detect_language;
use crate::observability;
use crate::urgency::today;
use crate::validation::{is_clear_input, parse_expiry_date, validate_allergies};

/// Route a message to the matching handler
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: FridgeDialogue,
    services: Arc<BotServices>,
) -> Result<()> {
    let user_id = msg.from.as_ref().map(|user| user.id.0 as i64);
    let language = detect_language(
        &services.localization,
        user_language_code(msg.from.as_ref()),
    );

    route_message(&bot, &msg, &dialogue, &services, language)
        .instrument(observability::telegram_span("message", user_id))
        .await
}

async fn route_message(
    bot: &Bot,
    msg: &Message,
    dialogue: &FridgeDialogue,
    services: &BotServices,
    language: String,
) -> Result<()> {
    let ctx = HandlerContext {
        bot,
        services,
        chat_id: msg.chat.id,
        language,
    };

    let mut state = dialogue.get_or_default().await?;
    state.session.set_language(&ctx.language);

    if let Some(text) = msg.text() {
        observability::record_telegram_message("text");
        match Command::parse(text) {
            Some(Command::Start) => handle_start_command(&ctx, dialogue, state).await,
            Some(Command::Help) => handle_help_command(&ctx).await,
            Some(Command::New) => handle_new_command(&ctx, dialogue, state).await,
            None if state.is_waiting_for_input() => {
                handle_text_input(&ctx, dialogue, state, text).await
            }
            None => handle_unsupported_message(&ctx).await,
        }
    } else if msg.photo().is_some() {
        handle_photo_message(&ctx, msg, dialogue, state).await
    } else if msg.document().is_some() {
        handle_document_message(&ctx, msg, dialogue, state).await
    } else {
        observability::record_telegram_message("unsupported");
        handle_unsupported_message(&ctx).await
    }
}

/// Apply free text to the pending expiry date or allergy prompt.
///
/// Invalid input keeps the prompt open.
async fn handle_text_input(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
    text: &str,
) -> Result<()> {
    let pending = state.take_pending_input();
    let chat_id = Some(ctx.chat_id.0);

    let applied = match pending {
        PendingInput::ExpiryDate { index } => {
            let date = if is_clear_input(text) {
                Ok(None)
            } else {
                parse_expiry_date(text, today()).map(Some)
            };
            match date {
                Ok(date) => Ok(state.session.set_expiry(index, date)),
                Err(key) => {
                    error_logging::log_validation_error(&key, "parse_expiry_date", chat_id, "expiry_date", Some(text));
                    Err(key)
                }
            }
        }
        PendingInput::Allergies => {
            let allergies = if is_clear_input(text) {
                Ok(String::new())
            } else {
                validate_allergies(text)
            };
            match allergies {
                Ok(allergies) => {
                    state.session.set_allergies(allergies);
                    Ok(Ok(()))
                }
                Err(key) => {
                    error_logging::log_validation_error(&key, "validate_allergies", chat_id, "allergies", Some(text));
                    Err(key)
                }
            }
        }
        PendingInput::None => return handle_unsupported_message(ctx).await,
    };

    match applied {
        Ok(Ok(())) => {
            debug!(chat_id = %ctx.chat_id, "Applied text input");
            dialogue.update(state.clone()).await?;
            show_screen(ctx, &state, None).await?;
        }
        Ok(Err(transition)) => {
            dialogue.update(state).await?;
            notify_transition_error(ctx, &transition).await?;
        }
        Err(key) => {
            state.pending_input = pending;
            dialogue.update(state).await?;
            ctx.bot.send_message(ctx.chat_id, ctx.t(key)).await?;
        }
    }
    Ok(())
}
