//! Callback Handler: routes inline keyboard presses to session actions

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{MaybeInaccessibleMessage, MessageId};
use tracing::{debug, Instrument};

use super::callback_types::CallbackAction;
use crate::bot::dialogue_manager::{
    generate_recipes, notify_transition_error, share_selected_recipe, show_screen,
};
use crate::bot::{user_language_code, BotServices, HandlerContext};
use crate::dialogue::{ChatState, FridgeDialogue, PendingInput};
use crate::localization::detect_language;
use crate::market::place_mock_order;
use crate::observability;
use crate::session::{Phase, TransitionError};

/// Chat of the message the keyboard belongs to, falling back to the user
pub fn callback_chat_id(q: &CallbackQuery) -> ChatId {
    match &q.message {
        Some(MaybeInaccessibleMessage::Regular(msg)) => msg.chat.id,
        Some(MaybeInaccessibleMessage::Inaccessible(msg)) => msg.chat.id,
        None => ChatId::from(q.from.id),
    }
}

/// Handle a callback query
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: FridgeDialogue,
    services: Arc<BotServices>,
) -> Result<()> {
    // Stop the client's loading indicator before any slow work
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(CallbackAction::parse) else {
        debug!(data = ?q.data, "Ignoring unknown callback data");
        return Ok(());
    };

    let chat_id = callback_chat_id(&q);
    let language = detect_language(&services.localization, user_language_code(Some(&q.from)));
    let message_id = match &q.message {
        Some(MaybeInaccessibleMessage::Regular(msg)) => Some(msg.id),
        _ => None,
    };

    observability::record_telegram_message("callback");

    let ctx = HandlerContext {
        bot: &bot,
        services: &services,
        chat_id,
        language,
    };
    handle_action(&ctx, &dialogue, action, message_id)
        .instrument(observability::session_span(action.name(), chat_id.0))
        .await
}

async fn handle_action(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    action: CallbackAction,
    message_id: Option<MessageId>,
) -> Result<()> {
    let mut state = dialogue.get_or_default().await?;
    state.session.set_language(&ctx.language);

    // Any button press abandons a pending text prompt
    state.take_pending_input();

    let result = match action {
        CallbackAction::Generate => {
            return generate_recipes(ctx, dialogue, state, message_id).await;
        }
        CallbackAction::Share => {
            return share_selected_recipe(ctx, dialogue, state, message_id).await;
        }
        CallbackAction::SetExpiry(index) => {
            return prompt_for_input(ctx, dialogue, state, PendingInput::ExpiryDate { index })
                .await;
        }
        CallbackAction::Allergies => {
            return prompt_for_input(ctx, dialogue, state, PendingInput::Allergies).await;
        }
        CallbackAction::Order(store_index) => {
            dialogue.update(state.clone()).await?;
            return order_missing_items(ctx, &state, store_index).await;
        }
        CallbackAction::Start => state.session.start(),
        CallbackAction::NewPhoto => {
            state.session.reset();
            state.session.start()
        }
        CallbackAction::RemoveIngredient(index) => {
            state.session.remove_ingredient(index).map(|_| ())
        }
        CallbackAction::Diet(diet) => {
            state.session.set_dietary_preference(diet);
            Ok(())
        }
        CallbackAction::SelectRecipe(index) => state.session.select_recipe(index),
        CallbackAction::Back => state.session.back(),
        CallbackAction::EditIngredients => state.session.edit_ingredients(),
        CallbackAction::DismissError => {
            state.session.dismiss_error();
            Ok(())
        }
    };

    dialogue.update(state.clone()).await?;
    match result {
        Ok(()) => {
            show_screen(ctx, &state, message_id).await?;
        }
        Err(e) => notify_transition_error(ctx, &e).await?,
    }
    Ok(())
}

/// Ask for an expiry date or the allergy text
async fn prompt_for_input(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
    input: PendingInput,
) -> Result<()> {
    let phase = state.session.phase();
    if phase != Phase::Ingredients {
        dialogue.update(state).await?;
        return notify_transition_error(
            ctx,
            &TransitionError::InvalidTransition {
                from: phase,
                action: "prompt_input",
            },
        )
        .await;
    }

    let prompt = match input {
        PendingInput::ExpiryDate { index } => match state
            .session
            .ingredients()
            .get(index)
            .map(|ingredient| ingredient.name.clone())
        {
            Some(name) => ctx.t_args("expiry-prompt", &[("name", name.as_str())]),
            None => {
                let len = state.session.ingredients().len();
                dialogue.update(state).await?;
                return notify_transition_error(ctx, &TransitionError::IndexOutOfRange { index, len })
                    .await;
            }
        },
        PendingInput::Allergies => ctx.t("allergies-prompt"),
        PendingInput::None => return Ok(()),
    };

    state.pending_input = input;
    dialogue.update(state).await?;
    ctx.bot.send_message(ctx.chat_id, prompt).await?;
    Ok(())
}

/// Confirm a mock grocery order for the selected recipe's missing items
async fn order_missing_items(
    ctx: &HandlerContext<'_>,
    state: &ChatState,
    store_index: usize,
) -> Result<()> {
    let order = state
        .session
        .selected_recipe()
        .and_then(|recipe| place_mock_order(store_index, &recipe.missing_ingredients));

    match order {
        Some(_) => {
            ctx.bot.send_message(ctx.chat_id, ctx.t("market-ordered")).await?;
            Ok(())
        }
        None => {
            notify_transition_error(
                ctx,
                &TransitionError::InvalidTransition {
                    from: state.session.phase(),
                    action: "order",
                },
            )
            .await
        }
    }
}
