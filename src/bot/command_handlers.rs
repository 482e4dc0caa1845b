//! Command Handlers module for processing bot commands

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use super::dialogue_manager::show_screen;
use super::HandlerContext;
use crate::dialogue::{ChatState, FridgeDialogue};

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// `/new` or `/reset`: drop the current session and go back home
    New,
}

impl Command {
    /// Parse the first word of a message; `@botname` suffixes are ignored
    pub fn parse(text: &str) -> Option<Self> {
        let command = text.split_whitespace().next()?;
        let command = command.split('@').next().unwrap_or(command);

        match command.to_lowercase().as_str() {
            "/start" => Some(Command::Start),
            "/help" => Some(Command::Help),
            "/new" | "/reset" => Some(Command::New),
            _ => None,
        }
    }
}

/// Handle the /start command: a fresh session on the camera screen
pub async fn handle_start_command(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
) -> Result<()> {
    debug!(chat_id = %ctx.chat_id, "Handling /start command");

    state.session.reset();
    state.session.start()?;
    state.take_pending_input();
    dialogue.update(state.clone()).await?;

    ctx.bot
        .send_message(
            ctx.chat_id,
            format!("{}\n\n{}", ctx.t("welcome-title"), ctx.t("welcome-description")),
        )
        .await?;
    show_screen(ctx, &state, None).await?;
    Ok(())
}

/// Handle the /help command
pub async fn handle_help_command(ctx: &HandlerContext<'_>) -> Result<()> {
    ctx.bot.send_message(ctx.chat_id, ctx.t("help-text")).await?;
    Ok(())
}

/// Handle /new: clear the session and show the home screen.
///
/// Works from every state, including one left busy by a failed call.
pub async fn handle_new_command(
    ctx: &HandlerContext<'_>,
    dialogue: &FridgeDialogue,
    mut state: ChatState,
) -> Result<()> {
    state.session.reset();
    state.take_pending_input();
    dialogue.update(state.clone()).await?;

    ctx.bot.send_message(ctx.chat_id, ctx.t("reset-done")).await?;
    show_screen(ctx, &state, None).await?;
    Ok(())
}

/// Handle unsupported message types
pub async fn handle_unsupported_message(ctx: &HandlerContext<'_>) -> Result<()> {
    debug!(chat_id = %ctx.chat_id, "Received unsupported message type from user");
    ctx.bot
        .send_message(ctx.chat_id, ctx.t("unsupported-message"))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/HELP"), Some(Command::Help));
        assert_eq!(Command::parse("/new@FridgeLensBot"), Some(Command::New));
        assert_eq!(Command::parse("/reset now"), Some(Command::New));
        assert_eq!(Command::parse("/recipes"), None);
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("   "), None);
    }
}
