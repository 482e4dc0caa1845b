use anyhow::Result;
use fridge_lens::bot::{self, BotServices};
use fridge_lens::card::raster::load_fonts;
use fridge_lens::config::AppConfig;
use fridge_lens::dialogue::{ChatState, FridgeDialogue};
use fridge_lens::errors::error_logging;
use fridge_lens::gateway::GeminiGateway;
use fridge_lens::localization::LocalizationManager;
use fridge_lens::observability::{self, ReadinessChecks};
use fridge_lens::share::CardExporter;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    // Load and validate configuration before anything starts
    let config = AppConfig::from_env()?;
    config.validate()?;

    // Card fonts are optional at startup; without them sharing fails and readiness reports it
    let fonts = load_fonts(&config.card).map(Arc::new);

    observability::init_observability(
        &config.observability,
        config.server.metrics_port,
        ReadinessChecks {
            gemini: config.gemini.clone(),
            fonts: fonts.as_ref().ok().cloned(),
            bot_token: config.bot.token.clone(),
        },
    )
    .await?;

    info!("{}", config.summary());

    let exporter = match fonts {
        Ok(fonts) => Some(CardExporter::new(fonts)),
        Err(e) => {
            error_logging::log_config_error(&e, "CARD_FONT_PATH", "load_fonts");
            warn!("Recipe card export disabled until fonts are available");
            None
        }
    };

    let localization =
        Arc::new(LocalizationManager::new()?.with_default_language(&config.bot.default_language));

    let gateway = Arc::new(GeminiGateway::new(&config.gemini, Arc::clone(&localization))?);
    info!(model = %gateway.model(), "Gemini gateway initialized");

    let services = Arc::new(BotServices {
        localization,
        extractor: gateway.clone(),
        generator: gateway,
        exporter,
        max_image_size_bytes: config.capture.max_image_size_bytes,
        share_as_photo: config.bot.share_as_photo,
    });

    // Initialize the bot with custom client configuration for better reliability
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    info!(
        timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    // Create shared dialogue storage
    let dialogue_storage = InMemStorage::<ChatState>::new();

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let storage = dialogue_storage.clone();
            let services = Arc::clone(&services);
            move |bot: Bot, msg: Message| {
                let services = Arc::clone(&services);
                let dialogue = FridgeDialogue::new(storage.clone(), msg.chat.id);
                async move { bot::message_handler(bot, msg, dialogue, services).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let storage = dialogue_storage.clone();
            let services = Arc::clone(&services);
            move |bot: Bot, q: CallbackQuery| {
                let services = Arc::clone(&services);
                // Use the chat ID from the message that contained the inline keyboard
                let chat_id = bot::callbacks::callback_handler::callback_chat_id(&q);
                let dialogue = FridgeDialogue::new(storage.clone(), chat_id);
                async move { bot::callback_handler(bot, q, dialogue, services).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
