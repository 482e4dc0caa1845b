//! Gemini `generateContent` client implementing both gateway capabilities.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Instrument};

use crate::capture::CapturedImage;
use crate::config::GeminiConfig;
use crate::errors::{error_logging, AppError, AppResult, FridgeError};
use crate::localization::LocalizationManager;
use crate::model::Recipe;
use crate::observability;

use super::prompts::{difficulty_labels, extraction_prompt, recipe_prompt};
use super::sanitize::{parse_ingredient_response, parse_recipe_response};
use super::schema::{ingredient_response_schema, recipe_response_schema};
use super::{IngredientExtractor, RecipeGenerator, RecipeRequest};

/// Default model to use
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate, empty when absent
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default()
    }
}

/// Hosted model gateway backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    localization: Arc<LocalizationManager>,
}

impl std::fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiGateway {
    /// Build a gateway with its own HTTP client honouring the configured timeout
    pub fn new(config: &GeminiConfig, localization: Arc<LocalizationManager>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create Gemini HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
            localization,
        ))
    }

    pub fn with_client(
        client: Client,
        api_key: String,
        model: String,
        base_url: String,
        localization: Arc<LocalizationManager>,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            localization,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// POST one request and return the answer text
    async fn generate_content(&self, request: &GeminiRequest) -> Result<String, String> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API returned {}: {}", status, body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response envelope: {}", e))?;

        Ok(parsed.into_text())
    }

    fn localized(&self, key: &str, language: &str) -> String {
        self.localization.get_message_in_language(key, language, None)
    }

    fn finish<T>(
        &self,
        operation: &str,
        started: Instant,
        result: Result<T, String>,
        on_error: impl FnOnce() -> FridgeError,
    ) -> Result<T, FridgeError> {
        let elapsed = started.elapsed();
        observability::record_gateway_metrics(operation, result.is_ok(), elapsed);

        result.map_err(|detail| {
            error_logging::log_gateway_error(&detail, operation, &self.model, Some(elapsed));
            observability::record_error_metrics(operation, "gateway");
            on_error()
        })
    }
}

#[async_trait]
impl IngredientExtractor for GeminiGateway {
    async fn extract_ingredients(
        &self,
        image: &CapturedImage,
        language: &str,
    ) -> Result<Vec<String>, FridgeError> {
        let span = observability::gateway_span("extract_ingredients", &self.model);
        let started = Instant::now();

        let result = async {
            let jpeg = image.to_jpeg().map_err(|e| e.to_string())?;
            debug!(image_bytes = jpeg.len(), "Submitting fridge photo for ingredient extraction");

            let request = GeminiRequest {
                contents: vec![Content {
                    parts: vec![
                        Part::InlineData {
                            inline_data: InlineData {
                                mime_type: "image/jpeg".to_string(),
                                data: general_purpose::STANDARD.encode(&jpeg),
                            },
                        },
                        Part::Text {
                            text: extraction_prompt(&self.localization, language),
                        },
                    ],
                }],
                generation_config: GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: ingredient_response_schema(),
                },
            };

            let text = self.generate_content(&request).await?;
            parse_ingredient_response(&text)
        }
        .instrument(span)
        .await;

        let ingredients = self.finish("extract_ingredients", started, result, || {
            FridgeError::Analysis(self.localized("error-analysis", language))
        })?;

        info!(
            ingredient_count = ingredients.len(),
            model = %self.model,
            "Ingredient extraction completed"
        );
        Ok(ingredients)
    }
}

#[async_trait]
impl RecipeGenerator for GeminiGateway {
    async fn generate_recipes(&self, request: &RecipeRequest) -> Result<Vec<Recipe>, FridgeError> {
        let span = observability::gateway_span("generate_recipes", &self.model);
        let started = Instant::now();
        let language = request.language.as_str();

        let result = async {
            let prompt = recipe_prompt(&self.localization, request);
            debug!(
                ingredient_count = request.ingredients.len(),
                dietary_preference = %request.dietary_preference.key(),
                "Requesting recipes"
            );

            let body = GeminiRequest {
                contents: vec![Content {
                    parts: vec![Part::Text { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: recipe_response_schema(&difficulty_labels(
                        &self.localization,
                        language,
                    )),
                },
            };

            let text = self.generate_content(&body).await?;
            parse_recipe_response(&text)
        }
        .instrument(span)
        .await;

        let recipes = self.finish("generate_recipes", started, result, || {
            FridgeError::RecipeGeneration(self.localized("error-recipe-generation", language))
        })?;

        info!(
            recipe_count = recipes.len(),
            model = %self.model,
            "Recipe generation completed"
        );
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                    Part::Text {
                        text: "hello".to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({"type": "OBJECT"}),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(value["contents"][0]["parts"][1]["text"], "hello");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_defaults_to_empty() {
        let empty: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.into_text(), "");

        let blocked: GeminiResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert_eq!(blocked.into_text(), "");

        let answer: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}]}}]
        }))
        .unwrap();
        assert_eq!(answer.into_text(), "[]");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let localization = Arc::new(LocalizationManager::new().unwrap());
        let gateway = GeminiGateway::with_client(
            Client::new(),
            "secret-key".to_string(),
            DEFAULT_MODEL.to_string(),
            format!("{}/", API_BASE_URL),
            localization,
        );
        let debug = format!("{:?}", gateway);
        assert!(!debug.contains("secret-key"));
        assert_eq!(
            gateway.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
