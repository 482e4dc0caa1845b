use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Languages with a bundle under `locales/`
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "tr"];

/// Fallback language when the user's language is not supported
pub const DEFAULT_LANGUAGE: &str = "en";

/// Localization manager for FridgeLens
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationManager")
            .field("languages", &self.bundles.keys().collect::<Vec<_>>())
            .field("default_language", &self.default_language)
            .finish()
    }
}

impl LocalizationManager {
    /// Create a new localization manager from the default locales directory
    pub fn new() -> Result<Self> {
        Self::with_locales_dir(default_locales_dir())
    }

    /// Create a localization manager reading `<dir>/<lang>/main.ftl` files
    pub fn with_locales_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut bundles = HashMap::new();

        for locale_str in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            let bundle = Self::create_bundle(dir.as_ref(), &locale)?;
            bundles.insert(locale_str.to_string(), bundle);
        }

        Ok(Self {
            bundles,
            default_language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    /// Use another supported language as the fallback
    pub fn with_default_language(mut self, language: &str) -> Self {
        if self.bundles.contains_key(language) {
            self.default_language = language.to_string();
        } else {
            warn!(language = %language, "Unsupported default language, keeping {}", self.default_language);
        }
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        dir: &Path,
        locale: &LanguageIdentifier,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Prompts are sent to the model verbatim; no bidi isolation marks
        bundle.set_use_isolating(false);

        let resource_path = dir.join(locale.to_string()).join("main.ftl");
        match fs::read_to_string(&resource_path) {
            Ok(content) => {
                let resource = match FluentResource::try_new(content) {
                    Ok(resource) => resource,
                    Err((resource, errors)) => {
                        warn!(
                            path = %resource_path.display(),
                            error_count = errors.len(),
                            "Fluent resource has syntax errors, using the parsable entries"
                        );
                        resource
                    }
                };
                if let Err(errors) = bundle.add_resource(resource) {
                    warn!(
                        path = %resource_path.display(),
                        error_count = errors.len(),
                        "Duplicate fluent messages ignored"
                    );
                }
                debug!(path = %resource_path.display(), "Loaded fluent resource");
            }
            Err(e) => {
                warn!(path = %resource_path.display(), error = %e, "Fluent resource not found");
            }
        }

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self.bundles.get(language) {
            Some(bundle) => bundle,
            None => match self.bundles.get(&self.default_language) {
                Some(bundle) => bundle,
                None => return format!("Missing translation: {}", key),
            },
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = match args {
            Some(args) => {
                let mut fluent_args = FluentArgs::new();
                for (k, v) in args {
                    fluent_args.set(*k, FluentValue::from(*v));
                }
                bundle.format_pattern(pattern, Some(&fluent_args), &mut errors)
            }
            None => bundle.format_pattern(pattern, None, &mut errors),
        };

        if !errors.is_empty() {
            debug!(key = %key, language = %language, error_count = errors.len(), "Fluent formatting reported errors");
        }

        value.into_owned()
    }

    /// Get a localized message with arguments in a specific language
    pub fn get_message_with_args_in_language(
        &self,
        key: &str,
        language: &str,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }
}

/// `LOCALES_DIR` when set, otherwise the `locales/` directory of this crate
pub fn default_locales_dir() -> PathBuf {
    std::env::var("LOCALES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/locales")))
}

/// Create a shared localization manager
pub fn create_localization_manager() -> Result<Arc<LocalizationManager>> {
    Ok(Arc::new(LocalizationManager::new()?))
}

/// Convenience function to get a localized message in user's language
pub fn t_lang(manager: &LocalizationManager, key: &str, language_code: Option<&str>) -> String {
    let language = detect_language(manager, language_code);
    manager.get_message_in_language(key, &language, None)
}

/// Convenience function to get a localized message with arguments in user's language
pub fn t_args_lang(
    manager: &LocalizationManager,
    key: &str,
    args: &[(&str, &str)],
    language_code: Option<&str>,
) -> String {
    let language = detect_language(manager, language_code);
    manager.get_message_with_args_in_language(key, &language, args)
}

/// Detect the appropriate language based on the user's Telegram language code
pub fn detect_language(manager: &LocalizationManager, language_code: Option<&str>) -> String {
    if let Some(code) = language_code {
        // Extract language code (e.g., "tr-TR" -> "tr", "en-US" -> "en")
        let lang = code.split(['-', '_']).next().unwrap_or(code).to_lowercase();

        if manager.is_language_supported(&lang) {
            return lang;
        }
    }

    manager.default_language().to_string()
}
