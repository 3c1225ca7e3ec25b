use shared::Language;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::storage::KeyValueStorage;

pub const LANGUAGE_KEY: &str = "nutrition_language";

/// Persists the UI language preference as a bare language code
#[derive(Clone)]
pub struct LanguageService {
    storage: Arc<dyn KeyValueStorage>,
}

impl LanguageService {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Stored language, or English when nothing usable is stored
    pub async fn current(&self) -> Language {
        match self.storage.get_item(LANGUAGE_KEY).await {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                warn!("Ignoring unknown stored language code '{}'", code);
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!("Failed to read language preference: {}", e);
                Language::default()
            }
        }
    }

    pub async fn set(&self, language: Language) -> AppResult<Language> {
        self.storage.set_item(LANGUAGE_KEY, language.code()).await?;
        info!("Language set to {}", language.code());
        Ok(language)
    }

    /// Switch between the two supported languages
    pub async fn toggle(&self) -> AppResult<Language> {
        let next = self.current().await.toggled();
        self.set(next).await
    }
}
