use std::sync::Arc;

use crate::recognizer::{OcrError, OcrProvider};

/// Picks the OCR provider to serve a request: first registered provider
/// reporting itself available wins. Registration order is the fallback
/// order; a provider that flipped itself down is skipped without retry.
pub struct ProviderSelector {
    providers: Vec<Arc<dyn OcrProvider>>,
}

impl ProviderSelector {
    pub fn new(providers: Vec<Arc<dyn OcrProvider>>) -> Self {
        Self { providers }
    }

    pub fn select(&self) -> Result<Arc<dyn OcrProvider>, OcrError> {
        self.providers
            .iter()
            .find(|p| p.is_available())
            .cloned()
            .ok_or(OcrError::NoProviderAvailable)
    }

    pub fn is_available(&self) -> bool {
        self.providers.iter().any(|p| p.is_available())
    }

    pub fn active_provider_name(&self) -> Option<String> {
        self.select().ok().map(|p| p.name().to_string())
    }
}
