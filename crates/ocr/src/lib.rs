pub mod config;
pub mod extract;
pub mod items;
pub mod merge;
pub(crate) mod patterns;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod selector;
pub mod types;

pub use config::{ConfigError, ExtractorLimits, OcrConfig};
pub use extract::Extractor;
pub use merge::merge_pages;
pub use pipeline::{PipelineError, ReceiptPipeline};
pub use preprocess::{assess_quality, normalize, validate, InvalidImageError};
pub use recognizer::{score_text_confidence, MockProvider, OcrError, OcrProvider};
pub use selector::ProviderSelector;
pub use types::{
    ConfidenceLevel, ExtractedItem, FieldConfidence, ImageQuality, OcrOutcome, PaymentMethod,
    ReceiptRecord,
};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractProvider;
