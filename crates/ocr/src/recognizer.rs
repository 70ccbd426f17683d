use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use image::GrayImage;
use thiserror::Error;

use crate::patterns::{re_date_like, re_decimal_amount};
use crate::types::OcrOutcome;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("no OCR provider available")]
    NoProviderAvailable,
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("empty input image")]
    EmptyInput,
}

/// Capability interface over a concrete OCR engine: normalized image in,
/// recognized text plus a confidence estimate out.
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this provider can currently serve requests. Expected to be
    /// cheap; availability is probed once at startup and only ever flips
    /// off afterwards.
    fn is_available(&self) -> bool;

    fn extract_text(&self, image: &GrayImage) -> Result<OcrOutcome, OcrError>;
}

/// Shared availability state. A provider that hits a fatal engine error
/// flips itself down with a reason and stays down for the process
/// lifetime; the flip is visible to concurrent selector lookups.
pub struct Availability {
    ok: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl Availability {
    pub fn up() -> Self {
        Self { ok: AtomicBool::new(true), reason: Mutex::new(None) }
    }

    pub fn down(reason: impl Into<String>) -> Self {
        Self { ok: AtomicBool::new(false), reason: Mutex::new(Some(reason.into())) }
    }

    pub fn is_up(&self) -> bool {
        self.ok.load(Ordering::SeqCst)
    }

    pub fn mark_down(&self, reason: impl Into<String>) {
        self.ok.store(false, Ordering::SeqCst);
        if let Ok(mut guard) = self.reason.lock() {
            *guard = Some(reason.into());
        }
    }

    pub fn reason(&self) -> Option<String> {
        self.reason.lock().ok().and_then(|guard| guard.clone())
    }
}

// ── Heuristic confidence ──────────────────────────────────────────────────────

/// Estimate how receipt-like a recognition result is, 0–100. Starts from
/// a 50 base; currency symbols, decimal amounts, date-like substrings,
/// and total/subtotal keywords each add 10; a garble ratio over 10%
/// subtracts 20.
pub fn score_text_confidence(text: &str) -> f32 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let mut score = 50.0f32;
    let lower = text.to_lowercase();

    if text.contains(['₹', '$', '€', '£', '¥']) || lower.contains("rs.") {
        score += 10.0;
    }
    if re_decimal_amount().is_match(text) {
        score += 10.0;
    }
    if re_date_like().is_match(text) {
        score += 10.0;
    }
    if lower.contains("total") || lower.contains("subtotal") || lower.contains("amount") {
        score += 10.0;
    }
    if garble_ratio(text) > 0.10 {
        score -= 20.0;
    }
    score.clamp(0.0, 100.0)
}

/// Share of non-whitespace characters outside the set a receipt can
/// legitimately contain.
fn garble_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut garbled = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if !is_expected_char(c) {
            garbled += 1;
        }
    }
    if total == 0 {
        return 1.0;
    }
    garbled as f32 / total as f32
}

fn is_expected_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '.' | ','
                | ':'
                | ';'
                | '/'
                | '-'
                | '#'
                | '*'
                | '('
                | ')'
                | '&'
                | '@'
                | '\''
                | '"'
                | '%'
                | '+'
                | '='
                | '₹'
                | '$'
                | '€'
                | '£'
                | '¥'
        )
}

// ── Mock provider (always compiled, used by tests and development) ────────────

/// Returns a preset string — lets the rest of the pipeline be exercised
/// without an OCR engine installed.
pub struct MockProvider {
    name: String,
    text: String,
    availability: Availability,
}

impl MockProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self::named("mock", text)
    }

    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into(), availability: Availability::up() }
    }

    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            availability: Availability::down("disabled for test"),
        }
    }

    /// Simulate the fatal-engine-error path.
    pub fn fail(&self, reason: &str) {
        self.availability.mark_down(reason);
    }
}

impl OcrProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.availability.is_up()
    }

    fn extract_text(&self, image: &GrayImage) -> Result<OcrOutcome, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::EmptyInput);
        }
        let started = Instant::now();
        Ok(OcrOutcome {
            confidence: score_text_confidence(&self.text),
            text: self.text.clone(),
            duration: started.elapsed(),
            width: image.width(),
            height: image.height(),
        })
    }
}

// ── Tesseract provider (optional, requires system libtesseract) ───────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{score_text_confidence, Availability, OcrError, OcrProvider};
    use crate::config::OcrConfig;
    use crate::types::OcrOutcome;
    use image::GrayImage;
    use leptess::{LepTess, Variable};
    use std::io::Cursor;
    use std::time::Instant;

    /// Characters the engine may emit: receipts are labels, numbers, and
    /// currency markers. Everything else is noise worth suppressing.
    const CHAR_WHITELIST: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,:;/%-#*()&@'₹$€£";

    pub struct TesseractProvider {
        data_path: Option<String>,
        lang: String,
        page_seg_mode: Option<String>,
        availability: Availability,
    }

    impl TesseractProvider {
        /// Build from config and smoke-test the engine against a tiny
        /// synthetic image; a failed probe caches the provider as
        /// unavailable so the selector skips it without retrying.
        pub fn from_config(config: &OcrConfig) -> Self {
            let data_path = config
                .resolve_data_path()
                .map(|p| p.to_string_lossy().into_owned());
            let provider = Self {
                data_path,
                lang: config.language.clone(),
                page_seg_mode: config.page_seg_mode.clone(),
                availability: Availability::up(),
            };
            let blank = GrayImage::from_pixel(32, 32, image::Luma([255u8]));
            if let Err(e) = provider.recognize(&blank) {
                tracing::warn!("tesseract probe failed: {e}");
                provider.availability.mark_down(e.to_string());
            }
            provider
        }

        fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
            let mut engine = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            let _ = engine.set_variable(Variable::TesseditCharWhitelist, CHAR_WHITELIST);
            if let Some(psm) = &self.page_seg_mode {
                let _ = engine.set_variable(Variable::TesseditPagesegMode, psm);
            }

            let mut png = Vec::new();
            image::DynamicImage::ImageLuma8(image.clone())
                .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            engine
                .set_image_from_mem(&png)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            engine
                .get_utf8_text()
                .map_err(|e| OcrError::Engine(e.to_string()))
        }
    }

    impl OcrProvider for TesseractProvider {
        fn name(&self) -> &str {
            "tesseract"
        }

        fn is_available(&self) -> bool {
            self.availability.is_up()
        }

        fn extract_text(&self, image: &GrayImage) -> Result<OcrOutcome, OcrError> {
            if image.width() == 0 || image.height() == 0 {
                return Err(OcrError::EmptyInput);
            }
            let started = Instant::now();
            match self.recognize(image) {
                Ok(text) => Ok(OcrOutcome {
                    confidence: score_text_confidence(&text),
                    text,
                    duration: started.elapsed(),
                    width: image.width(),
                    height: image.height(),
                }),
                Err(e) => {
                    // Engine failures during real use are fatal for this
                    // provider; subsequent selector calls skip it.
                    tracing::warn!("tesseract failed, marking unavailable: {e}");
                    self.availability.mark_down(e.to_string());
                    Err(e)
                }
            }
        }
    }
}
