use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid size string: '{0}'")]
    InvalidSize(String),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime configuration for the receipt pipeline. Consumed, never
/// produced, by this crate; the surrounding service loads and owns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Master switch for the normalization steps (resize, contrast
    /// stretch, sharpen). Validation and decoding always run.
    pub preprocessing: bool,
    pub max_width: u32,
    pub max_height: u32,
    /// Comma-separated upload extension whitelist.
    pub allowed_extensions: String,
    /// Upload ceiling as a size string, e.g. "10MB".
    pub max_upload_size: String,
    /// Tesseract language pack.
    pub language: String,
    /// Tesseract page segmentation mode, passed through to the engine
    /// when set.
    pub page_seg_mode: Option<String>,
    /// Explicit tessdata directory. When unset, resolution falls through
    /// the conventional locations (see `resolve_data_path`).
    pub data_path: Option<PathBuf>,
    pub limits: ExtractorLimits,
}

/// Empirical extraction thresholds, tuned on observed regional receipts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorLimits {
    /// A per-line price above this is treated as OCR concatenation
    /// garbage and the line is rejected.
    pub price_ceiling: Decimal,
    /// How far a taxable-value line may drift from a buffered item total
    /// and still describe the same item.
    pub hsn_merge_tolerance: Decimal,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            preprocessing: true,
            max_width: 2048,
            max_height: 2048,
            allowed_extensions: "jpg,jpeg,png,bmp,tiff,webp".to_string(),
            max_upload_size: "10MB".to_string(),
            language: "eng".to_string(),
            page_seg_mode: None,
            data_path: None,
            limits: ExtractorLimits::default(),
        }
    }
}

impl Default for ExtractorLimits {
    fn default() -> Self {
        Self {
            price_ceiling: Decimal::from(50_000),
            hsn_merge_tolerance: Decimal::ONE,
        }
    }
}

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Install locations probed when no tessdata directory is configured.
const SYSTEM_TESSDATA_DIRS: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
    "C:\\Program Files\\Tesseract-OCR\\tessdata",
];

impl OcrConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions
            .split(',')
            .map(str::trim)
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// Parsed upload ceiling. A malformed size string falls back to the
    /// 10 MB default with a warning instead of rejecting every upload.
    pub fn max_upload_bytes(&self) -> u64 {
        match parse_size(&self.max_upload_size) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("{e}; using {DEFAULT_MAX_UPLOAD_BYTES} bytes");
                DEFAULT_MAX_UPLOAD_BYTES
            }
        }
    }

    /// Resolution order: explicit config path, build-output conventions,
    /// executable-adjacent directory, OS install locations. `None` means
    /// the engine runs with its compiled-in default.
    pub fn resolve_data_path(&self) -> Option<PathBuf> {
        if let Some(configured) = &self.data_path {
            if configured.is_dir() {
                return Some(configured.clone());
            }
            tracing::warn!(
                "configured tessdata path {} not found; probing defaults",
                configured.display()
            );
        }

        let mut candidates = vec![PathBuf::from("tessdata"), PathBuf::from("target/tessdata")];
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("tessdata"));
            }
        }
        candidates.extend(SYSTEM_TESSDATA_DIRS.iter().map(PathBuf::from));

        let found = candidates.into_iter().find(|c| c.is_dir());
        if found.is_none() {
            tracing::warn!("no tessdata directory found; engine default will be used");
        }
        found
    }
}

/// Parse a human size string ("10MB", "512kb", "1GB", "4096") into bytes.
pub fn parse_size(s: &str) -> Result<u64, ConfigError> {
    let trimmed = s.trim();
    let upper = trimmed.to_uppercase();
    let (digits, multiplier) = if let Some(rest) = upper.strip_suffix("GB") {
        (rest, 1024 * 1024 * 1024)
    } else if let Some(rest) = upper.strip_suffix("MB") {
        (rest, 1024 * 1024)
    } else if let Some(rest) = upper.strip_suffix("KB") {
        (rest, 1024)
    } else if let Some(rest) = upper.strip_suffix('B') {
        (rest, 1)
    } else {
        (upper.as_str(), 1)
    };
    digits
        .trim()
        .parse::<u64>()
        .map(|n| n * multiplier)
        .map_err(|_| ConfigError::InvalidSize(s.to_string()))
}
