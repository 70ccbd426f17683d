use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rasid_core::{Category, Currency, Money};

/// Keys used in a receipt's confidence map. Absence of a key means the
/// extractor could not determine the field at all.
pub mod field {
    pub const MERCHANT: &str = "merchant";
    pub const AMOUNT: &str = "amount";
    pub const DATE: &str = "date";
    pub const TAX: &str = "tax";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const CURRENCY: &str = "currency";
}

/// Coarse strength rating attached to each extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Canonical numeric score, fed into the weighted overall confidence.
    pub fn score(self) -> f32 {
        match self {
            ConfidenceLevel::High => 0.9,
            ConfidenceLevel::Medium => 0.6,
            ConfidenceLevel::Low => 0.3,
        }
    }
}

/// How strongly the source text supported one extracted field, with a
/// human-readable note for the review UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub level: ConfidenceLevel,
    pub reason: String,
    pub score: f32,
}

impl FieldConfidence {
    pub fn new(level: ConfidenceLevel, reason: impl Into<String>) -> Self {
        Self { level, reason: reason.into(), score: level.score() }
    }

    pub fn high(reason: impl Into<String>) -> Self {
        Self::new(ConfidenceLevel::High, reason)
    }

    pub fn medium(reason: impl Into<String>) -> Self {
        Self::new(ConfidenceLevel::Medium, reason)
    }

    pub fn low(reason: impl Into<String>) -> Self {
        Self::new(ConfidenceLevel::Low, reason)
    }
}

/// Post-normalization grade of the scan, used as a downstream confidence
/// signal. Ordered worst-first so `Iterator::min` picks the worst page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    Poor,
    #[default]
    Fair,
    Good,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    CreditCard,
    DebitCard,
    NetBanking,
    Wallet,
    Cash,
    Cheque,
    Other(String),
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "UPI"),
            PaymentMethod::CreditCard => write!(f, "Credit Card"),
            PaymentMethod::DebitCard => write!(f, "Debit Card"),
            PaymentMethod::NetBanking => write!(f, "Net Banking"),
            PaymentMethod::Wallet => write!(f, "Wallet"),
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Cheque => write!(f, "Cheque"),
            PaymentMethod::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One line item recovered from the body of a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Money>,
    pub total_price: Money,
    pub confidence: ConfidenceLevel,
}

impl ExtractedItem {
    /// Items are deduplicated by normalized description plus 2-dp total;
    /// repeated OCR artifacts of the same row collapse to one entry.
    pub fn dedup_key(&self) -> (String, i64) {
        (self.description.trim().to_lowercase(), self.total_price.to_paise())
    }
}

/// One recognition pass over a normalized image. A failed pass is the
/// `Err` arm of the provider call, not a flag on this struct.
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub text: String,
    /// Engine confidence, 0–100.
    pub confidence: f32,
    pub duration: Duration,
    pub width: u32,
    pub height: u32,
}

/// The fully extracted, confidence-annotated representation of a receipt.
/// For multi-page input the merger rebuilds one of these owning fresh
/// collections, never aliasing any single page's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub merchant: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub tax: Option<Money>,
    pub subtotal: Option<Money>,
    pub currency: Currency,
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<ExtractedItem>,
    pub confidence: BTreeMap<String, FieldConfidence>,
    /// Weighted mean over the confidence map; 0.0 when the map is empty.
    pub overall_confidence: f32,
    pub raw_text: String,
    pub processing_time_ms: u64,
    pub image_quality: ImageQuality,
    pub suggested_category: Category,
    pub warnings: Vec<String>,
}

impl ReceiptRecord {
    /// Whether the extraction is good enough to auto-file without human
    /// review.
    pub fn needs_review(&self) -> bool {
        self.overall_confidence < 0.7
    }
}
