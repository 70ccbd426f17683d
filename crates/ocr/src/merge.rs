use std::collections::{BTreeMap, HashSet};

use rasid_core::{Category, Currency, Money};

use crate::items::MAX_ITEMS;
use crate::types::{field, ExtractedItem, FieldConfidence, ImageQuality, ReceiptRecord};

/// Phrases that mark a page as carrying the authoritative bill total;
/// that page's amount wins outright.
const AUTHORITATIVE_TOTAL_MARKERS: &[&str] =
    &["total invoice amount", "net payable", "total received amount"];

/// Amount confidence assumed for a page that extracted an amount without
/// recording a confidence entry.
const UNTRACKED_AMOUNT_SCORE: f32 = 0.5;

/// Combine per-page extraction results for one physical multi-page
/// receipt into a single record. Page order matters: page 1 is assumed
/// to carry the header, and several fields are first-non-null. The
/// returned record owns fresh collections.
pub fn merge_pages(pages: Vec<ReceiptRecord>) -> ReceiptRecord {
    let mut merchant: Option<String> = None;
    let mut merchant_conf: Option<FieldConfidence> = None;
    let mut amount: Option<Money> = None;
    let mut amount_conf: Option<FieldConfidence> = None;
    let mut amount_score = 0.0f32;
    let mut date = None;
    let mut date_conf: Option<FieldConfidence> = None;
    let mut subtotal: Option<Money> = None;
    let mut payment_method = None;
    let mut payment_conf: Option<FieldConfidence> = None;
    let mut suggested_category = Category::Uncategorized;
    let mut tax: Option<Money> = None;

    let mut items: Vec<ExtractedItem> = Vec::new();
    let mut seen_items: HashSet<(String, i64)> = HashSet::new();
    let mut currency_votes: Vec<(Currency, usize)> = Vec::new();
    let mut raw_pages: Vec<String> = Vec::new();
    let mut warnings = vec![format!("merged {} page(s)", pages.len())];

    for (idx, page) in pages.iter().enumerate() {
        let page_no = idx + 1;

        if merchant.is_none() {
            if let Some(m) = page.merchant.as_ref().filter(|m| !m.trim().is_empty()) {
                merchant = Some(m.clone());
                merchant_conf = page.confidence.get(field::MERCHANT).cloned();
            }
        }

        if let Some(page_amount) = page.amount {
            let mut score = page
                .confidence
                .get(field::AMOUNT)
                .map(|c| c.score)
                .unwrap_or(UNTRACKED_AMOUNT_SCORE);
            let lower = page.raw_text.to_lowercase();
            let forced = AUTHORITATIVE_TOTAL_MARKERS.iter().any(|m| lower.contains(m));
            if forced {
                score = 1.0;
            }
            if amount.is_none() || score > amount_score {
                amount = Some(page_amount);
                amount_score = score;
                amount_conf = if forced {
                    Some(FieldConfidence {
                        level: crate::types::ConfidenceLevel::High,
                        reason: "authoritative total marker".to_string(),
                        score: 1.0,
                    })
                } else {
                    page.confidence.get(field::AMOUNT).cloned()
                };
            }
        }

        if date.is_none() {
            if let Some(d) = page.date {
                date = Some(d);
                date_conf = page.confidence.get(field::DATE).cloned();
            }
        }
        if subtotal.is_none() {
            subtotal = page.subtotal;
        }
        if payment_method.is_none() {
            if let Some(pm) = page.payment_method.clone() {
                payment_method = Some(pm);
                payment_conf = page.confidence.get(field::PAYMENT_METHOD).cloned();
            }
        }
        if suggested_category == Category::Uncategorized {
            suggested_category = page.suggested_category;
        }

        // Multi-page bills list GST lines per page section; sum them.
        if let Some(t) = page.tax {
            tax = Some(tax.map_or(t, |acc| acc + t));
        }

        for item in &page.items {
            if items.len() >= MAX_ITEMS {
                break;
            }
            if seen_items.insert(item.dedup_key()) {
                items.push(item.clone());
            }
        }

        match currency_votes.iter_mut().find(|(c, _)| *c == page.currency) {
            Some((_, count)) => *count += 1,
            None => currency_votes.push((page.currency, 1)),
        }

        raw_pages.push(format!("--- PAGE {page_no} ---\n{}", page.raw_text));
        for w in &page.warnings {
            warnings.push(format!("page {page_no}: {w}"));
        }
    }

    // Majority vote, ties resolved by first appearance.
    let mut winner: Option<(Currency, usize)> = None;
    for (c, count) in &currency_votes {
        if winner.map_or(true, |(_, best)| *count > best) {
            winner = Some((*c, *count));
        }
    }
    let currency = winner.map(|(c, _)| c).unwrap_or(Currency::Inr);

    let image_quality = pages
        .iter()
        .map(|p| p.image_quality)
        .min()
        .unwrap_or(ImageQuality::Poor);

    let overall_confidence = if pages.is_empty() {
        0.0
    } else {
        pages.iter().map(|p| p.overall_confidence).sum::<f32>() / pages.len() as f32
    };

    let mut confidence = BTreeMap::new();
    if let Some(c) = merchant_conf {
        confidence.insert(field::MERCHANT.to_string(), c);
    }
    if let Some(c) = amount_conf {
        confidence.insert(field::AMOUNT.to_string(), c);
    }
    if let Some(c) = date_conf {
        confidence.insert(field::DATE.to_string(), c);
    }
    if tax.is_some() {
        confidence.insert(
            field::TAX.to_string(),
            FieldConfidence::medium("summed across pages"),
        );
    }
    if let Some(c) = payment_conf {
        confidence.insert(field::PAYMENT_METHOD.to_string(), c);
    }

    let processing_time_ms = pages.iter().map(|p| p.processing_time_ms).sum();

    ReceiptRecord {
        merchant,
        amount,
        date,
        tax,
        subtotal,
        currency,
        payment_method,
        items,
        confidence,
        overall_confidence,
        raw_text: raw_pages.join("\n"),
        processing_time_ms,
        image_quality,
        suggested_category,
        warnings,
    }
}
