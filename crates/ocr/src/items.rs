use std::collections::HashSet;

use rust_decimal::Decimal;

use rasid_core::Money;

use crate::config::ExtractorLimits;
use crate::patterns::{
    re_date_any, re_item_bare, re_item_coded, re_item_hsn, re_item_qty_price,
    ITEM_SKIP_KEYWORDS,
};
use crate::types::{ConfidenceLevel, ExtractedItem};

/// Cap on retained line items; receipts longer than this are summarized
/// by their first rows.
pub const MAX_ITEMS: usize = 20;

/// A coded row (item code, qty, unit price, total) carries no
/// description; it is buffered until the description line shows up.
struct PendingItem {
    quantity: Decimal,
    unit_price: Money,
    total: Money,
}

/// Recover line items from receipt text. Four layered patterns are tried
/// per line, first match wins; summary lines are skipped up front; the
/// result is deduplicated and capped at [`MAX_ITEMS`].
pub fn extract_items(text: &str, limits: &ExtractorLimits) -> Vec<ExtractedItem> {
    let mut items: Vec<ExtractedItem> = Vec::new();
    let mut seen: HashSet<(String, i64)> = HashSet::new();
    let mut pending: Option<PendingItem> = None;

    for raw_line in text.lines() {
        if items.len() >= MAX_ITEMS {
            break;
        }
        let line = raw_line.trim();
        if line.is_empty() || is_item_skip_line(line) {
            continue;
        }

        if let Some(caps) = re_item_coded().captures(line) {
            pending = parse_coded_row(&caps, limits);
            continue;
        }

        if let Some(caps) = re_item_hsn().captures(line) {
            // The coded row's totals pair with this row's description when
            // the taxable value lines up; otherwise the row stands alone.
            if let Some(item) = parse_hsn_row(&caps, pending.take(), limits) {
                push_deduped(&mut items, &mut seen, item);
            }
            continue;
        }

        if let Some(caps) = re_item_qty_price().captures(line) {
            if let Some(item) = parse_qty_price_row(&caps) {
                push_deduped(&mut items, &mut seen, item);
            }
            continue;
        }

        if let Some(caps) = re_item_bare().captures(line) {
            if let Some(item) = parse_bare_row(&caps) {
                push_deduped(&mut items, &mut seen, item);
            }
        }
    }

    items
}

fn is_item_skip_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    ITEM_SKIP_KEYWORDS.iter().any(|k| lower.contains(k)) || re_date_any().is_match(line)
}

fn push_deduped(
    items: &mut Vec<ExtractedItem>,
    seen: &mut HashSet<(String, i64)>,
    item: ExtractedItem,
) {
    if seen.insert(item.dedup_key()) {
        items.push(item);
    }
}

fn parse_coded_row(caps: &regex::Captures<'_>, limits: &ExtractorLimits) -> Option<PendingItem> {
    let quantity: Decimal = caps.get(2)?.as_str().parse().ok()?;
    let unit_price = Money::parse(caps.get(3)?.as_str())?;
    let total = Money::parse(caps.get(4)?.as_str())?;
    // Prices past the ceiling are OCR concatenation garbage, not items.
    if unit_price.amount() > limits.price_ceiling || total.amount() > limits.price_ceiling {
        return None;
    }
    Some(PendingItem { quantity, unit_price, total })
}

fn parse_hsn_row(
    caps: &regex::Captures<'_>,
    pending: Option<PendingItem>,
    limits: &ExtractorLimits,
) -> Option<ExtractedItem> {
    let description = caps.get(1)?.as_str().trim().to_string();
    let taxable = Money::parse(caps.get(3)?.as_str())?;
    if !plausible_description(&description) {
        return None;
    }

    match pending {
        Some(p) if (p.total.amount() - taxable.amount()).abs() <= limits.hsn_merge_tolerance => {
            Some(ExtractedItem {
                description,
                quantity: Some(p.quantity),
                unit_price: Some(p.unit_price),
                total_price: p.total,
                confidence: ConfidenceLevel::High,
            })
        }
        _ => Some(ExtractedItem {
            description,
            quantity: None,
            unit_price: None,
            total_price: taxable,
            confidence: ConfidenceLevel::Medium,
        }),
    }
}

fn parse_qty_price_row(caps: &regex::Captures<'_>) -> Option<ExtractedItem> {
    let description = caps.get(1)?.as_str().trim().to_string();
    if !plausible_description(&description) {
        return None;
    }
    let quantity = caps.get(2).and_then(|g| g.as_str().parse::<Decimal>().ok());
    let total_price = Money::parse(caps.get(3)?.as_str())?;
    Some(ExtractedItem {
        description,
        quantity,
        unit_price: None,
        total_price,
        confidence: ConfidenceLevel::Medium,
    })
}

fn parse_bare_row(caps: &regex::Captures<'_>) -> Option<ExtractedItem> {
    let description = caps.get(1)?.as_str().trim().to_string();
    if !plausible_description(&description) {
        return None;
    }
    let total_price = Money::parse(caps.get(2)?.as_str())?;
    Some(ExtractedItem {
        description,
        quantity: None,
        unit_price: None,
        total_price,
        confidence: ConfidenceLevel::Low,
    })
}

fn plausible_description(desc: &str) -> bool {
    let letters = desc.chars().filter(|c| c.is_alphabetic()).count();
    let digits = desc.chars().filter(|c| c.is_ascii_digit()).count();
    letters >= 3 && letters > digits
}
