use std::collections::BTreeMap;

use chrono::{Local, Months, NaiveDate};

use rasid_core::{Category, Currency, Money};

use crate::config::ExtractorLimits;
use crate::items;
use crate::patterns::{
    date_patterns, payment_patterns, re_currency_token, re_date_any, re_gst_marker,
    re_item_code_line, re_legal_suffix, re_numeric_only, re_price_like, re_rupee_marker,
    subtotal_patterns, tax_patterns, total_patterns, DateStyle, CATEGORY_KEYWORDS,
    KNOWN_MERCHANTS, MERCHANT_SKIP_KEYWORDS,
};
use crate::types::{field, FieldConfidence, ImageQuality, PaymentMethod, ReceiptRecord};

/// Parses raw OCR text into typed receipt fields. Pattern tables are
/// process-wide; the struct only carries the tunable thresholds.
pub struct Extractor {
    limits: ExtractorLimits,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorLimits::default())
    }
}

impl Extractor {
    pub fn new(limits: ExtractorLimits) -> Self {
        Self { limits }
    }

    /// Extract structured fields from raw OCR text.
    pub fn extract(&self, text: &str) -> ReceiptRecord {
        self.extract_at(text, Local::now().date_naive())
    }

    /// `today` anchors the plausible-date window; injectable for tests.
    pub fn extract_at(&self, text: &str, today: NaiveDate) -> ReceiptRecord {
        if text.trim().is_empty() {
            return empty_record(text, "no usable text in image");
        }

        let mut confidence = BTreeMap::new();
        let mut warnings = Vec::new();

        let (merchant, merchant_conf) = extract_merchant(text);
        confidence.insert(field::MERCHANT.to_string(), merchant_conf);

        let (amount, amount_conf) = extract_total(text);
        confidence.insert(field::AMOUNT.to_string(), amount_conf);

        let (date, date_conf, date_warning) = extract_date(text, today);
        confidence.insert(field::DATE.to_string(), date_conf);
        if let Some(w) = date_warning {
            warnings.push(w);
        }

        // Tax is optional on receipts; unlike amount/date/merchant it gets
        // no confidence entry when absent.
        let (tax, tax_conf) = extract_tax(text);
        if let Some(c) = tax_conf {
            confidence.insert(field::TAX.to_string(), c);
        }

        let subtotal = extract_subtotal(text);

        let (payment_method, payment_conf) = extract_payment_method(text);
        if let Some(c) = payment_conf {
            confidence.insert(field::PAYMENT_METHOD.to_string(), c);
        }

        let (currency, currency_conf) = extract_currency(text);
        confidence.insert(field::CURRENCY.to_string(), currency_conf);

        let items = items::extract_items(text, &self.limits);
        let suggested_category = suggest_category(merchant.as_deref(), text);
        let overall_confidence = overall_confidence(&confidence);

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
            raw_text: text.to_string(),
            processing_time_ms: 0,
            image_quality: ImageQuality::default(),
            suggested_category,
            warnings,
        }
    }
}

fn empty_record(raw_text: &str, warning: &str) -> ReceiptRecord {
    ReceiptRecord {
        merchant: None,
        amount: None,
        date: None,
        tax: None,
        subtotal: None,
        currency: Currency::Usd,
        payment_method: None,
        items: vec![],
        confidence: BTreeMap::new(),
        overall_confidence: 0.0,
        raw_text: raw_text.to_string(),
        processing_time_ms: 0,
        image_quality: ImageQuality::default(),
        suggested_category: Category::Uncategorized,
        warnings: vec![warning.to_string()],
    }
}

// ── Merchant ─────────────────────────────────────────────────────────────────

fn extract_merchant(text: &str) -> (Option<String>, FieldConfidence) {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    // Known regional/Western chains, anywhere in a line.
    for line in &lines {
        let lower = line.to_lowercase();
        if KNOWN_MERCHANTS.iter().any(|m| lower.contains(m)) {
            let cleaned = clean_merchant_line(line);
            if (5..=60).contains(&cleaned.len()) {
                return (Some(cleaned), FieldConfidence::high("matched known merchant"));
            }
        }
    }

    // Registered business names end with a legal-entity suffix.
    for line in &lines {
        if line.len() >= 10 && re_legal_suffix().is_match(line) && !is_merchant_skip_line(line) {
            return (
                Some(clean_merchant_line(line)),
                FieldConfidence::high("registered business name"),
            );
        }
    }

    // Fallback: the first plausible header line.
    let candidates: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| !is_merchant_skip_line(l))
        .filter(|l| !re_date_any().is_match(l))
        .filter(|l| !re_price_like().is_match(l))
        .filter(|l| !re_numeric_only().is_match(l))
        .filter(|l| !re_item_code_line().is_match(l))
        .take(5)
        .collect();
    for line in candidates {
        let letters = line.chars().filter(|c| c.is_alphabetic()).count();
        let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
        if digits >= letters {
            continue;
        }
        if letters >= 3 && line.len() <= 60 {
            return (
                Some(clean_merchant_line(line)),
                FieldConfidence::low("guessed from header lines"),
            );
        }
    }

    // Never invent a merchant.
    (None, FieldConfidence::low("merchant not found"))
}

fn is_merchant_skip_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    MERCHANT_SKIP_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Strip symbols and collapse whitespace, keeping the characters a
/// business name can legitimately carry.
fn clean_merchant_line(line: &str) -> String {
    let kept: String = line
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '&' | '\'' | '-' | '.') {
                c
            } else {
                ' '
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Total amount ─────────────────────────────────────────────────────────────

fn extract_total(text: &str) -> (Option<Money>, FieldConfidence) {
    for re in total_patterns() {
        if let Some(caps) = re.captures(text) {
            if let Some(money) = caps.get(1).and_then(|g| Money::parse(g.as_str())) {
                return (Some(money), FieldConfidence::high("labeled total"));
            }
        }
    }

    // The grand total is usually the largest printed amount.
    let max = re_currency_token()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|g| Money::parse(g.as_str()))
        .max();
    match max {
        Some(money) => (Some(money), FieldConfidence::medium("largest currency amount")),
        None => (None, FieldConfidence::low("no amount found")),
    }
}

// ── Date ─────────────────────────────────────────────────────────────────────

fn extract_date(
    text: &str,
    today: NaiveDate,
) -> (Option<NaiveDate>, FieldConfidence, Option<String>) {
    let earliest = today.checked_sub_months(Months::new(60)).unwrap_or(NaiveDate::MIN);
    let latest = today.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX);

    let mut found: Vec<NaiveDate> = Vec::new();
    for (re, style) in date_patterns() {
        for caps in re.captures_iter(text) {
            if let Some(date) = parse_date_captures(&caps, *style) {
                if (earliest..=latest).contains(&date) && !found.contains(&date) {
                    found.push(date);
                }
            }
        }
    }

    match found.as_slice() {
        [] => (None, FieldConfidence::low("no plausible date"), None),
        [only] => (Some(*only), FieldConfidence::high("single date match"), None),
        many => {
            let latest_date = many.iter().copied().max();
            (
                latest_date,
                FieldConfidence::medium("multiple dates found"),
                Some(format!(
                    "multiple dates found ({}); keeping the most recent",
                    many.len()
                )),
            )
        }
    }
}

fn parse_date_captures(caps: &regex::Captures<'_>, style: DateStyle) -> Option<NaiveDate> {
    match style {
        DateStyle::DayMonthYear | DateStyle::DayMonthYearShort => {
            let mut day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let mut month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let mut year: i32 = caps.get(3)?.as_str().parse().ok()?;
            if matches!(style, DateStyle::DayMonthYearShort) {
                year = expand_year(year);
            }
            swap_if_month_overflows(&mut day, &mut month);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        DateStyle::YearMonthDay => {
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            let mut month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let mut day: u32 = caps.get(3)?.as_str().parse().ok()?;
            swap_if_month_overflows(&mut day, &mut month);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        DateStyle::DayTextMonth => {
            let day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let month = month_abbr_to_num(caps.get(2)?.as_str())?;
            let year = expand_year(caps.get(3)?.as_str().parse().ok()?);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        DateStyle::TextMonthDay => {
            let month = month_abbr_to_num(caps.get(1)?.as_str())?;
            let day: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year: i32 = caps.get(3)?.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

/// OCR can't tell 15/03 from 03/15; when the month slot overflows and the
/// day slot doesn't, the fields were transposed.
fn swap_if_month_overflows(day: &mut u32, month: &mut u32) {
    if *month > 12 && *day <= 12 {
        std::mem::swap(day, month);
    }
}

fn expand_year(y: i32) -> i32 {
    if y < 100 {
        2000 + y
    } else {
        y
    }
}

fn month_abbr_to_num(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

// ── Tax and subtotal ─────────────────────────────────────────────────────────

fn extract_tax(text: &str) -> (Option<Money>, Option<FieldConfidence>) {
    for re in tax_patterns() {
        if let Some(caps) = re.captures(text) {
            if let Some(money) = caps.get(1).and_then(|g| Money::parse(g.as_str())) {
                return (Some(money), Some(FieldConfidence::high("labeled tax component")));
            }
        }
    }
    (None, None)
}

fn extract_subtotal(text: &str) -> Option<Money> {
    for re in subtotal_patterns() {
        if let Some(caps) = re.captures(text) {
            if let Some(money) = caps.get(1).and_then(|g| Money::parse(g.as_str())) {
                return Some(money);
            }
        }
    }
    None
}

// ── Payment method ───────────────────────────────────────────────────────────

fn extract_payment_method(text: &str) -> (Option<PaymentMethod>, Option<FieldConfidence>) {
    for (re, method) in payment_patterns() {
        if re.is_match(text) {
            return (
                Some(method.clone()),
                Some(FieldConfidence::high("payment keyword")),
            );
        }
    }
    (None, None)
}

// ── Currency ─────────────────────────────────────────────────────────────────

fn extract_currency(text: &str) -> (Currency, FieldConfidence) {
    if text.contains('₹') {
        return (Currency::Inr, FieldConfidence::high("currency symbol"));
    }
    if text.contains('$') {
        // A rupee marker alongside `$` means the glyph was misread.
        return if re_rupee_marker().is_match(text) {
            (Currency::Inr, FieldConfidence::medium("rupee marker alongside $ glyph"))
        } else {
            (Currency::Usd, FieldConfidence::high("currency symbol"))
        };
    }
    if text.contains('€') {
        return (Currency::Eur, FieldConfidence::high("currency symbol"));
    }
    if text.contains('£') {
        return (Currency::Gbp, FieldConfidence::high("currency symbol"));
    }
    if text.contains('¥') {
        return (Currency::Jpy, FieldConfidence::high("currency symbol"));
    }
    if re_rupee_marker().is_match(text) || re_gst_marker().is_match(text) {
        return (Currency::Inr, FieldConfidence::medium("regional keyword"));
    }
    (Currency::Usd, FieldConfidence::low("defaulted"))
}

// ── Category suggestion ──────────────────────────────────────────────────────

fn suggest_category(merchant: Option<&str>, text: &str) -> Category {
    let haystack = format!("{} {}", merchant.unwrap_or(""), text).to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return *category;
        }
    }
    Category::Uncategorized
}

// ── Overall confidence ───────────────────────────────────────────────────────

fn field_weight(key: &str) -> f32 {
    match key {
        field::AMOUNT => 3.0,
        field::DATE => 2.0,
        field::MERCHANT => 1.0,
        field::TAX => 0.5,
        _ => 1.0,
    }
}

/// Weighted mean over present confidence entries; 0.0 for an empty map.
fn overall_confidence(map: &BTreeMap<String, FieldConfidence>) -> f32 {
    let (score, weight) = map.iter().fold((0.0f32, 0.0f32), |(s, w), (key, fc)| {
        let fw = field_weight(key);
        (s + fc.score * fw, w + fw)
    });
    if weight > 0.0 {
        score / weight
    } else {
        0.0
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceLevel;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn extract(text: &str) -> ReceiptRecord {
        Extractor::default().extract_at(text, today())
    }

    // ── Merchant ─────────────────────────────────────────────────────────────

    #[test]
    fn merchant_known_chain_high_confidence() {
        let r = extract("some noise\nSTAR BAZAAR PVT LTD\n15/03/2024\nTOTAL: ₹450.00");
        assert_eq!(r.merchant.as_deref(), Some("STAR BAZAAR PVT LTD"));
        assert_eq!(r.confidence[field::MERCHANT].level, ConfidenceLevel::High);
    }

    #[test]
    fn merchant_legal_suffix_high_confidence() {
        let r = extract("SHREE KRISHNA TRADERS PVT LTD\nMilk 45.00\nTOTAL: 45.00");
        assert_eq!(r.merchant.as_deref(), Some("SHREE KRISHNA TRADERS PVT LTD"));
        assert_eq!(r.confidence[field::MERCHANT].level, ConfidenceLevel::High);
    }

    #[test]
    fn merchant_symbols_stripped() {
        let r = extract("** STAR BAZAAR **\nTOTAL: ₹450.00");
        assert_eq!(r.merchant.as_deref(), Some("STAR BAZAAR"));
    }

    #[test]
    fn merchant_fallback_header_line_low_confidence() {
        let r = extract("SHREE GANESH KIRANA\n15/03/2024\nMilk 45.00\nTOTAL: 45.00");
        assert_eq!(r.merchant.as_deref(), Some("SHREE GANESH KIRANA"));
        assert_eq!(r.confidence[field::MERCHANT].level, ConfidenceLevel::Low);
    }

    #[test]
    fn merchant_absent_is_not_invented() {
        let r = extract("123456\n45.00\n15/03/2024");
        assert_eq!(r.merchant, None);
        assert_eq!(r.confidence[field::MERCHANT].level, ConfidenceLevel::Low);
        assert_eq!(r.confidence[field::MERCHANT].reason, "merchant not found");
    }

    #[test]
    fn merchant_skips_tax_and_invoice_lines() {
        let r = extract("TAX INVOICE\nGSTIN 27AAAAA0000A1Z5\nANNAPURNA SWEETS\nTOTAL 120.00");
        assert_eq!(r.merchant.as_deref(), Some("ANNAPURNA SWEETS"));
    }

    // ── Amount ───────────────────────────────────────────────────────────────

    #[test]
    fn labeled_total_beats_stray_amounts() {
        let r = extract("STORE\n₹99.00\nTOTAL: ₹1,234.50\n₹12.00");
        assert_eq!(r.amount, Money::parse("1234.50"));
        assert_eq!(r.confidence[field::AMOUNT].level, ConfidenceLevel::High);
    }

    #[test]
    fn amount_falls_back_to_largest_token() {
        let r = extract("KIRANA\n₹45.00\n₹210.75");
        assert_eq!(r.amount, Money::parse("210.75"));
        assert_eq!(r.confidence[field::AMOUNT].level, ConfidenceLevel::Medium);
    }

    #[test]
    fn amount_absent_is_low_confidence_null() {
        let r = extract("KIRANA STORE\nno numbers here");
        assert_eq!(r.amount, None);
        assert_eq!(r.confidence[field::AMOUNT].level, ConfidenceLevel::Low);
    }

    #[test]
    fn total_invoice_amount_outranks_plain_total() {
        let r = extract("Total: 100.00\nTotal Invoice Amount: 118.00");
        assert_eq!(r.amount, Money::parse("118.00"));
    }

    #[test]
    fn misread_rupee_glyph_tolerated() {
        let r = extract("GRAND TOTAL Rs 560.50");
        assert_eq!(r.amount, Money::parse("560.50"));
    }

    // ── Date ─────────────────────────────────────────────────────────────────

    #[test]
    fn date_is_day_first() {
        let r = extract("Total: 15/03/2024");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(r.confidence[field::DATE].level, ConfidenceLevel::High);
    }

    #[test]
    fn transposed_month_and_day_are_swapped() {
        let r = extract("Date: 03/15/2024\nTOTAL 45.00");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn most_recent_of_multiple_dates_wins_with_warning() {
        let r = extract("Ordered 01/02/2024\nDelivered 15/02/2024\nTOTAL 45.00");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(r.confidence[field::DATE].level, ConfidenceLevel::Medium);
        assert!(r.warnings.iter().any(|w| w.contains("multiple dates found")));
    }

    #[test]
    fn implausible_dates_are_rejected() {
        let r = extract("EST 01/01/1990\nTOTAL 45.00");
        assert_eq!(r.date, None);
        assert_eq!(r.confidence[field::DATE].level, ConfidenceLevel::Low);
    }

    #[test]
    fn far_future_dates_are_rejected() {
        let r = extract("VALID UNTIL 01/01/2031\nTOTAL 45.00");
        assert_eq!(r.date, None);
    }

    #[test]
    fn two_digit_year_expands() {
        let r = extract("15/03/24\nTOTAL 45.00");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn text_month_formats_parse() {
        let r = extract("15 Mar 2024\nTOTAL 45.00");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        let r = extract("March 15, 2024\nTOTAL 45.00");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    // ── Tax and subtotal ─────────────────────────────────────────────────────

    #[test]
    fn gst_component_extracted_high_confidence() {
        let r = extract("CGST @9% 22.50\nSGST @9% 22.50\nTOTAL 295.00");
        assert_eq!(r.tax, Money::parse("22.50"));
        assert_eq!(r.confidence[field::TAX].level, ConfidenceLevel::High);
    }

    #[test]
    fn western_tax_labels_extracted() {
        let r = extract("Sales Tax $3.60\nTotal $48.60");
        assert_eq!(r.tax, Money::parse("3.60"));
    }

    #[test]
    fn absent_tax_has_no_confidence_entry() {
        let r = extract("KIRANA\nTOTAL 45.00");
        assert_eq!(r.tax, None);
        assert!(!r.confidence.contains_key(field::TAX));
    }

    #[test]
    fn subtotal_extracted_without_confidence_entry() {
        let r = extract("Sub-Total: 45.00\nGST 8.10\nTOTAL 53.10");
        assert_eq!(r.subtotal, Money::parse("45.00"));
        assert!(!r.confidence.contains_key("subtotal"));
    }

    // ── Payment method ───────────────────────────────────────────────────────

    #[test]
    fn upi_aliases_canonicalize() {
        for text in ["Paid via PhonePe", "GPAY ref 12345", "UPI: user@oksbi"] {
            let r = extract(text);
            assert_eq!(r.payment_method, Some(PaymentMethod::Upi), "text: {text}");
        }
    }

    #[test]
    fn card_networks_map_to_credit_card() {
        let r = extract("VISA ****1234\nTOTAL 45.00");
        assert_eq!(r.payment_method, Some(PaymentMethod::CreditCard));
    }

    #[test]
    fn cashier_does_not_mean_cash() {
        let r = extract("CASHIER: RAVI\nTOTAL 45.00");
        assert_eq!(r.payment_method, None);
    }

    #[test]
    fn cash_keyword_detected() {
        let r = extract("PAID BY CASH\nTOTAL 45.00");
        assert_eq!(r.payment_method, Some(PaymentMethod::Cash));
    }

    // ── Currency ─────────────────────────────────────────────────────────────

    #[test]
    fn rupee_symbol_is_inr() {
        assert_eq!(extract("TOTAL ₹45.00").currency, Currency::Inr);
    }

    #[test]
    fn dollar_is_usd_unless_rupee_marker_present() {
        assert_eq!(extract("TOTAL $45.00").currency, Currency::Usd);
        assert_eq!(extract("TOTAL $45.00\nRs. 45 received").currency, Currency::Inr);
    }

    #[test]
    fn gst_marker_implies_inr_without_symbol() {
        let r = extract("CGST 22.50\nTOTAL 295.00");
        assert_eq!(r.currency, Currency::Inr);
    }

    #[test]
    fn currency_defaults_to_usd() {
        let r = extract("CORNER SHOP\nTOTAL 45.00");
        assert_eq!(r.currency, Currency::Usd);
        assert_eq!(r.confidence[field::CURRENCY].level, ConfidenceLevel::Low);
    }

    // ── Category ─────────────────────────────────────────────────────────────

    #[test]
    fn groceries_checked_before_shopping() {
        // "banana" belongs to Groceries even though the receipt also says
        // "store".
        let r = extract("CORNER STORE\nbanana 12.00\nTOTAL 12.00");
        assert_eq!(r.suggested_category, Category::Groceries);
    }

    #[test]
    fn merchant_name_feeds_category() {
        let r = extract("APOLLO PHARMACY\nTOTAL 260.00");
        assert_eq!(r.suggested_category, Category::Healthcare);
    }

    #[test]
    fn unmatched_text_is_uncategorized() {
        let r = extract("ACME WIDGETS\nTOTAL 10.00");
        assert_eq!(r.suggested_category, Category::Uncategorized);
    }

    // ── Overall confidence ───────────────────────────────────────────────────

    #[test]
    fn empty_text_short_circuits() {
        let r = extract("   \n  ");
        assert_eq!(r.overall_confidence, 0.0);
        assert!(r.confidence.is_empty());
        assert_eq!(r.warnings, vec!["no usable text in image".to_string()]);
        assert_eq!(r.merchant, None);
        assert_eq!(r.amount, None);
        assert!(r.items.is_empty());
    }

    #[test]
    fn overall_confidence_weights_amount_heaviest() {
        let mut map = BTreeMap::new();
        map.insert(field::AMOUNT.to_string(), FieldConfidence::high("x"));
        map.insert(field::MERCHANT.to_string(), FieldConfidence::low("y"));
        // (0.9 * 3 + 0.3 * 1) / 4 = 0.75
        let overall = overall_confidence(&map);
        assert!((overall - 0.75).abs() < 1e-6);
    }

    #[test]
    fn overall_confidence_empty_map_is_zero() {
        assert_eq!(overall_confidence(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn complete_receipt_scores_high() {
        let r = extract(
            "STAR BAZAAR PVT LTD\n15/03/2024\nMilk 45.00\nCGST @9% 4.05\nTOTAL: ₹49.05\nPAID BY UPI",
        );
        assert!(r.overall_confidence >= 0.7, "overall was {}", r.overall_confidence);
        assert!(!r.needs_review());
    }
}
