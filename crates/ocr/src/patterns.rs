//! Process-wide pattern tables. Everything here is compiled once on first
//! use and shared by reference; the arrays are ordered, and order is
//! priority.

use std::sync::OnceLock;

use regex::Regex;

use rasid_core::Category;

use crate::types::PaymentMethod;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid regex"))
        .collect()
}

// ── Amounts ──────────────────────────────────────────────────────────────────
//
// The amount sub-pattern tolerates the common OCR misreads of the rupee
// glyph: ₹ comes through as `%`, `Rs`, or a bare `.`.
// Glyph prefix: (?:₹|%|\.|rs\.?|inr|\$)?  Amount: ([\d,]+(?:\.\d{1,2})?)

/// Labeled-total patterns, highest priority first.
pub(crate) fn total_patterns() -> &'static [Regex] {
    static T: OnceLock<Vec<Regex>> = OnceLock::new();
    T.get_or_init(|| {
        compile(&[
            r"(?i)total\s*invoice\s*amount\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)total\s*received\s*amount\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\b(?:grand\s*)?total\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bnet\s*(?:amount|payable)\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bamount\s*(?:payable|due|paid)\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bbill\s*amount\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bbalance\s*(?:due)?\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bpayment\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
        ])
    })
}

/// Symbol-prefixed amounts anywhere in the text, for the max-value
/// fallback when no labeled total matched.
re!(re_currency_token, r"(?i)(?:₹|\brs\.?|\binr\b|\$|€|£|¥)\s*([\d,]+(?:\.\d{1,2})?)");

// ── Dates ────────────────────────────────────────────────────────────────────

/// How the capture groups of a date pattern are ordered.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DateStyle {
    /// dd/mm/yyyy — regional day-first.
    DayMonthYear,
    /// dd/mm/yy with a two-digit year.
    DayMonthYearShort,
    /// ISO yyyy-mm-dd.
    YearMonthDay,
    /// "15 Mar 2024".
    DayTextMonth,
    /// "Mar 15, 2024".
    TextMonthDay,
}

/// All date variants, regional day-first formats prioritized. Every
/// variant is run over the whole text; the extractor windows and picks.
pub(crate) fn date_patterns() -> &'static [(Regex, DateStyle)] {
    static T: OnceLock<Vec<(Regex, DateStyle)>> = OnceLock::new();
    T.get_or_init(|| {
        [
            (r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})\b", DateStyle::DayMonthYear),
            (r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2})\b", DateStyle::DayMonthYearShort),
            (r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b", DateStyle::YearMonthDay),
            (
                r"(?i)\b(\d{1,2})[\s\-]+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{2,4})\b",
                DateStyle::DayTextMonth,
            ),
            (
                r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2}),?\s+(\d{4})\b",
                DateStyle::TextMonthDay,
            ),
        ]
        .iter()
        .map(|(p, style)| (Regex::new(p).expect("invalid regex"), *style))
        .collect()
    })
}

// ── Tax and subtotal ─────────────────────────────────────────────────────────

/// GST components first, Western labels after. Each tolerates an
/// interposed rate ("CGST @ 9%") before the amount.
pub(crate) fn tax_patterns() -> &'static [Regex] {
    static T: OnceLock<Vec<Regex>> = OnceLock::new();
    T.get_or_init(|| {
        compile(&[
            r"(?i)\bgst\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bcgst\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bsgst\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bigst\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bcess\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bsales\s*tax\b\s*[:\-]?\s*\$?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bvat\b\s*(?:@?\s*\d+(?:\.\d+)?\s*%)?\s*[:\-]?\s*[€£$]?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\bhst\b\s*[:\-]?\s*\$?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\btax\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
        ])
    })
}

pub(crate) fn subtotal_patterns() -> &'static [Regex] {
    static T: OnceLock<Vec<Regex>> = OnceLock::new();
    T.get_or_init(|| {
        compile(&[
            r"(?i)\bsub\s*-?\s*total\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)\btaxable\s*(?:value|amount)\b\s*[:\-]?\s*(?:₹|%|\.|rs\.?|inr|\$)?\s*([\d,]+(?:\.\d{1,2})?)",
        ])
    })
}

// ── Payment methods ──────────────────────────────────────────────────────────

/// Keyword → canonical method, in priority order. Word boundaries keep
/// "CASH" from matching inside "CASHIER".
pub(crate) fn payment_patterns() -> &'static [(Regex, PaymentMethod)] {
    static T: OnceLock<Vec<(Regex, PaymentMethod)>> = OnceLock::new();
    T.get_or_init(|| {
        [
            (r"(?i)\bupi\b", PaymentMethod::Upi),
            (r"(?i)\bphonepe\b", PaymentMethod::Upi),
            (r"(?i)\bgpay\b", PaymentMethod::Upi),
            (r"(?i)\bgoogle\s*pay\b", PaymentMethod::Upi),
            (r"(?i)\bpaytm\b", PaymentMethod::Upi),
            (r"(?i)\bbhim\b", PaymentMethod::Upi),
            (r"(?i)\bvisa\b", PaymentMethod::CreditCard),
            (r"(?i)\bmaster\s*card\b", PaymentMethod::CreditCard),
            (r"(?i)\bamex\b", PaymentMethod::CreditCard),
            (r"(?i)\bamerican\s*express\b", PaymentMethod::CreditCard),
            (r"(?i)\bcredit\s*card\b", PaymentMethod::CreditCard),
            (r"(?i)\bdebit\s*card\b", PaymentMethod::DebitCard),
            (r"(?i)\bdebit\b", PaymentMethod::DebitCard),
            (r"(?i)\bnet\s*banking\b", PaymentMethod::NetBanking),
            (r"(?i)\bneft\b", PaymentMethod::NetBanking),
            (r"(?i)\bimps\b", PaymentMethod::NetBanking),
            (r"(?i)\brtgs\b", PaymentMethod::NetBanking),
            (r"(?i)\bwallet\b", PaymentMethod::Wallet),
            (r"(?i)\bcash\b", PaymentMethod::Cash),
            (r"(?i)\bcheque\b", PaymentMethod::Cheque),
            (r"(?i)\bcheck\b", PaymentMethod::Cheque),
            (r"(?i)\bcard\b", PaymentMethod::CreditCard),
        ]
        .iter()
        .map(|(p, m)| (Regex::new(p).expect("invalid regex"), m.clone()))
        .collect()
    })
}

// ── Currency markers ─────────────────────────────────────────────────────────

re!(re_rupee_marker, r"(?i)\brs\b\.?|rupees?|\binr\b|paisa");
re!(re_gst_marker, r"(?i)\b(?:gstin|gst|cgst|sgst|igst|fssai)\b");

// ── Merchant detection ───────────────────────────────────────────────────────

/// Regional and Western chains recognized by substring.
pub(crate) const KNOWN_MERCHANTS: &[&str] = &[
    "star bazaar",
    "big bazaar",
    "dmart",
    "d-mart",
    "reliance fresh",
    "reliance smart",
    "jiomart",
    "more supermarket",
    "spencer",
    "vishal mega mart",
    "nature's basket",
    "apollo pharmacy",
    "medplus",
    "croma",
    "decathlon",
    "cafe coffee day",
    "haldiram",
    "bikanervala",
    "barista",
    "dominos",
    "domino's",
    "mcdonald",
    "kfc",
    "subway",
    "starbucks",
    "walmart",
    "target",
    "costco",
    "tesco",
    "kroger",
    "whole foods",
    "trader joe",
];

/// A line containing any of these is never a merchant name.
pub(crate) const MERCHANT_SKIP_KEYWORDS: &[&str] = &[
    "invoice", "receipt", "bill no", "bill #", "gstin", "gst no", "fssai", "tax", "cgst",
    "sgst", "igst", "cess", "total", "subtotal", "amount", "tender", "date", "time",
    "phone", "tel:", "mob:", "mobile", "customer", "cashier", "payment", "cash", "card",
    "upi", "change", "thank", "welcome", "www", "http", "mrp", "qty", "hsn", "item",
    "description", "price", "rate",
];

re!(re_legal_suffix, r"(?i)\b(?:pvt\.?\s*ltd\.?|private\s+limited|ltd\.?|limited|llp|inc\.?)\s*$");
re!(re_item_code_line, r"^\d{6,7}\s");
re!(re_numeric_only, r"^[\d\s.,:/*\-₹$%]+$");
re!(re_price_like, r"^(?:₹|%|rs\.?|\$)?\s*[\d,]+(?:\.\d{1,2})?$");
re!(re_date_any, r"\b\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}\b|\b\d{4}-\d{1,2}-\d{1,2}\b");

// ── Line items ───────────────────────────────────────────────────────────────

// Coded row: 6–7 digit item code, quantity, optional unit, unit price,
// line total. An 8-digit leading code is an HSN tax-classification code,
// not an item code; the mandatory whitespace after the code group keeps
// those rows out.
re!(
    re_item_coded,
    r"^(\d{6,7})\s+(\d+(?:\.\d+)?)\s*(?:(?i:pcs|pc|nos|no|kgs|kg|gms|gm|g|ltr|lt|l|ml|ea|un)\.?\s+)?([\d,]+(?:\.\d{1,2})?)\s+([\d,]+(?:\.\d{1,2})?)\s*$"
);

// Description, 8-digit HSN code, taxable value.
re!(
    re_item_hsn,
    r"^([A-Za-z][A-Za-z0-9 .,&'\-/()]{2,60}?)\s+(\d{8})\s+([\d,]+(?:\.\d{1,2})?)\s*$"
);

// Simple row: description, optional "x2" multiplier, decimal price.
re!(
    re_item_qty_price,
    r"^([A-Za-z][A-Za-z0-9 .,&'\-/()]{2,60}?)\s+(?:[xX*]\s*(\d{1,3})\s+)?(?:₹|rs\.?|\$)?\s*([\d,]+\.\d{1,2})\s*$"
);

// Last resort: description and a bare amount.
re!(
    re_item_bare,
    r"^([A-Za-z][A-Za-z0-9 .,&'\-/()]{2,60}?)\s+(?:₹|rs\.?|\$)?\s*([\d,]+(?:\.\d{1,2})?)\s*$"
);

/// Summary and boilerplate lines that must never be harvested as items.
pub(crate) const ITEM_SKIP_KEYWORDS: &[&str] = &[
    "total", "subtotal", "sub-total", "sub total", "tax", "gst", "cgst", "sgst", "igst",
    "cess", "invoice", "bill", "payment", "paid", "change", "balance", "tender",
    "customer", "cashier", "thank", "round", "savings", "discount", "cash", "card",
    "upi", "qty", "description", "hsn", "mrp", "date", "time", "amount", "rate",
];

// ── Category suggestion ──────────────────────────────────────────────────────

/// Ordered category → keyword table. Keyword sets overlap; earlier
/// categories win, so "banana" files under Groceries, not Shopping.
pub(crate) static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Groceries,
        &[
            "grocery", "supermarket", "bazaar", "mart", "kirana", "provision", "fresh",
            "vegetable", "fruit", "banana", "milk", "bread", "rice", "atta", "dal",
        ],
    ),
    (
        Category::FoodAndDining,
        &[
            "restaurant", "cafe", "coffee", "pizza", "burger", "biryani", "dhaba", "bakery",
            "sweets", "food", "dining", "zomato", "swiggy",
        ],
    ),
    (
        Category::Transportation,
        &[
            "uber", "ola", "taxi", "cab", "petrol", "diesel", "fuel", "parking", "toll",
            "metro", "railway", "irctc", "bus",
        ],
    ),
    (
        Category::Shopping,
        &[
            "mall", "store", "retail", "apparel", "clothing", "footwear", "electronics",
            "amazon", "flipkart", "myntra", "shopping",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "pharmacy", "chemist", "medical", "hospital", "clinic", "doctor", "medicine",
            "diagnostic", "apollo", "medplus",
        ],
    ),
    (
        Category::Entertainment,
        &["cinema", "movie", "pvr", "inox", "theatre", "bowling", "netflix", "concert", "game"],
    ),
    (
        Category::Utilities,
        &[
            "electricity", "water bill", "broadband", "internet", "recharge", "dth",
            "postpaid", "prepaid", "gas",
        ],
    ),
];

// ── Text-quality helpers (used by the confidence scorer) ─────────────────────

re!(re_decimal_amount, r"\d+\.\d{2}\b");
re!(re_date_like, r"\b\d{1,4}[/\-.]\d{1,2}[/\-.]\d{1,4}\b");
