//! Listing field extraction from unstructured search-result text.
//!
//! Every extractor is a pure function over a string and returns `None` (or an
//! empty [`VehicleInfo`] field) when nothing plausible is found. Conversion to
//! the empty-string wire format happens in [`crate::lookup`].

use std::fmt;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted price range in whole dollars. Values outside are treated as
/// misparsed units, model numbers, or monthly payments.
pub const PRICE_RANGE: RangeInclusive<u32> = 1_000..=200_000;

/// Largest accepted odometer reading in kilometres.
pub const MILEAGE_MAX: u32 = 500_000;

/// Vehicle makes recognised in result text, in priority order.
pub const KNOWN_MAKES: [&str; 21] = [
    "Honda",
    "Toyota",
    "Ford",
    "Chevrolet",
    "Nissan",
    "Hyundai",
    "Kia",
    "Mazda",
    "Subaru",
    "Volkswagen",
    "BMW",
    "Mercedes",
    "Audi",
    "Lexus",
    "Acura",
    "Jeep",
    "Dodge",
    "Ram",
    "GMC",
    "Tesla",
    "Porsche",
];

/// Vehicle models recognised in result text, in priority order.
pub const KNOWN_MODELS: [&str; 25] = [
    "Civic",
    "Accord",
    "CR-V",
    "Camry",
    "Corolla",
    "RAV4",
    "F-150",
    "Escape",
    "Explorer",
    "Silverado",
    "Equinox",
    "Altima",
    "Rogue",
    "Elantra",
    "Tucson",
    "Forte",
    "Sportage",
    "Mazda3",
    "CX-5",
    "Outback",
    "Forester",
    "Jetta",
    "Tiguan",
    "Wrangler",
    "Model 3",
];

// Tried pattern by pattern: `$12,500`, then `12,500 $`, then `12500 CAD`.
// Digits are ASCII only; other scripts' decimal digits are not amounts.
static PRICE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        compile(r"(?i)\$\s*([0-9,]+(?:\.[0-9]{2})?)"),
        compile(r"(?i)([0-9,]+(?:\.[0-9]{2})?)\s*\$"),
        compile(r"(?i)([0-9,]+)\s*(?:CAD|CDN)"),
    ]
});

static MILEAGE_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        compile(r"(?i)([0-9,\s]+)\s*km"),
        compile(r"(?i)([0-9,\s]+)\s*kilomet"),
    ]
});

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"\b(199[0-9]|20[0-2][0-9])\b"));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => unreachable!("built-in pattern {pattern:?} failed to compile: {err}"),
    }
}

/// A listing price in whole Canadian dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u32);

impl Price {
    pub fn dollars(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}$", format_thousands(u64::from(self.0)))
    }
}

/// An odometer reading in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mileage(u32);

impl Mileage {
    pub fn kilometres(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Mileage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", format_thousands(u64::from(self.0)))
    }
}

/// Year, make and model found in a piece of text. Fields are independent and
/// never cross-checked against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleInfo {
    pub year: Option<u16>,
    pub make: Option<&'static str>,
    pub model: Option<&'static str>,
}

/// Group the digits of `value` by three, separated by single spaces
/// (`12500` becomes `"12 500"`).
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn strip_separators(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',' && *c != ' ').collect()
}

fn parse_price(raw: &str) -> Option<u32> {
    let cleaned = strip_separators(raw);
    let digits_only = cleaned.replace('.', "");
    if digits_only.is_empty() || !digits_only.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let amount = cleaned.parse::<f64>().ok()?.trunc();
    if amount < f64::from(*PRICE_RANGE.start()) || amount > f64::from(*PRICE_RANGE.end()) {
        return None;
    }
    Some(amount as u32)
}

fn parse_mileage(raw: &str) -> Option<u32> {
    let cleaned = strip_separators(raw);
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let km = cleaned.parse::<u64>().ok()?;
    if km > u64::from(MILEAGE_MAX) {
        return None;
    }
    u32::try_from(km).ok()
}

/// Extract the first plausible price from `text`.
///
/// Patterns are tried in order (`$` prefix, `$` suffix, `CAD`/`CDN` suffix)
/// and each pattern's matches are scanned in order of appearance. A pattern
/// that yields no accepted match does not stop the next one from being tried.
pub fn extract_price(text: &str) -> Option<Price> {
    PRICE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_price(m.as_str()))
            .map(Price)
    })
}

/// Extract the first plausible mileage (`85,000 km`, `120 000 kilometres`).
pub fn extract_mileage(text: &str) -> Option<Mileage> {
    MILEAGE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_mileage(m.as_str()))
            .map(Mileage)
    })
}

/// Extract a model year (1990 to 2029) plus the first known make and model.
///
/// The year is the first one in text order. Make and model follow the order
/// of [`KNOWN_MAKES`] and [`KNOWN_MODELS`], not their position in the text.
pub fn extract_vehicle(text: &str) -> VehicleInfo {
    let year = YEAR_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok());

    let lowered = text.to_lowercase();
    let find_in = |candidates: &'static [&'static str]| {
        candidates
            .iter()
            .copied()
            .find(|name| lowered.contains(&name.to_lowercase()))
    };

    VehicleInfo {
        year,
        make: find_in(&KNOWN_MAKES),
        model: find_in(&KNOWN_MODELS),
    }
}
