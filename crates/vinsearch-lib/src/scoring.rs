//! Candidate scoring and best-of-N selection over organic search results.
//!
//! A result is only a candidate when its title or snippet mentions the VIN.
//! Candidates earn points for being hosted on a known automotive marketplace
//! and for exposing a parseable price or mileage.

use crate::extract::{extract_mileage, extract_price, Mileage, Price};
use crate::serpapi::OrganicResult;
use crate::vin::Vin;

/// Only the first results of a page are considered.
pub const MAX_CANDIDATES: usize = 5;

/// Domain fragments of known automotive marketplaces (matched against the
/// lowercased result URL).
pub const AUTO_MARKETPLACES: [&str; 6] = [
    "autotrader",
    "kijiji",
    "hgregoire",
    "carpages",
    "cargurus",
    "clutch",
];

pub const MARKETPLACE_WEIGHT: u32 = 10;
pub const PRICE_WEIGHT: u32 = 5;
pub const MILEAGE_WEIGHT: u32 = 2;

/// An eligible result together with what was extracted while scoring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate<'a> {
    pub result: &'a OrganicResult,
    pub score: u32,
    pub price: Option<Price>,
    pub mileage: Option<Mileage>,
}

/// Whether `url` points at one of [`AUTO_MARKETPLACES`].
pub fn is_marketplace(url: &str) -> bool {
    let url = url.to_lowercase();
    AUTO_MARKETPLACES.iter().any(|site| url.contains(site))
}

/// Score a single result, or `None` when it does not mention `vin`.
pub fn score_candidate<'a>(result: &'a OrganicResult, vin: &Vin) -> Option<ScoredCandidate<'a>> {
    let text = result.combined_text();
    if !text.to_uppercase().contains(vin.as_str()) {
        return None;
    }

    let price = extract_price(&text);
    let mileage = extract_mileage(&text);

    let mut score = 0;
    if is_marketplace(&result.link) {
        score += MARKETPLACE_WEIGHT;
    }
    if price.is_some() {
        score += PRICE_WEIGHT;
    }
    if mileage.is_some() {
        score += MILEAGE_WEIGHT;
    }

    Some(ScoredCandidate {
        result,
        score,
        price,
        mileage,
    })
}

/// Pick the best candidate among the first [`MAX_CANDIDATES`] results.
///
/// The running best starts at a score of zero and is only replaced by a
/// strictly greater score, so ties go to the earlier result and a candidate
/// scoring zero is never selected.
pub fn select_best<'a>(results: &'a [OrganicResult], vin: &Vin) -> Option<ScoredCandidate<'a>> {
    let mut best: Option<ScoredCandidate<'a>> = None;
    let mut best_score = 0;

    for candidate in results
        .iter()
        .take(MAX_CANDIDATES)
        .filter_map(|result| score_candidate(result, vin))
    {
        if candidate.score > best_score {
            best_score = candidate.score;
            best = Some(candidate);
        }
    }

    best
}
