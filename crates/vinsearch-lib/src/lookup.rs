//! VIN lookup engine.
//!
//! [`lookup_vin`] runs the whole pipeline for one request: validate the VIN,
//! search (French query, then an English fallback when the first page is
//! empty), pick the best candidate and extract the listing fields. It never
//! fails: every outcome, provider errors included, is reported through
//! [`LookupStatus`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dealer::dealer_name;
use crate::error::Error;
use crate::extract::{extract_vehicle, Mileage, Price};
use crate::scoring::select_best;
use crate::serpapi::{OrganicResult, SearchQuery, SerpApiClient};
use crate::vin::Vin;

/// Maximum length of the `description` field, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// Maximum length of a provider error message embedded in the status.
pub const ERROR_MESSAGE_MAX_CHARS: usize = 50;

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupStatus {
    /// A candidate was selected and a price was extracted.
    Found,
    /// A candidate was selected but no price could be extracted.
    FoundWithoutPrice,
    /// No candidate qualified; the first raw result is reported.
    Potential,
    /// The search returned nothing for either query.
    #[default]
    NotFound,
    /// The input failed VIN format validation.
    InvalidVin,
    /// The search provider call failed. Holds the truncated error message.
    Error(String),
}

impl LookupStatus {
    /// Build an [`LookupStatus::Error`] from any error, keeping at most
    /// [`ERROR_MESSAGE_MAX_CHARS`] characters of its message.
    pub fn from_error(err: &impl fmt::Display) -> Self {
        LookupStatus::Error(truncate_chars(&err.to_string(), ERROR_MESSAGE_MAX_CHARS))
    }

    /// Short machine label, used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            LookupStatus::Found => "found",
            LookupStatus::FoundWithoutPrice => "found_without_price",
            LookupStatus::Potential => "potential",
            LookupStatus::NotFound => "not_found",
            LookupStatus::InvalidVin => "invalid_vin",
            LookupStatus::Error(_) => "error",
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStatus::Found => f.write_str("Trouvé"),
            LookupStatus::FoundWithoutPrice => f.write_str("Trouvé (prix non disponible)"),
            LookupStatus::Potential => f.write_str("Résultat potentiel"),
            LookupStatus::NotFound => f.write_str("Non trouvé"),
            LookupStatus::InvalidVin => f.write_str("VIN invalide"),
            LookupStatus::Error(message) => write!(f, "Erreur: {}", message),
        }
    }
}

/// Result of one lookup, with absent fields kept as `None`.
///
/// Serializes through [`LookupRecord`], where every field is a string and
/// absent values become `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "LookupRecord")]
pub struct LookupResult {
    /// The VIN exactly as received.
    pub vin: String,
    pub price: Option<Price>,
    pub dealer: Option<String>,
    pub url: Option<String>,
    pub year: Option<u16>,
    pub make: Option<&'static str>,
    pub model: Option<&'static str>,
    pub mileage: Option<Mileage>,
    pub description: Option<String>,
    pub status: LookupStatus,
}

impl LookupResult {
    /// An empty result for `vin` carrying only a status.
    pub fn empty(vin: impl Into<String>, status: LookupStatus) -> Self {
        Self {
            vin: vin.into(),
            status,
            ..Self::default()
        }
    }

    /// Convert to the string-only wire record.
    pub fn to_record(&self) -> LookupRecord {
        LookupRecord::from(self.clone())
    }
}

/// Wire representation of a [`LookupResult`]: every value is a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub vin: String,
    pub prix: String,
    pub concessionnaire: String,
    pub url: String,
    pub annee: String,
    pub marque: String,
    pub modele: String,
    pub km: String,
    pub description: String,
    pub statut: String,
}

fn or_empty<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl From<LookupResult> for LookupRecord {
    fn from(result: LookupResult) -> Self {
        Self {
            vin: result.vin,
            prix: or_empty(result.price),
            concessionnaire: result.dealer.unwrap_or_default(),
            url: result.url.unwrap_or_default(),
            annee: or_empty(result.year),
            marque: or_empty(result.make),
            modele: or_empty(result.model),
            km: or_empty(result.mileage),
            description: result.description.unwrap_or_default(),
            statut: result.status.to_string(),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Look up a VIN and build the listing record.
///
/// `raw_vin` is echoed back untouched in [`LookupResult::vin`]; validation
/// and matching use its trimmed, uppercased form.
pub async fn lookup_vin(client: &SerpApiClient, raw_vin: &str) -> LookupResult {
    let vin = match Vin::parse(raw_vin) {
        Ok(vin) => vin,
        Err(_) => {
            info!(vin = raw_vin, "rejecting malformed VIN");
            return LookupResult::empty(raw_vin, LookupStatus::InvalidVin);
        }
    };

    let results = match search_with_fallback(client, &vin).await {
        Ok(results) => results,
        Err(err) => {
            warn!(vin = %vin, error = %err, "search provider call failed");
            return LookupResult::empty(raw_vin, LookupStatus::from_error(&err));
        }
    };

    let result = build_result(raw_vin, &vin, &results);
    info!(
        vin = %vin,
        organic_results = results.len(),
        status = result.status.label(),
        "lookup completed"
    );
    result
}

/// French query first; English query only when the first page is empty.
async fn search_with_fallback(
    client: &SerpApiClient,
    vin: &Vin,
) -> Result<Vec<OrganicResult>, Error> {
    let results = client.search(vin, SearchQuery::French).await?;
    if !results.is_empty() {
        return Ok(results);
    }

    info!(vin = %vin, "no results for French query, retrying in English");
    client.search(vin, SearchQuery::English).await
}

/// Turn a page of organic results into a lookup result.
pub fn build_result(raw_vin: &str, vin: &Vin, results: &[OrganicResult]) -> LookupResult {
    if let Some(best) = select_best(results, vin) {
        let vehicle = extract_vehicle(&best.result.combined_text());
        let status = if best.price.is_some() {
            LookupStatus::Found
        } else {
            LookupStatus::FoundWithoutPrice
        };

        return LookupResult {
            vin: raw_vin.to_string(),
            price: best.price,
            dealer: dealer_name(&best.result.link),
            url: non_empty(&best.result.link),
            year: vehicle.year,
            make: vehicle.make,
            model: vehicle.model,
            mileage: best.mileage,
            description: non_empty(&truncate_chars(&best.result.title, DESCRIPTION_MAX_CHARS)),
            status,
        };
    }

    match results.first() {
        Some(first) => LookupResult {
            url: non_empty(&first.link),
            description: non_empty(&truncate_chars(&first.title, DESCRIPTION_MAX_CHARS)),
            dealer: dealer_name(&first.link),
            ..LookupResult::empty(raw_vin, LookupStatus::Potential)
        },
        None => LookupResult::empty(raw_vin, LookupStatus::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIN: &str = "1HGCM82633A004352";

    fn result(link: &str, title: &str, snippet: &str) -> OrganicResult {
        OrganicResult {
            link: link.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
        }
    }

    fn vin() -> Vin {
        Vin::parse(VIN).unwrap()
    }

    #[test]
    fn status_strings() {
        assert_eq!(LookupStatus::Found.to_string(), "Trouvé");
        assert_eq!(
            LookupStatus::FoundWithoutPrice.to_string(),
            "Trouvé (prix non disponible)"
        );
        assert_eq!(LookupStatus::Potential.to_string(), "Résultat potentiel");
        assert_eq!(LookupStatus::NotFound.to_string(), "Non trouvé");
        assert_eq!(LookupStatus::InvalidVin.to_string(), "VIN invalide");
        assert_eq!(
            LookupStatus::Error("timeout".into()).to_string(),
            "Erreur: timeout"
        );
    }

    #[test]
    fn error_status_truncates_to_fifty_chars() {
        let long = "é".repeat(80);
        match LookupStatus::from_error(&long) {
            LookupStatus::Error(message) => assert_eq!(message.chars().count(), 50),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn empty_result_serializes_with_empty_strings() {
        let json =
            serde_json::to_value(LookupResult::empty("abc", LookupStatus::InvalidVin)).unwrap();
        assert_eq!(json["vin"], "abc");
        assert_eq!(json["statut"], "VIN invalide");
        for field in [
            "prix",
            "concessionnaire",
            "url",
            "annee",
            "marque",
            "modele",
            "km",
            "description",
        ] {
            assert_eq!(json[field], "", "field {field} should be empty");
        }
    }

    #[test]
    fn selected_candidate_populates_all_fields() {
        let results = vec![result(
            "https://www.autotrader.ca/a/honda/civic/1",
            &format!("{VIN} - Honda Civic for sale"),
            "2015 Honda Civic, 85,000 km, $12,500",
        )];
        let record = build_result(VIN, &vin(), &results).to_record();

        assert_eq!(record.statut, "Trouvé");
        assert_eq!(record.prix, "12 500$");
        assert_eq!(record.km, "85 000 km");
        assert_eq!(record.annee, "2015");
        assert_eq!(record.marque, "Honda");
        assert_eq!(record.modele, "Civic");
        assert_eq!(record.concessionnaire, "AutoTrader");
        assert_eq!(record.url, "https://www.autotrader.ca/a/honda/civic/1");
        assert_eq!(record.description, format!("{VIN} - Honda Civic for sale"));
    }

    #[test]
    fn candidate_without_price_reports_found_without_price() {
        let results = vec![result(
            "https://www.kijiji.ca/v/1",
            &format!("{VIN} - Toyota Corolla"),
            "2018 Toyota Corolla",
        )];
        let result = build_result(VIN, &vin(), &results);
        assert_eq!(result.status, LookupStatus::FoundWithoutPrice);
        assert_eq!(result.price, None);
        assert_eq!(result.make, Some("Toyota"));
        assert_eq!(result.model, Some("Corolla"));
        assert_eq!(result.year, Some(2018));
    }

    #[test]
    fn no_eligible_candidate_falls_back_to_first_result() {
        let results = vec![
            result(
                "https://www.smithmotors.ca/used/1",
                "2015 Honda Civic",
                "$12,500, 85,000 km",
            ),
            result("https://www.autotrader.ca/2", "other", ""),
        ];
        let result = build_result(VIN, &vin(), &results);

        assert_eq!(result.status, LookupStatus::Potential);
        assert_eq!(result.url.as_deref(), Some("https://www.smithmotors.ca/used/1"));
        assert_eq!(result.dealer.as_deref(), Some("Smithmotors"));
        assert_eq!(result.description.as_deref(), Some("2015 Honda Civic"));
        assert_eq!(result.price, None);
        assert_eq!(result.mileage, None);
        assert_eq!(result.year, None);
        assert_eq!(result.make, None);
        assert_eq!(result.model, None);
    }

    #[test]
    fn empty_page_is_not_found() {
        let result = build_result(VIN, &vin(), &[]);
        assert_eq!(result, LookupResult::empty(VIN, LookupStatus::NotFound));
    }

    #[test]
    fn description_is_truncated_to_one_hundred_chars() {
        let long_title = format!("{VIN} - {}", "x".repeat(200));
        let results = vec![result("https://www.clutch.ca/1", &long_title, "")];
        let result = build_result(VIN, &vin(), &results);
        assert_eq!(result.description.unwrap().chars().count(), 100);
    }

    #[test]
    fn raw_vin_is_echoed() {
        let raw = "  1hgcm82633a004352 ";
        let result = build_result(raw, &Vin::parse(raw).unwrap(), &[]);
        assert_eq!(result.vin, raw);
    }
}
