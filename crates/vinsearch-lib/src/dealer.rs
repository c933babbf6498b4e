//! Dealer and marketplace display names derived from listing URLs.

use url::Url;

/// Known listing domains and their display names. The first entry whose key
/// is a substring of the domain wins.
const DEALER_NAMES: [(&str, &str); 8] = [
    ("autotrader.ca", "AutoTrader"),
    ("kijijiautos.ca", "Kijiji Autos"),
    ("hgregoire.com", "HGrégoire"),
    ("spinelli.ca", "Spinelli"),
    ("carpages.ca", "CarPages"),
    ("cargurus.ca", "CarGurus"),
    ("clutch.ca", "Clutch"),
    ("facebook.com", "Facebook Marketplace"),
];

/// Network domain of `url` without a leading `www.`, or `None` when the URL
/// cannot be parsed or has no host.
///
/// The host comes back normalized: lowercased, and punycode (`xn--`) for
/// internationalized names. Dealer matching and the fallback label both see
/// that form.
pub fn listing_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let domain = host.strip_prefix("www.").unwrap_or(host);
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Resolve a human-readable dealer name for a listing URL.
///
/// Known marketplaces map to their brand name; any other domain falls back to
/// its first label, title-cased (`https://www.smithmotors.ca/...` becomes
/// `"Smithmotors"`).
pub fn dealer_name(url: &str) -> Option<String> {
    let domain = listing_domain(url)?;

    if let Some((_, name)) = DEALER_NAMES.iter().find(|(key, _)| domain.contains(key)) {
        return Some((*name).to_string());
    }

    let first_label = domain.split('.').next().unwrap_or_default();
    Some(title_case(first_label))
}

/// Uppercase the first letter of every alphabetic run and lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_marketplaces_map_to_brand_names() {
        assert_eq!(
            dealer_name("https://www.autotrader.ca/a/honda/civic/123").as_deref(),
            Some("AutoTrader")
        );
        assert_eq!(
            dealer_name("https://www.kijijiautos.ca/cars/honda/").as_deref(),
            Some("Kijiji Autos")
        );
        assert_eq!(
            dealer_name("https://hgregoire.com/fr/vehicule/1").as_deref(),
            Some("HGrégoire")
        );
        assert_eq!(
            dealer_name("https://www.facebook.com/marketplace/item/42").as_deref(),
            Some("Facebook Marketplace")
        );
    }

    #[test]
    fn subdomains_still_match_by_substring() {
        assert_eq!(
            dealer_name("https://fr.autotrader.ca/listing").as_deref(),
            Some("AutoTrader")
        );
    }

    #[test]
    fn unknown_domain_falls_back_to_first_label() {
        assert_eq!(
            dealer_name("https://www.smithmotors.ca/inventory").as_deref(),
            Some("Smithmotors")
        );
        assert_eq!(
            dealer_name("https://auto-plus.example.com/").as_deref(),
            Some("Auto-Plus")
        );
    }

    #[test]
    fn unparsable_url_has_no_dealer() {
        assert_eq!(dealer_name(""), None);
        assert_eq!(dealer_name("not a url"), None);
        assert_eq!(dealer_name("autotrader.ca/listing"), None);
    }

    #[test]
    fn listing_domain_strips_www() {
        assert_eq!(
            listing_domain("https://www.cargurus.ca/Cars").as_deref(),
            Some("cargurus.ca")
        );
        assert_eq!(
            listing_domain("https://clutch.ca/").as_deref(),
            Some("clutch.ca")
        );
    }

    #[test]
    fn host_is_normalized_before_matching() {
        assert_eq!(
            dealer_name("https://www.AutoTrader.CA/a/1").as_deref(),
            Some("AutoTrader")
        );
        assert_eq!(
            listing_domain("https://WWW.SmithMotors.ca/").as_deref(),
            Some("smithmotors.ca")
        );
        assert_eq!(
            dealer_name("https://café.ca/vente").as_deref(),
            Some("Xn--Caf-Dma")
        );
    }

    #[test]
    fn title_case_handles_mixed_input() {
        assert_eq!(title_case("kijiji"), "Kijiji");
        assert_eq!(title_case("AUTOPARC"), "Autoparc");
        assert_eq!(title_case("123abc"), "123Abc");
    }
}
