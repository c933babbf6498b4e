//! VIN marketplace lookup library.
//!
//! This crate validates Vehicle Identification Numbers, queries the SerpApi
//! web search endpoint for listings that mention them, scores the organic
//! results against known Canadian automotive marketplaces, and extracts a
//! best-guess listing (price, mileage, year, make, model, dealer) from the
//! winning result's text. Higher-level consumers (CLI, HTTP service, Lambda)
//! should only depend on the functions exported here instead of reimplementing
//! behavior.

#![deny(warnings)]

pub mod dealer;
pub mod error;
pub mod extract;
pub mod lookup;
pub mod scoring;
pub mod serpapi;
pub mod vin;

pub use dealer::dealer_name;
pub use error::{Error, Result};
pub use extract::{extract_mileage, extract_price, extract_vehicle, Mileage, Price, VehicleInfo};
pub use lookup::{lookup_vin, LookupRecord, LookupResult, LookupStatus};
pub use scoring::{score_candidate, select_best, ScoredCandidate};
pub use serpapi::{OrganicResult, SearchConfig, SearchQuery, SerpApiClient};
pub use vin::Vin;
