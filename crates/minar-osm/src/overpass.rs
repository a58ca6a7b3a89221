//! Bounded-radius nearby queries against the Overpass API.
//!
//! One POST per query, no retry, no pagination. Normalization and ranking
//! are pure functions so they can be exercised without a network.

use std::collections::HashSet;
use std::time::Duration;

use isahc::prelude::*;
use isahc::Request;

use minar_geo::{distance_meters, Coordinate};

use crate::place::{normalize, Element, Place};
use crate::Error;

/// Public Overpass API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

// Fixed category filter: mosques.
const AMENITY: &str = "place_of_worship";
const RELIGION: &str = "muslim";

/// Parameters for one nearby query.
#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery {
    pub center: Coordinate,
    pub radius_m: u32,
    /// Cap on the ranked list; `None` keeps every representable result.
    pub max_results: Option<usize>,
}

/// A normalized place annotated with its distance from the query center.
#[derive(Debug, Clone)]
pub struct Ranked {
    pub place: Place,
    pub distance_m: f64,
}

#[derive(serde::Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
}

impl Client {
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Run one nearby query: fetch matching features, normalize them
    /// (dropping unrepresentable ones), and rank by distance from the
    /// center. A response with zero matches is `Ok(vec![])`.
    pub async fn nearby(&self, query: NearbyQuery) -> Result<Vec<Ranked>, Error> {
        let ql = build_query(query.center, query.radius_m);
        let body = format!("data={}", crate::percent_encode(&ql));

        let request = Request::post(&self.endpoint)
            .timeout(Duration::from_secs(30))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("User-Agent", crate::USER_AGENT)
            .body(body)
            .map_err(|e| Error::Http(e.to_string()))?;

        let client = isahc::HttpClient::new().map_err(|e| Error::Http(e.to_string()))?;
        let mut response = client
            .send_async(request)
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let elements = parse_response(&text)?;
        tracing::debug!(elements = elements.len(), "overpass query returned");
        Ok(rank(elements, query.center, query.max_results))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the Overpass QL text selecting the category within `radius_m` of
/// `center`, with centroid output for non-point geometries.
fn build_query(center: Coordinate, radius_m: u32) -> String {
    let lat = center.lat();
    let lon = center.lon();
    let around = format!("(around:{radius_m},{lat},{lon})");
    format!(
        "[out:json][timeout:25];\
         (\
         node[\"amenity\"=\"{AMENITY}\"][\"religion\"=\"{RELIGION}\"]{around};\
         way[\"amenity\"=\"{AMENITY}\"][\"religion\"=\"{RELIGION}\"]{around};\
         relation[\"amenity\"=\"{AMENITY}\"][\"religion\"=\"{RELIGION}\"]{around};\
         );\
         out center tags;"
    )
}

fn parse_response(body: &str) -> Result<Vec<Element>, Error> {
    let parsed: OverpassResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("overpass response: {e}")))?;
    Ok(parsed.elements)
}

/// Normalize, distance-annotate, sort ascending by distance, and trim.
///
/// Deduplicates by place id so the sorted-unique invariant holds even
/// against a response that repeats a feature.
#[must_use]
pub fn rank(elements: Vec<Element>, center: Coordinate, max_results: Option<usize>) -> Vec<Ranked> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<Ranked> = elements
        .into_iter()
        .filter_map(normalize)
        .filter(|place| seen.insert(place.id.clone()))
        .map(|place| {
            let distance_m = distance_meters(center, place.coordinate);
            Ranked { place, distance_m }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    if let Some(max) = max_results {
        ranked.truncate(max);
    }
    ranked
}
