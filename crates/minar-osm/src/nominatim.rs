//! Free-text place search against the Nominatim `/search` endpoint.
//!
//! Only the first candidate is used; the caller recenters on it.

use std::time::Duration;

use isahc::prelude::*;
use isahc::Request;

use minar_geo::Coordinate;

use crate::Error;

/// Public Nominatim search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// The best match for a place query.
#[derive(Debug, Clone)]
pub struct Match {
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(serde::Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
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

    /// Resolve `query` to its best match.
    ///
    /// Returns [`Error::NoResults`] when the service finds nothing.
    pub async fn search(&self, query: &str) -> Result<Match, Error> {
        let url = format!(
            "{}?q={}&format=json&limit=1",
            self.endpoint,
            crate::percent_encode(query)
        );

        let request = Request::get(&url)
            .timeout(Duration::from_secs(15))
            .header("User-Agent", crate::USER_AGENT)
            .header("Accept", "application/json")
            .body(())
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

        first_match(&text)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the response body and extract the first candidate.
fn first_match(body: &str) -> Result<Match, Error> {
    let results: Vec<SearchResult> = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("nominatim response: {e}")))?;
    let first = results.into_iter().next().ok_or(Error::NoResults)?;

    let lat = first
        .lat
        .parse::<f64>()
        .map_err(|e| Error::Parse(format!("invalid lat: {e}")))?;
    let lon = first
        .lon
        .parse::<f64>()
        .map_err(|e| Error::Parse(format!("invalid lon: {e}")))?;
    let coordinate = Coordinate::try_new(lat, lon).map_err(|e| Error::Parse(e.to_string()))?;

    Ok(Match {
        name: first.display_name,
        coordinate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_of_several_candidates() {
        let body = r#"[
            { "lat": "41.0082", "lon": "28.9784", "display_name": "Istanbul, Türkiye" },
            { "lat": "0", "lon": "0", "display_name": "elsewhere" }
        ]"#;
        let m = first_match(body).expect("match");
        assert_eq!(m.name, "Istanbul, Türkiye");
        assert_eq!(m.coordinate, Coordinate::new(41.0082, 28.9784));
    }

    #[test]
    fn empty_candidate_list_is_no_results() {
        assert!(matches!(first_match("[]"), Err(Error::NoResults)));
    }

    #[test]
    fn unparsable_coordinate_is_a_parse_error() {
        let body = r#"[ { "lat": "north", "lon": "28.9", "display_name": "x" } ]"#;
        assert!(matches!(first_match(body), Err(Error::Parse(_))));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(first_match("{}"), Err(Error::Parse(_))));
    }
}
