//! IP-based geolocation via the ip-api.com JSON endpoint.
//!
//! Coarse (city-level at best), but needs no permission prompt and no API
//! key. Good enough to center the first nearby query.

use std::time::Duration;

use isahc::prelude::*;
use isahc::Request;

use minar_geo::Coordinate;

use super::{Error, Locator};

const ENDPOINT: &str = "http://ip-api.com/json?fields=status,message,lat,lon";

/// Client-side cap on the whole lookup.
pub const TIMEOUT: Duration = Duration::from_secs(10);

pub struct Backend;

impl Locator for Backend {
    fn locate(
        &self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Coordinate, Error>> + Send + '_>,
    > {
        Box::pin(locate())
    }
}

#[derive(serde::Deserialize)]
struct Response {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

async fn locate() -> Result<Coordinate, Error> {
    let request = Request::get(ENDPOINT)
        .timeout(TIMEOUT)
        .header("User-Agent", minar_osm::USER_AGENT)
        .body(())
        .map_err(|e| Error::Http(e.to_string()))?;

    let client = isahc::HttpClient::new().map_err(|e| Error::Http(e.to_string()))?;
    let mut response = client
        .send_async(request)
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::Unavailable(format!(
            "ip-api returned status {}",
            response.status()
        )));
    }

    let body = response.text().await.map_err(|e| Error::Http(e.to_string()))?;
    parse_position(&body)
}

fn parse_position(body: &str) -> Result<Coordinate, Error> {
    let parsed: Response = serde_json::from_str(body)
        .map_err(|e| Error::Unavailable(format!("failed to parse ip-api response: {e}")))?;

    if parsed.status != "success" {
        return Err(Error::Unavailable(
            parsed.message.unwrap_or_else(|| "lookup failed".to_owned()),
        ));
    }
    let (Some(lat), Some(lon)) = (parsed.lat, parsed.lon) else {
        return Err(Error::Unavailable("response missing coordinates".to_owned()));
    };
    Coordinate::try_new(lat, lon).map_err(|e| Error::Unavailable(e.to_string()))
}
