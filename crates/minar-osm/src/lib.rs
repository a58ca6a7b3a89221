//! OpenStreetMap service clients: bounded-radius nearby queries via the
//! Overpass API and free-text place search via Nominatim.

pub mod nominatim;
pub mod overpass;
pub mod place;

use std::fmt;
use std::fmt::Write as _;

/// User-Agent sent with every request. Both services ask callers to identify
/// themselves.
pub const USER_AGENT: &str = "minar/1.0";

/// Errors from OSM service operations.
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure: connect, TLS, timeout, or request build.
    Http(String),
    /// The service replied with a non-success status.
    Api { status: u16, body: String },
    /// The response body did not match the expected shape.
    Parse(String),
    /// The search matched nothing.
    NoResults,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "network error: {msg}"),
            Self::Api { status, body } => write!(f, "API error ({status}): {body}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::NoResults => f.write_str("no results"),
        }
    }
}

impl std::error::Error for Error {}

/// Percent-encode a string for use in a URL query parameter or an
/// urlencoded form body.
pub(crate) fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
