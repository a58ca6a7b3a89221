pub mod ipapi;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use minar_geo::Coordinate;

/// Errors from one-shot geolocation.
#[derive(Debug)]
pub enum Error {
    /// Transport-level failure.
    Http(String),
    /// The service answered but could not produce a position.
    Unavailable(String),
    /// The lookup did not finish within the client-side deadline.
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "network error: {msg}"),
            Self::Unavailable(msg) => write!(f, "location unavailable: {msg}"),
            Self::Timeout => f.write_str("location lookup timed out"),
        }
    }
}

impl std::error::Error for Error {}

/// A provider that can resolve the device's current position once.
pub trait Locator: Send + Sync + 'static {
    fn locate(&self) -> Pin<Box<dyn Future<Output = Result<Coordinate, Error>> + Send + '_>>;
}
