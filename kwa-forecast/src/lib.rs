pub mod error;
pub mod forecast;
pub mod geocode;

#[cfg(feature = "api")]
pub mod client;

pub use error::{ForecastError, Result};
