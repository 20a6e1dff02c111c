use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::data::geo::ReferencePoint;
use crate::data::loader::Source;

/// Longest accepted cache TTL: one year.
const MAX_CACHE_TTL_HOURS: u64 = 24 * 365;

/// Published CSV export of the shared restaurant sheet.
const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vR6q6NZYeuslBgpRhgLnjpKOibv56VFnpsBvQDbHvfxE9KnQSUkrVIAF6bCOkrd92EO1JdGrm--H5KW/pub?output=csv";

/// Runtime configuration. Every flag can also be set through the
/// environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "dine-near")]
#[command(about = "Restaurant dashboard sorted by distance from a reference point")]
pub struct Config {
    /// CSV source: an http(s) URL or a local file path.
    #[arg(long, env = "DINE_NEAR_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Link to the editable sheet, shown in the info box.
    #[arg(long, env = "DINE_NEAR_EDIT_URL")]
    pub edit_url: Option<String>,

    /// Reference point latitude in decimal degrees.
    #[arg(long, env = "DINE_NEAR_REF_LAT", default_value_t = 37.675760, allow_negative_numbers = true)]
    pub ref_lat: f64,

    /// Reference point longitude in decimal degrees.
    #[arg(long, env = "DINE_NEAR_REF_LON", default_value_t = 126.754785, allow_negative_numbers = true)]
    pub ref_lon: f64,

    /// Name shown on the reference point marker.
    #[arg(long, env = "DINE_NEAR_REF_LABEL", default_value = "주엽고등학교")]
    pub ref_label: String,

    /// How long a loaded table is reused before refetching.
    #[arg(long, env = "DINE_NEAR_CACHE_TTL_HOURS", default_value_t = 24)]
    pub cache_ttl_hours: u64,

    /// Timeout for fetching the sheet.
    #[arg(long, env = "DINE_NEAR_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Parse flags and environment, then validate.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.reference_point().point.is_valid() {
            bail!(
                "reference point ({}, {}) is not a valid latitude/longitude",
                self.ref_lat,
                self.ref_lon
            );
        }
        if self.cache_ttl_hours == 0 {
            bail!("cache TTL must be at least one hour");
        }
        if self.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            bail!(
                "cache TTL of {} hours exceeds the {MAX_CACHE_TTL_HOURS}-hour maximum",
                self.cache_ttl_hours
            );
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch timeout must be at least one second");
        }
        if self.source.trim().is_empty() {
            bail!("data source must not be empty");
        }
        Ok(())
    }

    pub fn reference_point(&self) -> ReferencePoint {
        ReferencePoint::new(self.ref_label.clone(), self.ref_lat, self.ref_lon)
    }

    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(60 * 60))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("dine-near").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--source",
            "data/places.csv",
            "--ref-lat",
            "-33.8688",
            "--ref-lon",
            "151.2093",
            "--cache-ttl-hours",
            "2",
        ]);
        config.validate().unwrap();
        assert_eq!(config.source(), Source::parse("data/places.csv"));
        assert_eq!(config.reference_point().point.lat, -33.8688);
        assert_eq!(config.cache_ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn rejects_off_globe_reference() {
        let config = parse(&["--ref-lat", "376757.6"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_ttl() {
        let config = parse(&["--cache-ttl-hours", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_ttl_without_overflowing() {
        let config = parse(&["--cache-ttl-hours", "18446744073709551615"]);
        assert!(config.validate().is_err());
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));

        let year = parse(&["--cache-ttl-hours", "8760"]);
        year.validate().unwrap();
    }

    #[test]
    fn rejects_zero_fetch_timeout() {
        let config = parse(&["--fetch-timeout-secs", "0"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch timeout"), "{err}");
    }
}
