use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::model::{Column, RestaurantRecord, Table};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a load attempt produced no table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("required columns missing from source: {}", join_columns(.missing))]
    MissingColumns { missing: Vec<Column> },

    #[error("no row in {location} has valid coordinates")]
    NoValidRows { location: String },

    #[error("failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// `NoValidRows` is an empty state, not a failure worth alarming about.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LoadError::NoValidRows { .. })
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| format!("{} ({})", c.name(), c.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where the CSV document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are URLs, everything else a path.
    pub fn parse(raw: &str) -> Source {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::Path(PathBuf::from(raw))
        }
    }

    /// Identifier used as the cache key and in messages.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch and parse a restaurant table.
///
/// Rows whose latitude or longitude is not numeric are dropped; if none
/// survive the result is [`LoadError::NoValidRows`].
pub fn load(source: &Source, timeout: Duration) -> Result<Table, LoadError> {
    let bytes = match source {
        Source::Url(url) => fetch_url(url, timeout)?,
        Source::Path(path) => read_file(path)?,
    };
    let table = parse_csv(&bytes[..]).map_err(|e| match e {
        LoadError::NoValidRows { .. } => LoadError::NoValidRows {
            location: source.id(),
        },
        other => other,
    })?;
    log::info!("Loaded {} restaurants from {source}", table.len());
    Ok(table)
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |e: reqwest::Error| LoadError::Fetch {
        location: url.to_string(),
        reason: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(fetch_err)?;
    let bytes = response.bytes().map_err(fetch_err)?;
    Ok(bytes.to_vec())
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse a CSV document with a header row into a validated table.
///
/// Headers are trimmed and matched against both the Korean and English
/// column names; unknown headers are ignored. When a column name appears
/// twice the first occurrence wins.
pub fn parse_csv<R: Read>(input: R) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(input);

    let mut index: BTreeMap<Column, usize> = BTreeMap::new();
    for (i, header) in reader.headers()?.iter().enumerate() {
        if let Some(col) = Column::from_name(header) {
            if col != Column::Distance {
                index.entry(col).or_insert(i);
            }
        }
    }

    let missing: Vec<Column> = Column::REQUIRED
        .iter()
        .copied()
        .filter(|c| !index.contains_key(c))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let row = result?;
        let line = sheet_line(&row);
        let cell = |col: Column| index.get(&col).and_then(|&i| row.get(i));
        let optional = |col: Column| {
            cell(col)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let (Some(latitude), Some(longitude)) = (
            coerce_numeric(cell(Column::Latitude)),
            coerce_numeric(cell(Column::Longitude)),
        ) else {
            log::debug!("Dropping CSV line {line}: latitude/longitude not numeric");
            dropped += 1;
            continue;
        };

        records.push(RestaurantRecord {
            name: cell(Column::Name).unwrap_or("").trim().to_string(),
            address: cell(Column::Address).unwrap_or("").trim().to_string(),
            latitude,
            longitude,
            phone: optional(Column::Phone),
            cuisine_type: optional(Column::CuisineType),
            parking_difficulty: optional(Column::ParkingDifficulty),
            closed_days: optional(Column::ClosedDays),
            open_hours: optional(Column::OpenHours),
            notes: optional(Column::Notes),
            distance_km: None,
        });
    }

    if dropped > 0 {
        log::info!("Dropped {dropped} rows without valid coordinates");
    }
    if records.is_empty() {
        return Err(LoadError::NoValidRows {
            location: "document".to_string(),
        });
    }

    let columns = Column::SOURCE
        .iter()
        .copied()
        .filter(|c| index.contains_key(c))
        .collect();
    Ok(Table::new(records, columns))
}

/// 1-based line of `row` in the source text, as a spreadsheet user sees it.
fn sheet_line(row: &csv::StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}

/// Non-numeric, empty and non-finite cells count as missing.
fn coerce_numeric(cell: Option<&str>) -> Option<f64> {
    cell?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
