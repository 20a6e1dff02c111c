use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Column – the known schema of the restaurant sheet
// ---------------------------------------------------------------------------

/// A column of the restaurant table.
///
/// The sheet is edited by hand, so every column accepts both its Korean
/// header and an English one. `Distance` never comes from the source; it is
/// derived once coordinates are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    Address,
    Latitude,
    Longitude,
    Phone,
    CuisineType,
    ParkingDifficulty,
    ClosedDays,
    OpenHours,
    Notes,
    Distance,
}

impl Column {
    /// Columns that must be present in the source header.
    pub const REQUIRED: [Column; 4] = [
        Column::Name,
        Column::Address,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Every column that may appear in a source document.
    pub const SOURCE: [Column; 10] = [
        Column::Name,
        Column::Address,
        Column::Latitude,
        Column::Longitude,
        Column::Phone,
        Column::CuisineType,
        Column::ParkingDifficulty,
        Column::ClosedDays,
        Column::OpenHours,
        Column::Notes,
    ];

    /// Order in which columns are shown in the restaurant list.
    pub const DISPLAY: [Column; 9] = [
        Column::Name,
        Column::Distance,
        Column::Address,
        Column::Phone,
        Column::CuisineType,
        Column::ParkingDifficulty,
        Column::ClosedDays,
        Column::OpenHours,
        Column::Notes,
    ];

    /// Canonical English name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Address => "address",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Phone => "phone",
            Column::CuisineType => "cuisine_type",
            Column::ParkingDifficulty => "parking_difficulty",
            Column::ClosedDays => "closed_days",
            Column::OpenHours => "open_hours",
            Column::Notes => "notes",
            Column::Distance => "distance_km",
        }
    }

    /// Header used by the spreadsheet owner, also the UI label.
    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "이름",
            Column::Address => "주소",
            Column::Latitude => "위도",
            Column::Longitude => "경도",
            Column::Phone => "연락처",
            Column::CuisineType => "음식종류",
            Column::ParkingDifficulty => "주차난이도",
            Column::ClosedDays => "휴무",
            Column::OpenHours => "오픈시간",
            Column::Notes => "비고",
            Column::Distance => "거리(km)",
        }
    }

    /// Resolve a header or user-supplied column name.
    ///
    /// Accepts the Korean label or the English name, ignoring surrounding
    /// whitespace and ASCII case.
    pub fn from_name(raw: &str) -> Option<Column> {
        let name = raw.trim();
        Column::SOURCE
            .iter()
            .chain(std::iter::once(&Column::Distance))
            .copied()
            .find(|c| c.label() == name || c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ParkingTier – custom ordering for the parking difficulty column
// ---------------------------------------------------------------------------

/// Parking difficulty tier. The derived `Ord` is the sort order:
/// low < medium < high < unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParkingTier {
    Low,
    Medium,
    High,
    Unknown,
}

impl ParkingTier {
    /// Classify a raw cell. Cells like `"하, 골목 주차"` are judged by
    /// their first comma-separated part.
    pub fn classify(raw: Option<&str>) -> ParkingTier {
        let Some(raw) = raw else {
            return ParkingTier::Unknown;
        };
        let head = raw.split(',').next().unwrap_or("").trim();
        match head.to_ascii_lowercase().as_str() {
            "하" | "low" | "easy" => ParkingTier::Low,
            "중" | "medium" | "mid" => ParkingTier::Medium,
            "상" | "high" | "hard" => ParkingTier::High,
            _ => ParkingTier::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// RestaurantRecord – one row of the sheet
// ---------------------------------------------------------------------------

/// A single validated restaurant row.
///
/// Coordinates are always present; rows without them never leave the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantRecord {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub cuisine_type: Option<String>,
    pub parking_difficulty: Option<String>,
    pub closed_days: Option<String>,
    pub open_hours: Option<String>,
    pub notes: Option<String>,
    /// Kilometres from the reference point, set by `annotate_distance`.
    pub distance_km: Option<f64>,
}

/// A borrowed cell value, used for filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(v) => write!(f, "{v}"),
        }
    }
}

impl RestaurantRecord {
    /// Value of `column` for this record, `None` when missing.
    pub fn value(&self, column: Column) -> Option<CellValue<'_>> {
        fn text(s: &Option<String>) -> Option<CellValue<'_>> {
            s.as_deref().map(CellValue::Text)
        }
        match column {
            Column::Name => Some(CellValue::Text(&self.name)),
            Column::Address => Some(CellValue::Text(&self.address)),
            Column::Latitude => Some(CellValue::Number(self.latitude)),
            Column::Longitude => Some(CellValue::Number(self.longitude)),
            Column::Phone => text(&self.phone),
            Column::CuisineType => text(&self.cuisine_type),
            Column::ParkingDifficulty => text(&self.parking_difficulty),
            Column::ClosedDays => text(&self.closed_days),
            Column::OpenHours => text(&self.open_hours),
            Column::Notes => text(&self.notes),
            Column::Distance => self.distance_km.map(CellValue::Number),
        }
    }

    /// Text shown in a table cell. Distances are rounded to two decimals.
    pub fn display(&self, column: Column) -> String {
        match (column, self.value(column)) {
            (Column::Distance, Some(CellValue::Number(km))) => format!("{km:.2}"),
            (_, Some(v)) => v.to_string(),
            (_, None) => String::new(),
        }
    }

    pub fn parking_tier(&self) -> ParkingTier {
        ParkingTier::classify(self.parking_difficulty.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded (and possibly derived) restaurant list
// ---------------------------------------------------------------------------

/// An immutable list of records plus the set of columns it carries.
///
/// Filtering and sorting build new tables; nothing mutates one in place
/// after it leaves the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub records: Vec<RestaurantRecord>,
    /// Columns present in this table, in display-independent source order.
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(records: Vec<RestaurantRecord>, columns: Vec<Column>) -> Self {
        Table { records, columns }
    }

    /// Same columns, different rows.
    pub fn with_records(&self, records: Vec<RestaurantRecord>) -> Self {
        Table {
            records,
            columns: self.columns.clone(),
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Sorted unique non-missing values of a column, for filter widgets.
    pub fn unique_values(&self, column: Column) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.value(column))
            .map(|v| v.to_string())
            .collect()
    }

    /// Columns to show in the restaurant list, in display order.
    pub fn display_columns(&self) -> Vec<Column> {
        Column::DISPLAY
            .iter()
            .copied()
            .filter(|c| self.has_column(*c))
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
