use std::cmp::Ordering;

use thiserror::Error;

use super::model::{CellValue, Column, ParkingTier, RestaurantRecord, Table};

// ---------------------------------------------------------------------------
// Sort specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A column name plus a direction. The name is resolved when the sort is
/// applied, so a spec may refer to a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: Column) -> Self {
        SortSpec::new(column.name(), SortDirection::Ascending)
    }

    pub fn descending(column: Column) -> Self {
        SortSpec::new(column.name(), SortDirection::Descending)
    }
}

/// Non-fatal problem reported alongside a (possibly unsorted) table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortWarning {
    #[error("sort column '{0}' not found; showing unsorted list")]
    UnknownColumn(String),
}

// ---------------------------------------------------------------------------
// Presets and view modes offered by the UI
// ---------------------------------------------------------------------------

/// Entries of the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreset {
    #[default]
    NameAscending,
    NameDescending,
    NearestFirst,
    FarthestFirst,
}

impl SortPreset {
    pub const ALL: [SortPreset; 4] = [
        SortPreset::NameAscending,
        SortPreset::NameDescending,
        SortPreset::NearestFirst,
        SortPreset::FarthestFirst,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortPreset::NameAscending => "이름순 (오름차순)",
            SortPreset::NameDescending => "이름순 (내림차순)",
            SortPreset::NearestFirst => "거리순 (가까운 순)",
            SortPreset::FarthestFirst => "거리순 (먼 순)",
        }
    }

    pub fn spec(self) -> SortSpec {
        match self {
            SortPreset::NameAscending => SortSpec::ascending(Column::Name),
            SortPreset::NameDescending => SortSpec::descending(Column::Name),
            SortPreset::NearestFirst => SortSpec::ascending(Column::Distance),
            SortPreset::FarthestFirst => SortSpec::descending(Column::Distance),
        }
    }
}

/// Quick-access mode toggled by the dashboard buttons. When set, its sort
/// takes precedence over the selected preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    All,
    /// Easiest parking first.
    ParkingEasy,
    /// Closest to the reference point first.
    NearestFirst,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::All => "모든 필터/정렬 해제",
            ViewMode::ParkingEasy => "주차 걱정 No!",
            ViewMode::NearestFirst => "학교와의 거리순",
        }
    }

    /// Sort to apply in this mode, `None` to defer to the preset.
    pub fn sort_spec(self) -> Option<SortSpec> {
        match self {
            ViewMode::All => None,
            ViewMode::ParkingEasy => Some(SortSpec::ascending(Column::ParkingDifficulty)),
            ViewMode::NearestFirst => Some(SortSpec::ascending(Column::Distance)),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Return a sorted copy of `table`.
///
/// If the column is unknown or absent from the table, the rows keep their
/// current order and a warning is returned with them. The sort is stable,
/// and missing values go last whatever the direction. Parking difficulty
/// sorts by tier; an unrecognised tier counts as missing.
pub fn apply_sort(table: &Table, spec: &SortSpec) -> (Table, Option<SortWarning>) {
    let Some(column) = Column::from_name(&spec.column).filter(|c| table.has_column(*c)) else {
        log::warn!("Sort column '{}' not found, leaving order unchanged", spec.column);
        return (
            table.clone(),
            Some(SortWarning::UnknownColumn(spec.column.clone())),
        );
    };

    let mut records = table.records.clone();
    records.sort_by(|a, b| match (sort_key(a, column), sort_key(b, column)) {
        (Some(x), Some(y)) => {
            let ord = x.compare(&y);
            match spec.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    (table.with_records(records), None)
}

enum SortKey<'a> {
    Tier(ParkingTier),
    Number(f64),
    Text(&'a str),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Tier(a), SortKey::Tier(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // Keys of one column always share a variant.
            _ => Ordering::Equal,
        }
    }
}

fn sort_key(record: &RestaurantRecord, column: Column) -> Option<SortKey<'_>> {
    if column == Column::ParkingDifficulty {
        return match record.parking_tier() {
            ParkingTier::Unknown => None,
            tier => Some(SortKey::Tier(tier)),
        };
    }
    match record.value(column)? {
        CellValue::Number(v) => Some(SortKey::Number(v)),
        CellValue::Text(s) => Some(SortKey::Text(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::{annotate_distance, ReferencePoint};
    use crate::data::model::tests::{record, table};

    fn names(t: &Table) -> Vec<&str> {
        t.records.iter().map(|r| r.name.as_str()).collect()
    }

    fn parked(name: &str, parking: Option<&str>) -> RestaurantRecord {
        let mut r = record(name, 37.6, 126.7);
        r.parking_difficulty = parking.map(str::to_string);
        r
    }

    #[test]
    fn parking_sorts_by_tier_then_unknown() {
        let t = table(vec![
            parked("unknown", Some("모름")),
            parked("high", Some("상")),
            parked("none", None),
            parked("low", Some("하, 넓음")),
            parked("medium", Some("중")),
            parked("low2", Some("low")),
        ]);
        let (sorted, warning) = apply_sort(&t, &SortSpec::ascending(Column::ParkingDifficulty));
        assert!(warning.is_none());
        assert_eq!(
            names(&sorted),
            vec!["low", "low2", "medium", "high", "unknown", "none"]
        );
    }

    #[test]
    fn descending_keeps_missing_last() {
        let t = table(vec![
            parked("none", None),
            parked("low", Some("하")),
            parked("high", Some("상")),
        ]);
        let (sorted, _) = apply_sort(&t, &SortSpec::descending(Column::ParkingDifficulty));
        assert_eq!(names(&sorted), vec!["high", "low", "none"]);

        let mut a = record("a", 0.0, 0.0);
        a.phone = Some("1".into());
        let mut c = record("c", 0.0, 0.0);
        c.phone = Some("3".into());
        let t = table(vec![record("b", 0.0, 0.0), a, c]);
        let (sorted, _) = apply_sort(&t, &SortSpec::descending(Column::Phone));
        assert_eq!(names(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn sorts_by_name_in_both_directions() {
        let t = table(vec![record("나", 0.0, 0.0), record("가", 0.0, 0.0), record("다", 0.0, 0.0)]);
        let (asc, _) = apply_sort(&t, &SortPreset::NameAscending.spec());
        assert_eq!(names(&asc), vec!["가", "나", "다"]);
        let (desc, _) = apply_sort(&t, &SortPreset::NameDescending.spec());
        assert_eq!(names(&desc), vec!["다", "나", "가"]);
    }

    #[test]
    fn nearest_first_after_annotation() {
        let reference = ReferencePoint::new("school", 37.675760, 126.754785);
        let t = table(vec![
            record("B", 37.700000, 126.800000),
            record("A", 37.675760, 126.754785),
        ]);
        let annotated = annotate_distance(&t, &reference);

        let (sorted, warning) = apply_sort(&annotated, &SortPreset::NearestFirst.spec());
        assert!(warning.is_none());
        assert_eq!(names(&sorted), vec!["A", "B"]);

        let (sorted, _) = apply_sort(&annotated, &SortPreset::FarthestFirst.spec());
        assert_eq!(names(&sorted), vec!["B", "A"]);
    }

    #[test]
    fn unknown_column_warns_and_keeps_order() {
        let t = table(vec![record("b", 0.0, 0.0), record("a", 0.0, 0.0)]);
        let (out, warning) = apply_sort(&t, &SortSpec::new("rating", SortDirection::Ascending));
        assert_eq!(out, t);
        assert_eq!(warning, Some(SortWarning::UnknownColumn("rating".into())));
    }

    #[test]
    fn distance_before_annotation_is_unknown() {
        let t = table(vec![record("b", 0.0, 0.0), record("a", 0.0, 0.0)]);
        let (out, warning) = apply_sort(&t, &SortPreset::NearestFirst.spec());
        assert_eq!(names(&out), vec!["b", "a"]);
        assert!(matches!(warning, Some(SortWarning::UnknownColumn(c)) if c == "distance_km"));
    }

    #[test]
    fn sort_is_stable() {
        let t = table(vec![
            parked("first", Some("하")),
            parked("second", Some("하")),
            parked("third", Some("하")),
        ]);
        let (sorted, _) = apply_sort(&t, &SortSpec::ascending(Column::ParkingDifficulty));
        assert_eq!(names(&sorted), vec!["first", "second", "third"]);
    }

    #[test]
    fn korean_column_names_resolve() {
        let t = table(vec![record("b", 2.0, 0.0), record("a", 1.0, 0.0)]);
        let (sorted, warning) = apply_sort(&t, &SortSpec::new("위도", SortDirection::Ascending));
        assert!(warning.is_none());
        assert_eq!(names(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn view_modes_pick_their_sort() {
        assert_eq!(ViewMode::All.sort_spec(), None);
        assert_eq!(
            ViewMode::ParkingEasy.sort_spec(),
            Some(SortSpec::ascending(Column::ParkingDifficulty))
        );
        assert_eq!(
            ViewMode::NearestFirst.sort_spec(),
            Some(SortSpec::ascending(Column::Distance))
        );
    }
}
