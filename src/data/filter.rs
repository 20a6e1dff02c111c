use std::collections::{BTreeMap, BTreeSet};

use super::model::{Column, Table};

// ---------------------------------------------------------------------------
// Filter criteria: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column → set of accepted values.
/// A column that is absent, or whose set is empty, imposes no constraint.
pub type FilterCriteria = BTreeMap<Column, BTreeSet<String>>;

/// Categorical columns offered as filters in the UI.
pub const FILTER_COLUMNS: [Column; 3] = [
    Column::CuisineType,
    Column::ParkingDifficulty,
    Column::ClosedDays,
];

/// Return a new table holding the rows that pass every criterion, in
/// their original order.
///
/// A row passes a column criterion when:
/// * The criterion's set is empty → passes (nothing chosen, no constraint)
/// * The row's value for that column is in the set → passes
/// * The row has no value for that column → fails
pub fn apply_filters(table: &Table, criteria: &FilterCriteria) -> Table {
    let records = table
        .records
        .iter()
        .filter(|record| {
            criteria.iter().all(|(col, accepted)| {
                accepted.is_empty()
                    || record
                        .value(*col)
                        .is_some_and(|v| accepted.contains(&v.to_string()))
            })
        })
        .cloned()
        .collect();
    table.with_records(records)
}
