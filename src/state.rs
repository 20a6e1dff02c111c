use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::cache::TableCache;
use crate::data::filter::{apply_filters, FilterCriteria};
use crate::data::geo::{annotate_distance, ReferencePoint};
use crate::data::loader::{self, LoadError, Source};
use crate::data::model::{Column, Table};
use crate::data::sort::{apply_sort, SortPreset, SortWarning, ViewMode};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// Message shown in place of the list and map when a load gives no table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The sheet parsed but had nothing to show.
    Empty(String),
    /// The load failed; the user can retry with Reload.
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub source: Source,
    pub reference: ReferencePoint,
    pub edit_url: Option<String>,
    fetch_timeout: Duration,
    cache: TableCache,

    /// Loaded table with distances (None until a load succeeds).
    pub table: Option<Arc<Table>>,

    /// Per-column filter selections.
    pub criteria: FilterCriteria,

    /// Quick-access mode set by the dashboard buttons.
    pub mode: ViewMode,

    /// Sort chosen in the selector, used while `mode` is `All`.
    pub sort_preset: SortPreset,

    /// Filtered and sorted rows (cached until the next interaction).
    pub visible: Table,

    /// Warning from the last sort, if the column was missing.
    pub sort_warning: Option<SortWarning>,

    /// Pin colours by cuisine type.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            source: config.source(),
            reference: config.reference_point(),
            edit_url: config.edit_url.clone(),
            fetch_timeout: config.fetch_timeout(),
            cache: TableCache::new(config.cache_ttl()),
            table: None,
            criteria: FilterCriteria::new(),
            mode: ViewMode::default(),
            sort_preset: SortPreset::default(),
            visible: Table::default(),
            sort_warning: None,
            color_map: ColorMap::default(),
            status: None,
        }
    }

    /// How long a loaded table is reused.
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Load the current source, reusing the cached table while it is fresh.
    pub fn load(&mut self, now: Instant) {
        let source = self.source.clone();
        let reference = self.reference.clone();
        let timeout = self.fetch_timeout;

        let result = self.cache.get_or_load(&source.id(), now, || {
            loader::load(&source, timeout).map(|t| annotate_distance(&t, &reference))
        });

        match result {
            Ok(table) if self.table.as_ref().is_some_and(|t| Arc::ptr_eq(t, &table)) => {}
            Ok(table) => self.set_table(table),
            Err(e) => self.set_load_error(e),
        }
    }

    /// Drop the cached table and fetch again.
    pub fn reload(&mut self, now: Instant) {
        self.cache.invalidate(&self.source.id());
        self.criteria.clear();
        self.load(now);
    }

    /// Switch to a local CSV file picked by the user.
    pub fn open_file(&mut self, path: PathBuf, now: Instant) {
        self.source = Source::Path(path);
        self.criteria.clear();
        self.load(now);
    }

    /// Ingest a newly loaded table and rebuild colours. Filter selections
    /// survive for values the new table still has.
    pub fn set_table(&mut self, table: Arc<Table>) {
        log::info!(
            "Showing {} restaurants with columns {:?}",
            table.len(),
            table.columns
        );
        self.color_map = ColorMap::new(&table.unique_values(Column::CuisineType));
        self.criteria.retain(|col, selected| {
            let present = table.unique_values(*col);
            selected.retain(|v| present.contains(v));
            !selected.is_empty()
        });
        self.table = Some(table);
        self.status = None;
        self.refresh();
    }

    fn set_load_error(&mut self, error: LoadError) {
        self.table = None;
        self.visible = Table::default();
        self.sort_warning = None;
        if error.is_recoverable() {
            log::info!("{error}");
            self.status = Some(Status::Empty(
                "현재 표시할 식당 데이터가 없습니다. 구글 시트를 확인해주세요.".to_string(),
            ));
        } else {
            log::error!("Failed to load {}: {error}", self.source);
            self.status = Some(Status::Error(format!("데이터를 불러오지 못했습니다: {error}")));
        }
    }

    /// Recompute `visible` after a filter, mode or sort change.
    pub fn refresh(&mut self) {
        if let Some(table) = &self.table {
            let (visible, warning) = compute_view(table, &self.criteria, self.mode, self.sort_preset);
            self.visible = visible;
            self.sort_warning = warning;
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &str) {
        let selected = self.criteria.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Clear the selection of one column (show everything).
    pub fn clear_filter(&mut self, column: Column) {
        self.criteria.remove(&column);
        self.refresh();
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.refresh();
    }

    pub fn set_sort_preset(&mut self, preset: SortPreset) {
        self.sort_preset = preset;
        self.refresh();
    }

    /// Back to the unfiltered list in default order.
    pub fn reset(&mut self) {
        self.criteria.clear();
        self.mode = ViewMode::All;
        self.sort_preset = SortPreset::default();
        self.refresh();
    }
}

/// Filter, then sort by the active mode (or the preset when no mode is set).
pub fn compute_view(
    table: &Table,
    criteria: &FilterCriteria,
    mode: ViewMode,
    preset: SortPreset,
) -> (Table, Option<SortWarning>) {
    let filtered = apply_filters(table, criteria);
    let spec = mode.sort_spec().unwrap_or_else(|| preset.spec());
    apply_sort(&filtered, &spec)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::io::Write;

    use clap::Parser;

    use super::*;

    fn state_for(file: &tempfile::NamedTempFile) -> AppState {
        let path = file.path().to_string_lossy().into_owned();
        let config = Config::try_parse_from([
            "dine-near",
            "--source",
            path.as_str(),
            "--ref-lat",
            "37.675760",
            "--ref-lon",
            "126.754785",
        ])
        .unwrap();
        AppState::new(&config)
    }

    fn names(t: &Table) -> Vec<&str> {
        t.records.iter().map(|r| r.name.as_str()).collect()
    }

    fn sheet() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "이름,주소,위도,경도,음식종류,주차난이도").unwrap();
        writeln!(file, "B,주엽동,37.700000,126.800000,한식,상").unwrap();
        writeln!(file, "A,주엽동,37.675760,126.754785,중식,하").unwrap();
        writeln!(file, "C,주엽동,37.650000,126.760000,한식,").unwrap();
        writeln!(file, "X,주엽동,없음,126.7,한식,하").unwrap();
        file
    }

    #[test]
    fn load_annotates_and_sorts_by_name() {
        let file = sheet();
        let mut state = state_for(&file);
        state.load(Instant::now());

        assert!(state.status.is_none());
        let table = state.table.as_ref().unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.has_column(Column::Distance));
        assert_eq!(names(&state.visible), vec!["A", "B", "C"]);
        assert_eq!(state.visible.records[0].distance_km, Some(0.0));
    }

    #[test]
    fn modes_and_filters_recompute_view() {
        let file = sheet();
        let mut state = state_for(&file);
        state.load(Instant::now());

        state.set_mode(ViewMode::NearestFirst);
        assert_eq!(names(&state.visible)[0], "A");

        state.set_mode(ViewMode::ParkingEasy);
        assert_eq!(names(&state.visible), vec!["A", "B", "C"]);

        state.toggle_filter_value(Column::CuisineType, "한식");
        assert_eq!(names(&state.visible), vec!["B", "C"]);

        state.toggle_filter_value(Column::CuisineType, "한식");
        assert_eq!(state.visible.len(), 3);

        state.toggle_filter_value(Column::ParkingDifficulty, "하");
        state.reset();
        assert!(state.criteria.is_empty());
        assert_eq!(state.mode, ViewMode::All);
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn cached_table_survives_source_edits_until_reload() {
        let mut file = sheet();
        let mut state = state_for(&file);
        let t0 = Instant::now();
        state.load(t0);

        writeln!(file, "D,주엽동,37.66,126.75,일식,중").unwrap();
        state.load(t0 + Duration::from_secs(60));
        assert_eq!(state.table.as_ref().unwrap().len(), 3);

        state.reload(t0 + Duration::from_secs(120));
        assert_eq!(state.table.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn ttl_refresh_keeps_filters_that_still_apply() {
        let file = sheet();
        let mut state = state_for(&file);
        let t0 = Instant::now();
        state.load(t0);

        state.toggle_filter_value(Column::CuisineType, "한식");
        state.toggle_filter_value(Column::CuisineType, "중식");
        state.toggle_filter_value(Column::ParkingDifficulty, "상");
        assert_eq!(names(&state.visible), vec!["B"]);

        // Expiry refetches the sheet, which has since lost every 중식 row.
        let mut rewritten = std::fs::File::create(file.path()).unwrap();
        writeln!(rewritten, "이름,주소,위도,경도,음식종류,주차난이도").unwrap();
        writeln!(rewritten, "B,주엽동,37.700000,126.800000,한식,상").unwrap();
        writeln!(rewritten, "D,주엽동,37.660000,126.750000,한식,상").unwrap();
        drop(rewritten);

        state.load(t0 + state.cache_ttl());
        assert_eq!(state.table.as_ref().unwrap().len(), 2);
        assert_eq!(
            state.criteria[&Column::CuisineType],
            BTreeSet::from(["한식".to_string()])
        );
        assert!(state.criteria[&Column::ParkingDifficulty].contains("상"));
        assert_eq!(names(&state.visible), vec!["B", "D"]);

        state.reload(t0 + state.cache_ttl() + Duration::from_secs(60));
        assert!(state.criteria.is_empty());
    }

    #[test]
    fn empty_sheet_is_an_info_state() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,address,latitude,longitude").unwrap();
        writeln!(file, "A,addr,north,east").unwrap();
        let mut state = state_for(&file);
        state.load(Instant::now());

        assert!(state.table.is_none());
        assert!(matches!(state.status, Some(Status::Empty(_))));
    }

    #[test]
    fn missing_columns_is_an_error_state() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,address,longitude").unwrap();
        writeln!(file, "A,addr,126.7").unwrap();
        let mut state = state_for(&file);
        state.load(Instant::now());

        match &state.status {
            Some(Status::Error(msg)) => assert!(msg.contains("latitude"), "{msg}"),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn preset_sort_warns_when_distance_absent() {
        let table = crate::data::model::tests::table(vec![
            crate::data::model::tests::record("b", 0.0, 0.0),
            crate::data::model::tests::record("a", 0.0, 0.0),
        ]);
        let (view, warning) = compute_view(
            &table,
            &FilterCriteria::new(),
            ViewMode::All,
            SortPreset::NearestFirst,
        );
        assert_eq!(names(&view), vec!["b", "a"]);
        assert!(warning.is_some());
    }
}
