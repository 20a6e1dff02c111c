use super::geo::{GeoPoint, ReferencePoint};
use super::model::{RestaurantRecord, Table};

/// Placeholder for optional fields the sheet left blank.
const NOT_AVAILABLE: &str = "정보 없음";

/// Prefix of the plot series name given to each pin.
const SERIES_PREFIX: &str = "pin#";

/// One pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub position: GeoPoint,
    pub label: String,
    pub popup: String,
}

/// The area the map should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub min: GeoPoint,
    pub max: GeoPoint,
    pub center: GeoPoint,
}

pub fn markers(table: &Table) -> Vec<MapMarker> {
    table.records.iter().map(marker).collect()
}

fn marker(record: &RestaurantRecord) -> MapMarker {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut lines = vec![
        format!("주소: {}", record.address),
        format!("연락처: {}", or_na(&record.phone)),
        format!("음식 종류: {}", or_na(&record.cuisine_type)),
        format!("주차 난이도: {}", or_na(&record.parking_difficulty)),
        format!("휴무: {}", or_na(&record.closed_days)),
        format!("오픈 시간: {}", or_na(&record.open_hours)),
    ];
    if let Some(km) = record.distance_km {
        lines.push(format!("거리: {km:.2} km"));
    }
    lines.push(format!("비고: {}", or_na(&record.notes)));

    MapMarker {
        position: GeoPoint::new(record.latitude, record.longitude),
        label: record.name.clone(),
        popup: lines.join("\n"),
    }
}

/// Plot series name for the pin at `index`. Unique even when restaurant
/// names repeat.
pub fn series_name(index: usize) -> String {
    format!("{SERIES_PREFIX}{index}")
}

/// Hover text for the series `name`, looked up by pin index.
pub fn hover_text(pins: &[MapMarker], name: &str) -> Option<String> {
    let index: usize = name.strip_prefix(SERIES_PREFIX)?.parse().ok()?;
    pins.get(index)
        .map(|m| format!("{}\n{}", m.label, m.popup))
}

/// Bounding box and mean centre of the visible records, or a zero-size box
/// on the reference point when nothing is visible.
pub fn view_bounds(table: &Table, reference: &ReferencePoint) -> ViewBounds {
    if table.is_empty() {
        return ViewBounds {
            min: reference.point,
            max: reference.point,
            center: reference.point,
        };
    }

    let n = table.len() as f64;
    let mut min = GeoPoint::new(f64::INFINITY, f64::INFINITY);
    let mut max = GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
    for r in &table.records {
        min.lat = min.lat.min(r.latitude);
        min.lon = min.lon.min(r.longitude);
        max.lat = max.lat.max(r.latitude);
        max.lon = max.lon.max(r.longitude);
        lat_sum += r.latitude;
        lon_sum += r.longitude;
    }

    ViewBounds {
        min,
        max,
        center: GeoPoint::new(lat_sum / n, lon_sum / n),
    }
}
