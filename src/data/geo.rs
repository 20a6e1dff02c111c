use super::model::{Column, Table};

/// Mean Earth radius in kilometres (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Whether the point lies on the globe.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The fixed anchor every distance is measured from (e.g. a school).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub label: String,
    pub point: GeoPoint,
}

impl ReferencePoint {
    pub fn new(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        ReferencePoint {
            label: label.into(),
            point: GeoPoint::new(lat, lon),
        }
    }
}

// ---------------------------------------------------------------------------
// Haversine
// ---------------------------------------------------------------------------

/// Great-circle distance in kilometres on a sphere of radius
/// [`EARTH_RADIUS_KM`]. Good enough at city scale; not ellipsoidal.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Return a copy of `table` where every record carries its distance from
/// `reference`, and the derived distance column is marked present.
pub fn annotate_distance(table: &Table, reference: &ReferencePoint) -> Table {
    let records = table
        .records
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.distance_km = Some(haversine_km(
                reference.point,
                GeoPoint::new(r.latitude, r.longitude),
            ));
            r
        })
        .collect();

    let mut annotated = table.with_records(records);
    if !annotated.has_column(Column::Distance) {
        annotated.columns.push(Column::Distance);
    }
    annotated
}
