use crate::types::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_MILE: f64 = 1.60934;

/// Great-circle distance between two points using the haversine formula.
///
/// Returns kilometres, or miles when `use_miles` is set. Non-finite input
/// yields NaN; callers validate coordinates before getting here.
pub fn distance(a: Coordinate, b: Coordinate, use_miles: bool) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    let d = EARTH_RADIUS_KM * c;

    if use_miles {
        d / KM_PER_MILE
    } else {
        d
    }
}
