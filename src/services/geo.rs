//! Geographic calculations

use crate::types::Coordinates;

/// Earth mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle (haversine) distance between two points in kilometers.
///
/// NaN in either input propagates to the result.
pub fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push `a` marginally above 1 for antipodal points.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
