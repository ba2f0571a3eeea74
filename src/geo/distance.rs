//! Great-circle distance kernel
//!
//! Haversine formula on a spherical earth. Pure and total on valid input.

/// Mean earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points in decimal degrees.
///
/// Latitudes must lie in `[-90, 90]` and longitudes in `[-180, 180]`;
/// the caller guarantees this.
///
/// # Examples
/// ```
/// use geodist::geo::distance::distance_km;
/// assert_eq!(distance_km(10.0, 20.0, 10.0, 20.0), 0.0);
/// assert!((distance_km(0.0, 0.0, 0.0, 1.0) - 111.195).abs() < 0.001);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = phi2 - phi1;
    let delta_lambda = lon2.to_radians() - lon1.to_radians();

    let sin_phi = (delta_phi / 2.0).sin();
    let sin_lambda = (delta_lambda / 2.0).sin();
    let a = sin_phi.mul_add(sin_phi, phi1.cos() * phi2.cos() * sin_lambda * sin_lambda);

    // Rounding near the poles and antipodes can push `a` just outside [0, 1]
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
