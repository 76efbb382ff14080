//! Great-circle geometry.
//!
//! Pure, synchronous helpers for measuring the distance between two
//! geographic coordinates and rendering it for display. Nothing in this
//! module holds state, so every function is safe to call from any thread.
//!
//! # Example
//!
//! ```
//! use geofix::geo::{distance_km, format_distance};
//!
//! // London to Paris
//! let km = distance_km(51.5074, -0.1278, 48.8566, 2.3522);
//! assert_eq!(format_distance(km), "343.6 km");
//! ```

mod format;

pub use format::format_distance;

/// Mean Earth radius in kilometers used by the spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the great-circle distance between two points in kilometers.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
/// The result is symmetric in its two points, zero for identical points and
/// never negative.
///
/// # Arguments
///
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
///
/// Inputs are not range-checked. Values outside [-90, 90] / [-180, 180]
/// still produce a number, it just has no geographic meaning; callers that
/// accept untrusted coordinates must validate them first.
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1.0 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
