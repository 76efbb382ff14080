//! Display formatting for distances.

/// Renders a distance for display.
///
/// Below one kilometer the value is shown in whole meters (`"235 m"`),
/// otherwise in kilometers with one decimal (`"3.1 km"`). No grouping
/// separators and no localization.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as i64)
    } else {
        format!("{:.1} km", distance_km)
    }
}
