//! Distance command.

use geofix::{distance_km, format_distance};

use crate::error::CliError;

/// Print the great-circle distance between two points.
pub fn run(lat1: f64, lon1: f64, lat2: f64, lon2: f64, raw: bool) -> Result<(), CliError> {
    println!("{}", render(lat1, lon1, lat2, lon2, raw));
    Ok(())
}

fn render(lat1: f64, lon1: f64, lat2: f64, lon2: f64, raw: bool) -> String {
    let km = distance_km(lat1, lon1, lat2, lon2);
    if raw {
        km.to_string()
    } else {
        format_distance(km)
    }
}
