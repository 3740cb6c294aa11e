//! Coordinate axis completion.
//!
//! Extractors need coordinate values to georeference records even when the
//! request never asked for them. These helpers append the missing coordinate
//! variables to a resolved variable list.

use sos_catalog::{AxisType, Catalog, CoordinateAxis};
use tracing::debug;

/// Name of the auxiliary vertical variable completed for grid requests.
pub const DEPTH: &str = "depth";

/// Append the axis unless it is absent, dimensionless or already listed.
pub fn complete_axis(mut variables: Vec<String>, axis: Option<&CoordinateAxis>) -> Vec<String> {
    if let Some(axis) = axis {
        append_missing(&mut variables, &axis.name, axis.rank());
    }
    variables
}

/// Grid requests also need the `depth` variable and both horizontal axes.
pub fn complete_grid_axes(catalog: &dyn Catalog, mut variables: Vec<String>) -> Vec<String> {
    if let Some(depth) = catalog.find_variable(DEPTH) {
        append_missing(&mut variables, &depth.name, depth.dimensions.len());
    }
    let variables = complete_axis(variables, catalog.coordinate_axis(AxisType::Lat));
    let variables = complete_axis(variables, catalog.coordinate_axis(AxisType::Lon));
    debug!(variables = ?variables, "Completed grid axes");
    variables
}

/// The variables reported as observed properties: everything but the
/// vertical axis.
pub fn observed_properties(variables: &[String], height: Option<&CoordinateAxis>) -> Vec<String> {
    variables
        .iter()
        .filter(|v| {
            height.map_or(true, |axis| {
                !v.eq_ignore_ascii_case(&axis.name) && !v.eq_ignore_ascii_case(axis.short_name())
            })
        })
        .cloned()
        .collect()
}

fn append_missing(variables: &mut Vec<String>, name: &str, rank: usize) {
    if rank > 0 && !variables.iter().any(|v| v.eq_ignore_ascii_case(name)) {
        variables.push(name.to_string());
    }
}
