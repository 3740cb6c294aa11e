//! Ready-made in-memory datasets, one per feature type.
//!
//! All fixtures share the naming authority [`AUTHORITY`] and a time axis in
//! [`TIME_UNITS`], so `0.0` is `2020-01-01T00:00:00Z`.

use sos_catalog::{
    Attribute, Dimension, FeatureType, MemoryCatalog, Station, Variable,
};

use crate::generators::{indexed_values, ramp};

/// Naming authority of every fixture.
pub const AUTHORITY: &str = "edu.test";

/// Units of every fixture time axis.
pub const TIME_UNITS: &str = "hours since 2020-01-01 00:00:00";

fn dims(shape: &[(&str, usize)]) -> Vec<Dimension> {
    shape.iter().map(|(n, l)| Dimension::new(*n, *l)).collect()
}

fn time_var(shape: &[(&str, usize)]) -> Variable {
    Variable::new("time", dims(shape))
        .with_attribute(Attribute::text("standard_name", "time"))
        .with_attribute(Attribute::text("units", TIME_UNITS))
}

fn lat_var(shape: &[(&str, usize)]) -> Variable {
    Variable::new("lat", dims(shape))
        .with_attribute(Attribute::text("standard_name", "latitude"))
        .with_attribute(Attribute::text("units", "degrees_north"))
}

fn lon_var(shape: &[(&str, usize)]) -> Variable {
    Variable::new("lon", dims(shape))
        .with_attribute(Attribute::text("standard_name", "longitude"))
        .with_attribute(Attribute::text("units", "degrees_east"))
}

fn height_var(name: &str, levels: usize) -> Variable {
    Variable::new(name, dims(&[(name, levels)]))
        .with_attribute(Attribute::text("axis", "Z"))
        .with_attribute(Attribute::text("units", "m"))
        .with_attribute(Attribute::text("positive", "down"))
}

/// `sea_water_temperature` in degC with a -999 fill value.
pub fn temperature_var(shape: &[(&str, usize)]) -> Variable {
    Variable::new("temp", dims(shape))
        .with_attribute(Attribute::text("standard_name", "sea_water_temperature"))
        .with_attribute(Attribute::text("units", "degC"))
        .with_attribute(Attribute::number("_FillValue", -999.0))
}

/// Two fixed buoys, three hourly steps, temperature and salinity.
///
/// `temp` is `[10, 10.5, 11]` at buoy1 and `[12, 12.5, 13]` at buoy2.
pub fn station_catalog() -> MemoryCatalog {
    station_catalog_with_times(ramp(0.0, 1.0, 3), None)
}

/// [`station_catalog`] with its own three time values and an optional
/// `_FillValue` on the time variable.
pub fn station_catalog_with_times(times: Vec<f64>, time_fill: Option<f64>) -> MemoryCatalog {
    let mut time = time_var(&[("time", 3)]);
    if let Some(fill) = time_fill {
        time = time.with_attribute(Attribute::number("_FillValue", fill));
    }
    let salinity = Variable::new("salinity", dims(&[("station", 2), ("time", 3)]))
        .with_attribute(Attribute::text("standard_name", "sea_water_salinity"))
        .with_attribute(Attribute::text("units", "psu"));

    MemoryCatalog::new(Some(FeatureType::Station), AUTHORITY)
        .with_entity_dimension("station")
        .with_station(Station::at("buoy1", 41.5, -70.6))
        .with_station(Station::at("buoy2", 42.0, -70.1))
        .with_variable(time, times)
        .with_variable(lat_var(&[("station", 2)]), vec![41.5, 42.0])
        .with_variable(lon_var(&[("station", 2)]), vec![-70.6, -70.1])
        .with_variable(
            temperature_var(&[("station", 2), ("time", 3)]),
            vec![10.0, 10.5, 11.0, 12.0, 12.5, 13.0],
        )
        .with_variable(salinity, vec![30.0, 30.1, 30.2, 31.0, 31.1, 31.2])
}

/// Two stations, two time steps six hours apart, three levels at 0, 5 and
/// 10 m. Temperature falls by one degree per level and per step.
pub fn station_profile_catalog() -> MemoryCatalog {
    MemoryCatalog::new(Some(FeatureType::StationProfile), AUTHORITY)
        .with_entity_dimension("station")
        .with_station(Station::at("s1", 43.0, -69.0))
        .with_station(Station::at("s2", 43.5, -68.5))
        .with_variable(time_var(&[("time", 2)]), vec![0.0, 6.0])
        .with_variable(height_var("z", 3), vec![0.0, 5.0, 10.0])
        .with_variable(
            temperature_var(&[("station", 2), ("time", 2), ("z", 3)]),
            vec![
                20.0, 19.0, 18.0, 17.0, 16.0, 15.0, //
                21.0, 20.0, 19.0, 18.0, 17.0, 16.0,
            ],
        )
}

/// Two profiles one day apart. Positions come from the lat/lon variables.
pub fn profile_catalog() -> MemoryCatalog {
    MemoryCatalog::new(Some(FeatureType::Profile), AUTHORITY)
        .with_entity_dimension("profile")
        .with_station(Station::new("p1"))
        .with_station(Station::new("p2"))
        .with_variable(time_var(&[("profile", 2)]), vec![0.0, 24.0])
        .with_variable(lat_var(&[("profile", 2)]), vec![40.0, 40.5])
        .with_variable(lon_var(&[("profile", 2)]), vec![-70.0, -69.5])
        .with_variable(height_var("z", 3), vec![0.0, 5.0, 10.0])
        .with_variable(
            temperature_var(&[("profile", 2), ("z", 3)]),
            vec![18.0, 17.0, 16.0, 14.0, 13.0, 12.0],
        )
}

/// Two trajectories of three hourly observations each.
pub fn trajectory_catalog() -> MemoryCatalog {
    let shape = [("trajectory", 2), ("obs", 3)];
    MemoryCatalog::new(Some(FeatureType::Trajectory), AUTHORITY)
        .with_entity_dimension("trajectory")
        .with_station(Station::new("glider1"))
        .with_station(Station::new("glider2"))
        .with_variable(time_var(&shape), vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0])
        .with_variable(lat_var(&shape), vec![40.0, 40.1, 40.2, 35.0, 35.1, 35.2])
        .with_variable(lon_var(&shape), vec![-70.0, -69.9, -69.8, -75.0, -74.8, -74.6])
        .with_variable(
            temperature_var(&shape),
            vec![18.0, 18.5, 19.0, 21.0, 21.5, 22.0],
        )
}

/// One section of two profiles twelve hours apart, two levels each.
pub fn section_catalog() -> MemoryCatalog {
    let shape = [("section", 1), ("obs", 2)];
    MemoryCatalog::new(Some(FeatureType::Section), AUTHORITY)
        .with_entity_dimension("section")
        .with_station(Station::new("transect1"))
        .with_variable(time_var(&shape), vec![0.0, 12.0])
        .with_variable(lat_var(&shape), vec![30.0, 31.0])
        .with_variable(lon_var(&shape), vec![-60.0, -61.0])
        .with_variable(height_var("z", 2), vec![0.0, 20.0])
        .with_variable(
            temperature_var(&[("section", 1), ("obs", 2), ("z", 2)]),
            vec![25.0, 24.0, 23.0, 22.0],
        )
}

/// A 3 x 2 grid with two depths and two hourly steps.
///
/// `temp[time][depth][lat][lon]` holds its own flat index:
/// `time * 12 + depth * 6 + lat * 2 + lon`.
pub fn grid_catalog() -> MemoryCatalog {
    MemoryCatalog::new(Some(FeatureType::Grid), AUTHORITY)
        .with_variable(time_var(&[("time", 2)]), vec![0.0, 1.0])
        .with_variable(height_var("depth", 2), vec![0.0, 10.0])
        .with_variable(lat_var(&[("lat", 3)]), vec![40.0, 41.0, 42.0])
        .with_variable(lon_var(&[("lon", 2)]), vec![-71.0, -70.0])
        .with_variable(
            temperature_var(&[("time", 2), ("depth", 2), ("lat", 3), ("lon", 2)]),
            indexed_values(24),
        )
}

/// A dataset whose feature type GetObservation cannot serve. It has no time
/// axis either.
pub fn unsupported_catalog() -> MemoryCatalog {
    MemoryCatalog::new(None, AUTHORITY)
        .with_station(Station::at("pt1", 10.0, 10.0))
        .with_variable(temperature_var(&[("obs", 2)]), vec![1.0, 2.0])
}

/// YAML description equivalent to [`station_catalog`]'s layout, for loaders.
pub const STATION_DESCRIPTION_YAML: &str = r#"
feature_type: timeSeries
naming_authority: edu.test
entity_dimension: station
stations:
  - { name: buoy1, latitude: 41.5, longitude: -70.6 }
  - { name: buoy2, latitude: 42.0, longitude: -70.1 }
variables:
  - name: time
    dimensions: [{ name: time, len: 3 }]
    attributes:
      - { name: standard_name, value: time }
      - { name: units, value: "hours since 2020-01-01 00:00:00" }
    values: [0, 1, 2]
  - name: temp
    dimensions: [{ name: station, len: 2 }, { name: time, len: 3 }]
    attributes:
      - { name: standard_name, value: sea_water_temperature }
      - { name: units, value: degC }
      - { name: _FillValue, value: -999.0 }
    values: [10.0, 10.5, 11.0, 12.0, 12.5, 13.0]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use sos_catalog::{AxisType, Catalog};

    fn check_shapes(catalog: &MemoryCatalog) {
        for var in catalog.variables() {
            assert!(
                catalog.read_values(&var.name).is_ok(),
                "{} values do not match its shape",
                var.name
            );
        }
    }

    #[test]
    fn test_fixture_shapes() {
        check_shapes(&station_catalog());
        check_shapes(&station_profile_catalog());
        check_shapes(&profile_catalog());
        check_shapes(&trajectory_catalog());
        check_shapes(&section_catalog());
        check_shapes(&grid_catalog());
        check_shapes(&unsupported_catalog());
    }

    #[test]
    fn test_fixture_axes() {
        let grid = grid_catalog();
        assert_eq!(grid.coordinate_axis(AxisType::Height).unwrap().name, "depth");
        assert_eq!(grid.coordinate_axis(AxisType::Lat).unwrap().name, "lat");
        assert!(unsupported_catalog().coordinate_axis(AxisType::Time).is_none());
    }

    #[test]
    fn test_yaml_description_loads() {
        let catalog = MemoryCatalog::from_yaml_str(STATION_DESCRIPTION_YAML).unwrap();
        assert_eq!(catalog.sensor_names(), vec!["temp"]);
        check_shapes(&catalog);
    }
}
