//! Procedure and offering resolution.
//!
//! Procedures name stations (or station sensors) by URN. When a request names
//! none, the offering stands in for them. Every resolved URN must exist in the
//! dataset and, unless the offering is the network-all sentinel, belong to the
//! offering.

use std::collections::HashSet;

use sos_catalog::Catalog;
use sos_common::{SosError, SosResult};
use tracing::debug;

/// Expand, normalize and validate the requested procedures.
///
/// Returns the procedure URNs, unique and in request order.
pub fn resolve_procedures(
    catalog: &dyn Catalog,
    offering: &str,
    requested: Option<&[String]>,
) -> SosResult<Vec<String>> {
    let urn = catalog.urn_scheme();
    let all_stations = || -> Vec<String> {
        catalog.stations().iter().map(|s| s.name.clone()).collect()
    };

    let (tokens, from_offering) = match requested {
        None if urn.is_network_all(offering) => (all_stations(), true),
        None => (vec![offering.to_string()], true),
        Some([single]) if urn.is_network_all(single) => (all_stations(), false),
        Some(procedures) => (
            procedures
                .iter()
                .map(|p| p.rsplit(':').next().unwrap_or(p).to_string())
                .collect(),
            false,
        ),
    };

    let mut seen = HashSet::new();
    let procedures: Vec<String> = tokens
        .iter()
        .map(|t| catalog.station_urn(t))
        .filter(|u| seen.insert(u.clone()))
        .collect();

    check_validity(catalog, &procedures, from_offering)?;
    check_offering(catalog, offering, &procedures)?;

    debug!(offering = %offering, procedures = ?procedures, from_offering, "Resolved procedures");
    Ok(procedures)
}

/// Every URN the dataset answers to.
pub fn valid_procedures(catalog: &dyn Catalog) -> HashSet<String> {
    let mut valid = HashSet::new();
    valid.insert(catalog.network_all_urn());
    for station in catalog.stations() {
        let station_urn = catalog.station_urn(&station.name);
        valid.extend(catalog.sensor_urns(&station_urn));
        valid.insert(station_urn);
    }
    valid
}

fn check_validity(
    catalog: &dyn Catalog,
    procedures: &[String],
    from_offering: bool,
) -> SosResult<()> {
    let valid = valid_procedures(catalog);
    match procedures.iter().find(|p| !valid.contains(*p)) {
        Some(bad) if from_offering => Err(offering_not_found(bad)),
        Some(bad) => Err(SosError::invalid(
            "procedure",
            format!(
                "Invalid procedure {}. Check GetCapabilities document for valid procedures.",
                bad
            ),
        )),
        None => Ok(()),
    }
}

/// The first procedure outside the offering is reported.
fn check_offering(catalog: &dyn Catalog, offering: &str, procedures: &[String]) -> SosResult<()> {
    if catalog.urn_scheme().is_network_all(offering) {
        return Ok(());
    }

    let offering_lower = offering.to_lowercase();
    if procedures
        .iter()
        .any(|p| !p.to_lowercase().contains(&offering_lower))
    {
        return Err(offering_not_found(offering));
    }
    Ok(())
}

fn offering_not_found(offering: &str) -> SosError {
    SosError::invalid(
        "offering",
        format!(
            "Offering: {} does not exist in the dataset.  Check GetCapabilities document for valid offerings.",
            offering
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sos_common::ErrorKind;
    use test_utils::catalogs::{station_catalog, AUTHORITY};

    fn network_all() -> String {
        format!("urn:ioos:network:{}:all", AUTHORITY)
    }

    fn station(name: &str) -> String {
        format!("urn:ioos:station:{}:{}", AUTHORITY, name)
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_network_all_offering_expands_to_every_station() {
        let catalog = station_catalog();
        let procs = resolve_procedures(&catalog, &network_all(), None).unwrap();
        assert_eq!(procs, vec![station("buoy1"), station("buoy2")]);
    }

    #[test]
    fn test_single_network_all_procedure_expands() {
        let catalog = station_catalog();
        let procs =
            resolve_procedures(&catalog, &network_all(), Some(&[network_all()])).unwrap();
        assert_eq!(procs.len(), 2);
    }

    #[test]
    fn test_station_offering_implies_procedure() {
        let catalog = station_catalog();
        let procs = resolve_procedures(&catalog, &station("buoy2"), None).unwrap();
        assert_eq!(procs, vec![station("buoy2")]);
    }

    #[test]
    fn test_sensor_offering_is_valid() {
        let catalog = station_catalog();
        let sensor = format!("urn:ioos:sensor:{}:buoy1:temp", AUTHORITY);
        let procs = resolve_procedures(&catalog, &sensor, None).unwrap();
        assert_eq!(procs, vec![sensor]);
    }

    #[test]
    fn test_explicit_procedures_are_stripped_and_deduplicated() {
        let catalog = station_catalog();
        let procs = resolve_procedures(
            &catalog,
            &network_all(),
            Some(&list(&["buoy2", "urn:ioos:station:other:buoy1", "buoy2"])),
        )
        .unwrap();
        assert_eq!(procs, vec![station("buoy2"), station("buoy1")]);
    }

    #[test]
    fn test_unknown_procedure() {
        let catalog = station_catalog();
        let err = resolve_procedures(&catalog, &network_all(), Some(&list(&["buoy9"])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.locator(), Some("procedure"));
        assert!(err.message().starts_with("Invalid procedure urn:ioos:station:edu.test:buoy9."));
    }

    #[test]
    fn test_unknown_offering_reports_offering() {
        let catalog = station_catalog();
        let err = resolve_procedures(&catalog, &station("buoy9"), None).unwrap_err();
        assert_eq!(err.locator(), Some("offering"));
    }

    #[test]
    fn test_procedure_outside_offering() {
        let catalog = station_catalog();
        let err = resolve_procedures(&catalog, &station("buoy1"), Some(&list(&["buoy2"])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.locator(), Some("offering"));
    }

    #[test]
    fn test_first_mismatch_wins() {
        let catalog = station_catalog();
        let offering = station("buoy1");
        let err = resolve_procedures(
            &catalog,
            &offering,
            Some(&list(&["buoy2", "buoy1", "buoy2"])),
        )
        .unwrap_err();
        assert!(err.message().contains(&offering));
    }

    #[test]
    fn test_offering_match_ignores_case() {
        let catalog = station_catalog();
        let offering = station("BUOY1");
        assert!(check_offering(&catalog, &offering, &[station("buoy1")]).is_ok());
    }
}
