//! Observed property resolution.

use sos_catalog::{Catalog, Variable};
use sos_common::{SosError, SosResult};
use tracing::debug;

/// Map each requested observed property onto a dataset variable name.
///
/// A token matches a variable when it equals, ignoring case, the variable's
/// observed-property URL or its name, or when it equals its `standard_name`
/// exactly. The first matching variable wins. One unknown token fails the
/// whole request.
pub fn resolve_properties(catalog: &dyn Catalog, requested: &[String]) -> SosResult<Vec<String>> {
    let resolved = requested
        .iter()
        .map(|token| {
            catalog
                .variables()
                .iter()
                .find(|var| matches_property(var, token))
                .map(|var| var.name.clone())
                .ok_or_else(|| {
                    SosError::invalid(
                        "observedProperty",
                        format!("observed property - {} - was not found in the dataset", token),
                    )
                })
        })
        .collect::<SosResult<Vec<_>>>()?;

    debug!(requested = ?requested, resolved = ?resolved, "Resolved observed properties");
    Ok(resolved)
}

fn matches_property(var: &Variable, token: &str) -> bool {
    var.observed_property_url()
        .is_some_and(|url| url.eq_ignore_ascii_case(token))
        || var.standard_name() == Some(token)
        || var.name.eq_ignore_ascii_case(token)
}
