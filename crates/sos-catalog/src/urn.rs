//! URN naming for stations, sensors and the network offering.

use serde::{Deserialize, Serialize};

/// URN naming rules for one naming authority.
///
/// Produces identifiers of the form:
/// - `urn:ioos:station:<authority>:<station>`
/// - `urn:ioos:sensor:<authority>:<station>:<sensor>`
/// - `urn:ioos:network:<authority>:all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrnScheme {
    pub naming_authority: String,
}

impl Default for UrnScheme {
    fn default() -> Self {
        Self::new("ncsos")
    }
}

impl UrnScheme {
    pub fn new(naming_authority: impl Into<String>) -> Self {
        Self {
            naming_authority: naming_authority.into(),
        }
    }

    /// Map a station name to its URN. Tokens that already are URNs pass through.
    pub fn station_urn(&self, name: &str) -> String {
        if name.starts_with("urn:") {
            return name.to_string();
        }
        format!("urn:ioos:station:{}:{}", self.naming_authority, name)
    }

    /// URN of a sensor mounted on the station named by `station_urn`.
    pub fn sensor_urn(&self, station_urn: &str, sensor: &str) -> String {
        format!("{}:{}", station_urn.replacen(":station:", ":sensor:", 1), sensor)
    }

    /// The sentinel meaning "every entity in the dataset".
    pub fn network_all(&self) -> String {
        format!("urn:ioos:network:{}:all", self.naming_authority)
    }

    pub fn is_network_all(&self, token: &str) -> bool {
        token.eq_ignore_ascii_case(&self.network_all())
    }
}
