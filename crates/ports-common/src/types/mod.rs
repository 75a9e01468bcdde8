//! Port record types
//!
//! A [`Port`] is one entry of the ports document. Its identifier comes from the
//! document key, so the body decoded here usually leaves `id` empty until the
//! reader fills it in.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{PortsError, Result};

/// Geographic position of a port
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coordinates: Coordinates) -> Self {
        [coordinates.longitude, coordinates.latitude]
    }
}

impl TryFrom<&[f64]> for Coordinates {
    type Error = PortsError;

    fn try_from(values: &[f64]) -> Result<Self> {
        match values {
            [longitude, latitude] => Ok(Self::new(*longitude, *latitude)),
            other => Err(PortsError::InvalidCoordinates(other.len())),
        }
    }
}

/// A single port entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    /// Identifier, e.g. "AEAJM". Always taken from the document key.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alias: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub regions: Vec<String>,
    #[serde(
        deserialize_with = "deserialize_coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,
    #[serde(deserialize_with = "null_as_default")]
    pub province: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    /// UN/LOCODE entries
    #[serde(deserialize_with = "null_as_default")]
    pub unlocs: Vec<String>,
    /// Numeric code kept as text so leading zeros survive
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

impl Port {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the invariants a port must hold before it is stored
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PortsError::MissingId);
        }
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` and `[]` both mean "no coordinates"
fn deserialize_coordinates<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<f64>>::deserialize(deserializer)?.unwrap_or_default();
    if values.is_empty() {
        return Ok(None);
    }
    Coordinates::try_from(values.as_slice())
        .map(Some)
        .map_err(de::Error::custom)
}
