//! Location model and location queries

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::SafeBreatheError;

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: None,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Name for display, falling back to the coordinates
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            self.format_coordinates()
        } else {
            name.to_string()
        }
    }
}

/// `location` sub-record of a payload: either a bare name or a full location.
///
/// An object without coordinates but with a `name` decodes as [`RawLocation::Name`].
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawLocation {
    Name(String),
    Place(Location),
}

impl<'de> Deserialize<'de> for RawLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(RawLocation::Name(name)),
            Value::Object(fields) => {
                let name = fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match serde_json::from_value::<Location>(Value::Object(fields)) {
                    Ok(location) => Ok(RawLocation::Place(location)),
                    Err(e) => name.map(RawLocation::Name).ok_or_else(|| {
                        D::Error::custom(format!("location has neither coordinates nor name: {e}"))
                    }),
                }
            }
            other => Err(D::Error::custom(format!(
                "expected a location name or object, found {other}"
            ))),
        }
    }
}

impl RawLocation {
    /// Name for display, `None` when the record carries nothing usable
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        match self {
            RawLocation::Name(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
            RawLocation::Place(location) => Some(location.display_name()),
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// The configured home location
    Default,
    /// Free-text city name
    City(String),
    /// Resolved position
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    /// Build a query from `city`, `lat` and `lon` request parameters.
    ///
    /// A city wins over coordinates; nothing at all means the default location.
    pub fn from_params(
        city: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Self, SafeBreatheError> {
        let query = match (city, latitude, longitude) {
            (Some(city), _, _) => LocationQuery::City(city.to_string()),
            (None, Some(latitude), Some(longitude)) => LocationQuery::Coordinates {
                latitude,
                longitude,
            },
            (None, None, None) => LocationQuery::Default,
            (None, _, _) => {
                return Err(SafeBreatheError::validation(
                    "Both lat and lon are required for a coordinate query",
                ));
            }
        };
        query.validated()
    }

    /// Normalize and check the query before anything is sent upstream
    pub fn validated(self) -> Result<Self, SafeBreatheError> {
        match self {
            LocationQuery::City(city) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(SafeBreatheError::validation("City name cannot be empty"));
                }
                Ok(LocationQuery::City(city.to_string()))
            }
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => {
                if !(-90.0..=90.0).contains(&latitude) {
                    return Err(SafeBreatheError::validation(format!(
                        "Latitude {latitude} is out of range"
                    )));
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    return Err(SafeBreatheError::validation(format!(
                        "Longitude {longitude} is out of range"
                    )));
                }
                Ok(LocationQuery::Coordinates {
                    latitude,
                    longitude,
                })
            }
            LocationQuery::Default => Ok(LocationQuery::Default),
        }
    }

    /// Query string for the `/dashboard-data` endpoint, without the leading `?`
    #[must_use]
    pub fn to_query_string(&self) -> String {
        match self {
            LocationQuery::Default => String::new(),
            LocationQuery::City(city) => format!("city={}", urlencoding::encode(city)),
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => format!("lat={latitude}&lon={longitude}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_coordinates() {
        let location = Location::new(48.5734, 7.7521, "  ".to_string());
        assert_eq!(location.display_name(), "48.5734, 7.7521");

        let location = Location::new(48.5734, 7.7521, " Strasbourg ".to_string());
        assert_eq!(location.display_name(), "Strasbourg");
    }

    #[test]
    fn test_raw_location_accepts_name_or_place() {
        let raw: RawLocation = serde_json::from_str("\"Lyon\"").unwrap();
        assert_eq!(raw.display_name().as_deref(), Some("Lyon"));

        let raw: RawLocation =
            serde_json::from_str(r#"{"latitude": 45.76, "longitude": 4.84, "name": "Lyon"}"#)
                .unwrap();
        assert!(matches!(raw, RawLocation::Place(_)));

        let raw: RawLocation = serde_json::from_str(r#"{"name": "Lyon", "latitude": "?"}"#).unwrap();
        assert_eq!(raw, RawLocation::Name("Lyon".into()));

        assert!(serde_json::from_str::<RawLocation>("42").is_err());

        let raw = RawLocation::Name(String::new());
        assert_eq!(raw.display_name(), None);
    }

    #[test]
    fn test_blank_city_is_rejected() {
        let result = LocationQuery::City("   ".into()).validated();
        assert!(matches!(result, Err(SafeBreatheError::Validation { .. })));
    }

    #[test]
    fn test_city_is_trimmed() {
        let query = LocationQuery::City(" Paris ".into()).validated().unwrap();
        assert_eq!(query, LocationQuery::City("Paris".into()));
    }

    #[test]
    fn test_from_params() {
        assert_eq!(
            LocationQuery::from_params(None, None, None).unwrap(),
            LocationQuery::Default
        );
        assert_eq!(
            LocationQuery::from_params(Some("Metz"), Some(1.0), Some(2.0)).unwrap(),
            LocationQuery::City("Metz".into())
        );
        assert!(LocationQuery::from_params(None, Some(1.0), None).is_err());
        assert!(LocationQuery::from_params(None, Some(95.0), Some(2.0)).is_err());
    }

    #[test]
    fn test_query_string() {
        let query = LocationQuery::City("Saint-Étienne".into());
        assert_eq!(query.to_query_string(), "city=Saint-%C3%89tienne");

        let query = LocationQuery::Coordinates {
            latitude: 48.5,
            longitude: 7.75,
        };
        assert_eq!(query.to_query_string(), "lat=48.5&lon=7.75");
    }
}
