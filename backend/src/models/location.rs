//! Location types: the JSON shape exchanged over HTTP and the record shape
//! handed to repositories.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geo::Point;

/// Location as seen by API clients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub id: String,
    pub geo_point: GeoPoint,
    pub meta_data: MetaData,
}

/// Longitude/latitude pair in degrees. The zero pair means "no point".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaData {
    pub location_name: String,
    pub location_type: String,
}

impl From<GeoPoint> for Point {
    fn from(g: GeoPoint) -> Self {
        Point::new(g.longitude, g.latitude)
    }
}

impl From<Point> for GeoPoint {
    fn from(p: Point) -> Self {
        GeoPoint {
            longitude: p.lon,
            latitude: p.lat,
        }
    }
}

/// Type tag of a location.
///
/// The well-known tags keep their historical spelling; anything else is
/// carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LocationType {
    City,
    Town,
    Station,
    Airport,
    Other(String),
    #[default]
    Unspecified,
}

impl LocationType {
    pub fn as_str(&self) -> &str {
        match self {
            LocationType::City => "city",
            LocationType::Town => "Town",
            LocationType::Station => "Station",
            LocationType::Airport => "Airport",
            LocationType::Other(tag) => tag,
            LocationType::Unspecified => "",
        }
    }
}

impl From<&str> for LocationType {
    fn from(tag: &str) -> Self {
        match tag {
            "city" => LocationType::City,
            "Town" => LocationType::Town,
            "Station" => LocationType::Station,
            "Airport" => LocationType::Airport,
            "" => LocationType::Unspecified,
            other => LocationType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LocationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(LocationType::from(tag.as_str()))
    }
}

/// Location as stored by a repository.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationRecord {
    pub id: String,
    /// `None` when the API supplied the zero pair.
    pub point: Option<Point>,
    pub name: String,
    pub kind: LocationType,
}

impl From<&Location> for LocationRecord {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.clone(),
            point: Point::from(location.geo_point).into_present(),
            name: location.meta_data.location_name.clone(),
            kind: LocationType::from(location.meta_data.location_type.as_str()),
        }
    }
}

impl From<LocationRecord> for Location {
    fn from(record: LocationRecord) -> Self {
        Self {
            id: record.id,
            geo_point: Point::from_present(record.point).into(),
            meta_data: MetaData {
                location_name: record.name,
                location_type: record.kind.as_str().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Location {
        Location {
            id: "berlin-hbf".to_string(),
            geo_point: GeoPoint {
                longitude: 13.369,
                latitude: 52.525,
            },
            meta_data: MetaData {
                location_name: "Berlin Hbf".to_string(),
                location_type: "Station".to_string(),
            },
        }
    }

    #[test]
    fn test_location_json_shape() {
        let value = serde_json::to_value(berlin()).unwrap();
        assert_eq!(value["id"], "berlin-hbf");
        assert_eq!(value["geoPoint"]["longitude"], 13.369);
        assert_eq!(value["geoPoint"]["latitude"], 52.525);
        assert_eq!(value["metaData"]["locationName"], "Berlin Hbf");
        assert_eq!(value["metaData"]["locationType"], "Station");
    }

    #[test]
    fn test_missing_fields_default() {
        let loc: Location = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(loc.id, "x");
        assert_eq!(loc.geo_point, GeoPoint::default());
        assert_eq!(loc.meta_data, MetaData::default());
    }

    #[test]
    fn test_record_conversion_keeps_point_and_metadata() {
        let record = LocationRecord::from(&berlin());
        assert_eq!(record.point, Some(Point::new(13.369, 52.525)));
        assert_eq!(record.kind, LocationType::Station);
        assert_eq!(Location::from(record), berlin());
    }

    #[test]
    fn test_zero_geo_point_is_stored_as_absent() {
        let mut loc = berlin();
        loc.geo_point = GeoPoint::default();
        let record = LocationRecord::from(&loc);
        assert_eq!(record.point, None);
        assert_eq!(Location::from(record).geo_point, GeoPoint::default());
    }

    #[test]
    fn test_location_type_tags() {
        assert_eq!(LocationType::from("city"), LocationType::City);
        assert_eq!(LocationType::from("Airport"), LocationType::Airport);
        assert_eq!(
            LocationType::from("harbour"),
            LocationType::Other("harbour".to_string())
        );
        assert_eq!(LocationType::from("").as_str(), "");
        assert_eq!(LocationType::Town.to_string(), "Town");
    }
}
