//! Longitude/latitude point and its WKB codec.
//!
//! The zero pair `(0, 0)` doubles as the "absent" marker: the API always
//! carries a geo-point object, while storage keeps `NULL` for a missing one.
//! [`Point::into_present`] and [`Point::from_present`] convert between the two
//! conventions so the geo-point is never partially populated.
//!
//! Encoding and decoding go through `geozero`, with `geo-types` as the
//! in-memory geometry.

use std::fmt;

use geo_types::Geometry;
use geozero::error::GeozeroError;
use geozero::wkb::Ewkb;
use geozero::{CoordDimensions, ToGeo, ToWkb};
use serde::{Deserialize, Serialize};

/// Spatial reference used for every stored geometry.
pub const SRID_WGS84: i32 = 4326;

/// Errors raised while converting a point to or from WKB.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointCodecError {
    #[error("malformed WKB: {0}")]
    Malformed(String),

    #[error("unsupported WKB geometry {0} (only points are stored)")]
    UnsupportedGeometry(&'static str),
}

impl From<GeozeroError> for PointCodecError {
    fn from(err: GeozeroError) -> Self {
        PointCodecError::Malformed(err.to_string())
    }
}

/// A 2D point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    /// The degenerate point used to mean "no location".
    pub const ZERO: Point = Point { lon: 0.0, lat: 0.0 };

    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_zero(&self) -> bool {
        self.lon == 0.0 && self.lat == 0.0
    }

    /// `None` for the zero pair, the point otherwise.
    pub fn into_present(self) -> Option<Point> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }

    /// Inverse of [`Point::into_present`].
    pub fn from_present(point: Option<Point>) -> Point {
        point.unwrap_or(Point::ZERO)
    }

    /// Encode as little-endian ISO WKB, the input `ST_GeomFromWKB` expects.
    pub fn to_wkb(&self) -> Result<Vec<u8>, PointCodecError> {
        let geometry = Geometry::Point(geo_types::Point::from(*self));
        Ok(geometry.to_wkb(CoordDimensions::xy())?)
    }

    /// Decode a WKB or PostGIS EWKB point.
    ///
    /// Either byte order is accepted and an embedded SRID is ignored. Z and M
    /// ordinates are dropped.
    pub fn from_wkb(bytes: &[u8]) -> Result<Self, PointCodecError> {
        match Ewkb(bytes.to_vec()).to_geo()? {
            Geometry::Point(point) => Ok(point.into()),
            other => Err(PointCodecError::UnsupportedGeometry(geometry_name(&other))),
        }
    }

    /// Well-known text, e.g. `POINT(13.4 52.5)`.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl From<Point> for geo_types::Point<f64> {
    fn from(point: Point) -> Self {
        geo_types::Point::new(point.lon, point.lat)
    }
}

impl From<geo_types::Point<f64>> for Point {
    fn from(point: geo_types::Point<f64>) -> Self {
        Point::new(point.x(), point.y())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({} {})", self.lon, self.lat)
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::LineString(_) | Geometry::Line(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Point(_) => "Point",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EWKB_SRID_FLAG: u32 = 0x2000_0000;

    #[test]
    fn test_wkb_layout_matches_postgis() {
        // SELECT ST_AsBinary('POINT(1 2)'::geometry)
        let expected = [
            0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40,
        ];
        assert_eq!(Point::new(1.0, 2.0).to_wkb().unwrap(), expected);
    }

    #[test]
    fn test_wkb_roundtrip_keeps_coordinates() {
        let p = Point::new(-122.419_416, 37.774_929);
        let decoded = Point::from_wkb(&p.to_wkb().unwrap()).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn test_big_endian_decodes() {
        let mut buf = vec![0u8];
        buf.extend_from_slice(&1u32.to_be_bytes());
        buf.extend_from_slice(&10.1f64.to_be_bytes());
        buf.extend_from_slice(&(-33.5f64).to_be_bytes());
        assert_eq!(Point::from_wkb(&buf).unwrap(), Point::new(10.1, -33.5));
    }

    #[test]
    fn test_ewkb_with_srid_decodes() {
        // SELECT ST_AsEWKB('SRID=4326;POINT(4.5 51.2)'::geometry)
        let mut buf = vec![1u8];
        buf.extend_from_slice(&(1 | EWKB_SRID_FLAG).to_le_bytes());
        buf.extend_from_slice(&SRID_WGS84.to_le_bytes());
        buf.extend_from_slice(&4.5f64.to_le_bytes());
        buf.extend_from_slice(&51.2f64.to_le_bytes());
        assert_eq!(Point::from_wkb(&buf).unwrap(), Point::new(4.5, 51.2));
    }

    #[test]
    fn test_rejects_linestring() {
        let line = geo_types::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        let buf = Geometry::LineString(line)
            .to_wkb(CoordDimensions::xy())
            .unwrap();
        assert_eq!(
            Point::from_wkb(&buf),
            Err(PointCodecError::UnsupportedGeometry("LineString"))
        );
    }

    #[test]
    fn test_rejects_truncated_buffer() {
        let buf = Point::new(1.0, 1.0).to_wkb().unwrap();
        assert!(matches!(
            Point::from_wkb(&buf[..12]),
            Err(PointCodecError::Malformed(_))
        ));
        assert!(Point::from_wkb(&[]).is_err());
    }

    #[test]
    fn test_zero_pair_is_absent() {
        assert_eq!(Point::ZERO.into_present(), None);
        assert_eq!(Point::from_present(None), Point::ZERO);
        // A point on the equator or prime meridian is still a real point.
        assert!(Point::new(0.0, 51.4).into_present().is_some());
        assert!(Point::new(32.5, 0.0).into_present().is_some());
    }

    #[test]
    fn test_wkt_rendering() {
        assert_eq!(Point::new(13.4, 52.5).to_wkt(), "POINT(13.4 52.5)");
    }
}
