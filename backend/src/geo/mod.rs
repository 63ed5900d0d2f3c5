//! Geometry helpers for persisted locations.
//!
//! Only two-dimensional points are stored. [`Point`] is the storage-side
//! representation and knows how to travel through the well-known binary (WKB)
//! encoding used by PostGIS (`ST_GeomFromWKB` / `ST_AsBinary`).

pub mod point;

pub use point::{Point, PointCodecError, SRID_WGS84};
