//! Row types returned by the raw PostGIS queries.
//!
//! Geometry columns are selected through `ST_AsBinary`, so they arrive as
//! nullable WKB byte strings and are decoded with [`Point::from_wkb`].

use diesel::prelude::*;
use diesel::sql_types::{Bytea, Nullable, Text, Uuid as SqlUuid};

use crate::db::repository::RepositoryResult;
use crate::geo::Point;
use crate::models::{LocationRecord, LocationType, PlayerId, PlayerRecord};

#[derive(Debug, Clone, QueryableByName)]
pub struct LocationRow {
    #[diesel(sql_type = Text)]
    pub loc_id: String,
    #[diesel(sql_type = Nullable<Bytea>)]
    pub point: Option<Vec<u8>>,
    #[diesel(sql_type = Text)]
    pub loc_name: String,
    #[diesel(sql_type = Text)]
    pub loc_type: String,
}

impl LocationRow {
    pub fn into_record(self) -> RepositoryResult<LocationRecord> {
        Ok(LocationRecord {
            id: self.loc_id,
            point: decode_point(self.point.as_deref())?,
            name: self.loc_name,
            kind: LocationType::from(self.loc_type.as_str()),
        })
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub struct PlayerRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: uuid::Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub password: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub loc_id: Option<String>,
    #[diesel(sql_type = Nullable<Bytea>)]
    pub point: Option<Vec<u8>>,
    #[diesel(sql_type = Nullable<Text>)]
    pub loc_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub loc_type: Option<String>,
}

impl PlayerRow {
    pub fn into_record(self) -> RepositoryResult<PlayerRecord> {
        // A player has a location once loc_id has been written.
        let location = match self.loc_id {
            Some(loc_id) => Some(LocationRecord {
                id: loc_id,
                point: decode_point(self.point.as_deref())?,
                name: self.loc_name.unwrap_or_default(),
                kind: LocationType::from(self.loc_type.as_deref().unwrap_or_default()),
            }),
            None => None,
        };

        Ok(PlayerRecord {
            id: PlayerId::from(self.id),
            name: self.name,
            email: self.email,
            password_hash: self.password,
            location,
        })
    }
}

/// Encode an optional point for a `ST_GeomFromWKB($n, 4326)` bind.
pub fn encode_point(point: Option<Point>) -> RepositoryResult<Option<Vec<u8>>> {
    Ok(point.map(|p| p.to_wkb()).transpose()?)
}

fn decode_point(bytes: Option<&[u8]>) -> RepositoryResult<Option<Point>> {
    match bytes {
        Some(wkb) => Ok(Point::from_wkb(wkb)?.into_present()),
        None => Ok(None),
    }
}
