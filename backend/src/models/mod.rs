//! Domain models shared by the repositories, services and HTTP layer.

pub mod location;
pub mod macros;
pub mod player;

pub use location::{GeoPoint, Location, LocationRecord, LocationType, MetaData};
pub use player::{
    LoginPayload, PlayerId, PlayerRecord, RegisterPayload, TokenResponse, UpdateNamePayload,
};
