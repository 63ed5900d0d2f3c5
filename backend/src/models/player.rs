//! Player records and the request payloads that create or change them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::LocationRecord;

crate::define_uuid_id!(PlayerId);

/// Player as stored by a repository.
#[derive(Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
    /// PHC-formatted Argon2 hash, never the plaintext.
    pub password_hash: String,
    /// Copy of the location the player last sent.
    pub location: Option<LocationRecord>,
}

impl fmt::Debug for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("location", &self.location)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNamePayload {
    pub name: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_parse_and_display() {
        let id = PlayerId::generate();
        let parsed: PlayerId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PlayerId>().is_err());
        assert!("".parse::<PlayerId>().is_err());
    }

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let id: PlayerId = "5f5ec8c1-b900-48f9-bcc8-cb01dba0747d".parse().unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"5f5ec8c1-b900-48f9-bcc8-cb01dba0747d\""
        );
    }

    #[test]
    fn test_debug_hides_password_hash() {
        let record = PlayerRecord {
            id: PlayerId::generate(),
            name: "dummy".to_string(),
            email: "dummy@mail.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            location: None,
        };
        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("dummy@mail.com"));
    }
}
