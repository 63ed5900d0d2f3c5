//! Session tokens and password hashing.

pub mod password;
pub mod token;

pub use token::{Claims, JwtKeys, TokenError};
