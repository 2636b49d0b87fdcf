//! User data model.

use serde::{Deserialize, Serialize};

/// A registered caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Autoincrementing row id.
    pub id: i64,
    /// Display name as spoken by the caller. May be empty.
    pub name: String,
    /// Unique lookup key.
    pub phone_number: String,
}

/// Fields needed to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub phone_number: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}
