//! Data models for locally owned Pokemon

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health assigned to a newly caught Pokemon when none is given
pub const DEFAULT_HP: i64 = 100;

/// A Pokemon owned by the local player.
///
/// Serialized with PascalCase field names, which is what the battle server
/// expects on `POST /api/Battle`. Bookkeeping timestamps stay local.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pokemon {
    /// Unique identifier
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Current health
    pub hp: i64,
    /// Accumulated experience
    pub exp: i64,
    /// When the Pokemon was added
    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last time the record was written
    #[serde(skip, default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Pokemon {
    /// Create a new Pokemon with a fresh identifier
    pub fn new(name: impl Into<String>, hp: i64) -> Self {
        Self::with_uuid(Uuid::new_v4().to_string(), name, hp)
    }

    /// Create a Pokemon with a known identifier
    pub fn with_uuid(uuid: impl Into<String>, name: impl Into<String>, hp: i64) -> Self {
        let now = Utc::now();
        Self {
            uuid: uuid.into(),
            name: name.into(),
            hp,
            exp: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_exp(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }
}
