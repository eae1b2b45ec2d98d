use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remit_core::{Entity, UserId};

/// A ledger user. Owns zero or more accounts by back-reference
/// (`Account::owner`), never by containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    pub name: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Case-insensitive substring match on the display name.
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn reserve(id: UserId) -> Self {
        Self {
            id,
            name: String::new(),
            created_at: Utc::now(),
        }
    }
}
