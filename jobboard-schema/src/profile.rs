use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `profiles` table. `id` equals the owning user's id.
///
/// Writes always carry the full row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub bio: String,
    #[serde(default, deserialize_with = "crate::nullable::string")]
    pub resume_url: String,
}

impl Profile {
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            full_name: String::new(),
            title: String::new(),
            bio: String::new(),
            resume_url: String::new(),
        }
    }
}
