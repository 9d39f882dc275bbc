use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the local user table. The email is the map key, not a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "fullname")]
    pub full_name: String,
    /// Stored as typed. The local store is a mock, not a credential system.
    pub password: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// The signed-in user. Presence of a persisted session means "signed in".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "loginTime")]
    pub login_time: DateTime<Utc>,
}
