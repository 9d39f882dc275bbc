// Local mock authentication: a credential table and a current-session pointer
// kept in a KeyValueStore. Passwords are stored as typed; this is not a
// credential system.

pub mod kv;
pub mod store;

use thiserror::Error;

use crate::auth::kv::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingFields,

    #[error("full name is required")]
    MissingFullName,

    #[error("an account already exists for {0}")]
    AlreadyExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored {key} is not valid JSON: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingFields => "Please fill in all fields".to_string(),
            AuthError::MissingFullName => "Please enter your full name".to_string(),
            AuthError::AlreadyExists(_) => "Email already registered!".to_string(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::Storage(_) | AuthError::Corrupt { .. } => {
                "Local account storage is unavailable".to_string()
            }
        }
    }
}
