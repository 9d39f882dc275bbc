//! LocalAuthStore — register, login, logout, and current-session lookup over
//! a `KeyValueStore`.
//!
//! Both documents are read and written whole:
//! - `jobvision_users`: `{ "<email>": { fullname, password, createdAt } }`
//! - `jobvision_current_user`: `{ email, fullname, loginTime }`

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info};

use crate::auth::kv::KeyValueStore;
use crate::auth::AuthError;
use crate::models::user::{Session, UserRecord};

pub const USERS_KEY: &str = "jobvision_users";
pub const SESSION_KEY: &str = "jobvision_current_user";

type UserTable = BTreeMap<String, UserRecord>;

pub struct LocalAuthStore<S> {
    store: S,
}

impl<S: KeyValueStore> LocalAuthStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an account and signs it in. An existing email is rejected and
    /// its record left untouched.
    pub fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let (email, password) = required_credentials(email, password)?;
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(AuthError::MissingFullName);
        }

        let mut users = self.load_users()?;
        if users.contains_key(email) {
            debug!(email, "registration rejected: email taken");
            return Err(AuthError::AlreadyExists(email.to_string()));
        }

        users.insert(
            email.to_string(),
            UserRecord {
                full_name: full_name.to_string(),
                password: password.to_string(),
                created_at: Utc::now(),
            },
        );
        self.save_json(USERS_KEY, &users)?;
        info!(email, "account created");

        self.login(email, password)
    }

    /// Checks the credentials against the user table and writes a fresh
    /// session. Passwords compare exactly.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let (email, password) = required_credentials(email, password)?;

        let users = self.load_users()?;
        let user = users
            .get(email)
            .filter(|user| user.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            email: email.to_string(),
            full_name: user.full_name.clone(),
            login_time: Utc::now(),
        };
        self.save_json(SESSION_KEY, &session)?;
        info!(email, "signed in");
        Ok(session)
    }

    /// Drops the current session. Returns whether one existed.
    pub fn logout(&self) -> Result<bool, AuthError> {
        let removed = self.store.remove(SESSION_KEY)?;
        if removed {
            info!("signed out");
        }
        Ok(removed)
    }

    /// The persisted session, if any. Sessions are not re-validated against
    /// the user table.
    pub fn current_session(&self) -> Result<Option<Session>, AuthError> {
        match self.store.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| AuthError::Corrupt {
                    key: SESSION_KEY,
                    source,
                }),
            None => Ok(None),
        }
    }

    fn load_users(&self) -> Result<UserTable, AuthError> {
        match self.store.get(USERS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| AuthError::Corrupt {
                key: USERS_KEY,
                source,
            }),
            None => Ok(UserTable::new()),
        }
    }

    fn save_json<T: serde::Serialize>(&self, key: &'static str, value: &T) -> Result<(), AuthError> {
        let raw = serde_json::to_string(value).map_err(|source| AuthError::Corrupt { key, source })?;
        self.store.set(key, &raw)?;
        Ok(())
    }
}

fn required_credentials<'a>(
    email: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), AuthError> {
    let (email, password) = (email.trim(), password.trim());
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok((email, password))
}
