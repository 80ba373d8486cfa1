use thiserror::Error;

use crate::config::LoginConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username or password is incorrect")]
    InvalidCredentials,
    #[error("Username and password are required")]
    MissingCredentials,
}

/// A successfully verified login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

/// Decides whether a username/password pair may enter the app
pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> Result<Session, AuthError>;
}

/// Checks credentials against the `[login]` section of the config file
pub struct ConfiguredCredentials {
    username: String,
    password: String,
}

impl ConfiguredCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(login: &LoginConfig) -> Self {
        Self::new(login.username.clone(), login.password.clone())
    }
}

impl CredentialVerifier for ConfiguredCredentials {
    fn verify(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        // An unset configured account never matches
        if self.username.is_empty() || username != self.username || password != self.password {
            tracing::info!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Session {
            username: username.to_string(),
        })
    }
}
