use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ROLE: &str = "USER";

/// Password and redirect logins carry the backend's numeric id; provider
/// sessions carry the provider's opaque id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    External(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::External(id) => f.write_str(id),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

impl Session {
    pub fn new(identity: Identity, token: impl Into<String>) -> Self {
        Self {
            identity,
            token: token.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl AuthGrant {
    pub fn into_session(self) -> Session {
        Session::new(
            Identity {
                user_id: UserId::Numeric(self.user_id),
                username: self.username,
                email: self.email,
                role: self.role,
                image_url: None,
            },
            self.token,
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
