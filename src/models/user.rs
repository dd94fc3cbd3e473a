use crate::rowstore::normalize;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing)]
    pub google_access_token: Option<String>,
    #[serde(skip_serializing)]
    pub google_refresh_token: Option<String>,
}

impl User {
    pub fn from_row(row: &JsonValue) -> Option<Self> {
        Some(Self {
            id: normalize::row_id(row)?,
            name: normalize::str_field(row, "name").unwrap_or_default(),
            email: normalize::str_field(row, "email").unwrap_or_default(),
            password_hash: normalize::str_field(row, "password_hash"),
            company: normalize::str_field(row, "company"),
            avatar_url: normalize::str_field(row, "avatar_url"),
            google_access_token: normalize::str_field(row, "google_access_token"),
            google_refresh_token: normalize::str_field(row, "google_refresh_token"),
        })
    }
}

/// Profile shape returned to the browser after login; never carries the hash
/// or calendar tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub calendar_connected: bool,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            company: user.company,
            avatar_url: user.avatar_url,
            calendar_connected: user.google_refresh_token.is_some(),
        }
    }
}
