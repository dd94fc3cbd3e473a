use crate::dto::auth_dto::{LoginPayload, SignupPayload};
use crate::dto::user_dto::UpdateProfilePayload;
use crate::error::{Error, Result};
use crate::models::user::{Profile, User};
use crate::rowstore::{tables, RowStoreClient};
use crate::utils::crypto;
use serde_json::json;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct UserService {
    rowstore: RowStoreClient,
}

impl UserService {
    pub fn new(rowstore: RowStoreClient) -> Self {
        Self { rowstore }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let rows = self
            .rowstore
            .list_rows(
                tables::USERS,
                &[("filter__email__equal", email.to_string())],
            )
            .await?;
        Ok(rows.iter().filter_map(User::from_row).next())
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        let row = self.rowstore.get_row(tables::USERS, id).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                Error::NotFound("User not found".to_string())
            } else {
                e
            }
        })?;
        User::from_row(&row).ok_or_else(|| Error::Internal("Malformed user row".to_string()))
    }

    /// Email is case-folded before the uniqueness check and before storage,
    /// so "Ana@x.com" and "ana@x.com" are the same account.
    pub async fn signup(&self, payload: SignupPayload) -> Result<Profile> {
        let email = payload.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }

        let hash = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        let fields = json!({
            "name": payload.name,
            "email": email,
            "password_hash": hash,
        });
        let row = self.rowstore.create_row(tables::USERS, fields).await?;
        let user =
            User::from_row(&row).ok_or_else(|| Error::Internal("Malformed user row".to_string()))?;
        Ok(Profile::from(user))
    }

    /// Unknown email, a row with no stored hash, and a wrong password all
    /// produce the same response, so the caller cannot tell which failed.
    pub async fn login(&self, payload: LoginPayload) -> Result<Profile> {
        let invalid = || Error::Unauthorized("Invalid credentials".to_string());
        let email = payload.email.trim().to_lowercase();
        let user = self.find_by_email(&email).await?.ok_or_else(invalid)?;
        let hash = user.password_hash.clone().ok_or_else(invalid)?;
        let ok = crypto::verify_password(&payload.password, &hash).map_err(|_| invalid())?;
        if !ok {
            return Err(invalid());
        }
        Ok(Profile::from(user))
    }

    pub async fn update_profile(&self, id: i64, payload: UpdateProfilePayload) -> Result<Profile> {
        let mut fields = serde_json::Map::new();
        if let Some(name) = payload.name {
            fields.insert("name".into(), json!(name));
        }
        if let Some(company) = payload.company {
            fields.insert("company".into(), json!(company));
        }
        if let Some(avatar_url) = payload.avatar_url {
            fields.insert("avatar_url".into(), json!(avatar_url));
        }
        if fields.is_empty() {
            return Err(Error::BadRequest("No fields to update".to_string()));
        }
        let row = self
            .rowstore
            .update_row(tables::USERS, id, serde_json::Value::Object(fields))
            .await?;
        let user =
            User::from_row(&row).ok_or_else(|| Error::Internal("Malformed user row".to_string()))?;
        Ok(Profile::from(user))
    }

    pub async fn update_password(&self, id: i64, password: &str) -> Result<()> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::BadRequest(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let hash = crypto::hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        self.rowstore
            .update_row(tables::USERS, id, json!({ "password_hash": hash }))
            .await?;
        Ok(())
    }

    pub async fn set_avatar(&self, id: i64, filename: &str, data: bytes::Bytes) -> Result<Profile> {
        let url = self.rowstore.upload_file(filename, data).await?;
        let row = self
            .rowstore
            .update_row(tables::USERS, id, json!({ "avatar_url": url }))
            .await?;
        let user =
            User::from_row(&row).ok_or_else(|| Error::Internal("Malformed user row".to_string()))?;
        Ok(Profile::from(user))
    }

    pub async fn store_google_tokens(
        &self,
        id: i64,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<()> {
        let mut fields = serde_json::Map::new();
        fields.insert("google_access_token".into(), json!(access_token));
        if let Some(refresh) = refresh_token {
            fields.insert("google_refresh_token".into(), json!(refresh));
        }
        self.rowstore
            .update_row(tables::USERS, id, serde_json::Value::Object(fields))
            .await?;
        Ok(())
    }
}
