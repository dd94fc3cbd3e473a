use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::error;

/// Thin HTTP wrapper over the hosted tabular database. Injects the API token
/// and keeps all row addressing (fixed table ids, row ids) in one place.
#[derive(Clone)]
pub struct RowStoreClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, serde::Deserialize)]
struct ListPage {
    results: Vec<JsonValue>,
    next: Option<String>,
}

impl RowStoreClient {
    pub fn new(base_url: String, token: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client for row store");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn rows_url(&self, table_id: i64) -> String {
        format!(
            "{}/api/database/rows/table/{}/?user_field_names=true",
            self.base_url, table_id
        )
    }

    fn row_url(&self, table_id: i64, row_id: i64) -> String {
        format!(
            "{}/api/database/rows/table/{}/{}/?user_field_names=true",
            self.base_url, table_id, row_id
        )
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound("Row not found".to_string()));
        }
        // Log the raw upstream body server-side only; the client gets a
        // sanitized communication-failure message.
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "row store request failed");
        Err(Error::Upstream {
            status: status.as_u16(),
        })
    }

    /// Lists all rows of a table, following pagination. `params` are passed
    /// through as query parameters (filters, ordering).
    pub async fn list_rows(
        &self,
        table_id: i64,
        params: &[(&str, String)],
    ) -> Result<Vec<JsonValue>> {
        let mut url = format!("{}&size=200", self.rows_url(table_id));
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencode(value));
        }

        let mut rows = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next {
            let response = self
                .client
                .get(&page_url)
                .header("Authorization", format!("Token {}", self.token))
                .send()
                .await?;
            let page = self.check(response).await?.json::<ListPage>().await?;
            rows.extend(page.results);
            next = page.next;
        }
        Ok(rows)
    }

    pub async fn get_row(&self, table_id: i64, row_id: i64) -> Result<JsonValue> {
        let response = self
            .client
            .get(self.row_url(table_id, row_id))
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await?;
        Ok(self.check(response).await?.json().await?)
    }

    pub async fn create_row(&self, table_id: i64, fields: JsonValue) -> Result<JsonValue> {
        let response = self
            .client
            .post(self.rows_url(table_id))
            .header("Authorization", format!("Token {}", self.token))
            .json(&fields)
            .send()
            .await?;
        Ok(self.check(response).await?.json().await?)
    }

    /// Partial update: only the supplied fields change.
    pub async fn update_row(
        &self,
        table_id: i64,
        row_id: i64,
        fields: JsonValue,
    ) -> Result<JsonValue> {
        let response = self
            .client
            .patch(self.row_url(table_id, row_id))
            .header("Authorization", format!("Token {}", self.token))
            .json(&fields)
            .send()
            .await?;
        Ok(self.check(response).await?.json().await?)
    }

    pub async fn delete_row(&self, table_id: i64, row_id: i64) -> Result<()> {
        let response = self
            .client
            .delete(self.row_url(table_id, row_id))
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    /// Relays an uploaded file (avatar, interview video) to the row store's
    /// file endpoint and returns the hosted URL. No local storage.
    pub async fn upload_file(&self, filename: &str, data: bytes::Bytes) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(format!("{}/api/user-files/upload-file/", self.base_url))
            .header("Authorization", format!("Token {}", self.token))
            .multipart(form)
            .send()
            .await?;
        let body: JsonValue = self.check(response).await?.json().await?;
        body.get("url")
            .and_then(|u| u.as_str())
            .map(|u| u.to_string())
            .ok_or_else(|| Error::Internal("File upload response missing url".to_string()))
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
