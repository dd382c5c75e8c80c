//! AdventRunner API client.
//!
//! Thin wrapper over the backend's HTTP surface. The sync store is the only
//! caller; each method maps to exactly one endpoint and enforces that
//! endpoint's allowed status set.

use reqwest::{Response, StatusCode};
use serde_json::json;
use url::Url;

use crate::calendar::{SharedLinkResponse, UserData};
use crate::config::Config;
use crate::error::CoreError;
use crate::sync::auth::RequestConfig;

/// HTTP client for the AdventRunner backend.
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CoreError::InvalidInput(format!("invalid base URL `{base_url}`: {e}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Self::new(&config.server_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, CoreError> {
        self.base_url
            .join(path)
            .map_err(|e| CoreError::InvalidInput(format!("invalid endpoint path `{path}`: {e}")))
    }

    /// Loads the full user record.
    pub async fn fetch_user_data(&self, auth: &RequestConfig) -> Result<UserData, CoreError> {
        let url = self.endpoint("/api/calendars")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(auth.token())
            .send()
            .await?;
        let response = check_status("/api/calendars", response)?;
        decode(response).await
    }

    /// Overwrites the full user record. Fire-and-forget: the response body
    /// is discarded.
    pub async fn store_user_data(
        &self,
        auth: &RequestConfig,
        data: &UserData,
    ) -> Result<(), CoreError> {
        let url = self.endpoint("/api/calendars")?;
        let response = self
            .http
            .put(url)
            .bearer_auth(auth.token())
            .json(data)
            .send()
            .await?;
        check_status("/api/calendars", response)?;
        Ok(())
    }

    /// Issues a create/reset request, returning the canonical copy the
    /// server assigned.
    pub async fn reset_user_data(
        &self,
        auth: &RequestConfig,
        data: &UserData,
    ) -> Result<UserData, CoreError> {
        let url = self.endpoint("/api/calendars")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(auth.token())
            .json(data)
            .send()
            .await?;
        let response = check_status("/api/calendars", response)?;
        decode(response).await
    }

    /// Publishes one period. The server generates the link id and returns
    /// the updated full user record.
    pub async fn publish_calendar(
        &self,
        auth: &RequestConfig,
        period: i32,
    ) -> Result<UserData, CoreError> {
        let url = self.endpoint("/api/sharedCalendars")?;
        let response = self
            .http
            .post(url)
            .bearer_auth(auth.token())
            .json(&json!({ "period": period }))
            .send()
            .await?;
        let response = check_status("/api/sharedCalendars", response)?;
        decode(response).await
    }

    /// Deletes a shared link.
    pub async fn unpublish_calendar(
        &self,
        auth: &RequestConfig,
        link_id: &str,
    ) -> Result<(), CoreError> {
        let path = format!("/api/sharedCalendars/{link_id}");
        let url = self.endpoint(&path)?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(auth.token())
            .send()
            .await?;
        check_status(&path, response)?;
        Ok(())
    }

    /// Public, unauthenticated read of a shared calendar snapshot.
    ///
    /// 404 is a recognized outcome (the link does not exist or was
    /// unpublished) and maps to `None`; any status outside {200, 404} is a
    /// hard failure.
    pub async fn fetch_shared_calendar(
        &self,
        link_id: &str,
    ) -> Result<Option<SharedLinkResponse>, CoreError> {
        let path = format!("/api/sharedCalendars/{link_id}");
        let url = self.endpoint(&path)?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(&path, response)?;
        Ok(Some(decode(response).await?))
    }
}

/// Maps a response status to the error kinds the store understands:
/// success passes through, 401/403 become `Auth` so the store can drop its
/// memoized request config, everything else is `UnexpectedStatus`.
fn check_status(path: &str, response: Response) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(CoreError::Auth(format!(
            "server rejected credentials for {path} ({status})"
        )))
    } else {
        Err(CoreError::UnexpectedStatus {
            status: status.as_u16(),
            path: path.to_string(),
        })
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CoreError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
