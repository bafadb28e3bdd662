use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{DayStats, ErrorBody, HabitPayload, SnapshotRow};
use crate::registry::SnapshotApi;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// base_url includes the /api prefix
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone())
    }

    /// Client for the API at `HABITS_API_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn habits(&self, date: &str) -> Result<Vec<SnapshotRow>, ClientError> {
        let response = self
            .http
            .get(format!("{}/habits/{date}", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn save_habits(&self, date: &str, habits: &[HabitPayload]) -> Result<(), ClientError> {
        #[derive(Serialize)]
        struct Body<'a> {
            habits: &'a [HabitPayload],
        }

        let response = self
            .http
            .post(format!("{}/habits/{date}", self.base_url))
            .json(&Body { habits })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<Vec<DayStats>, ClientError> {
        let response = self
            .http
            .get(format!("{}/stats", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

impl SnapshotApi for ApiClient {
    async fn fetch(&self, date: &str) -> Result<Vec<SnapshotRow>, ClientError> {
        self.habits(date).await
    }

    async fn save(&self, date: &str, habits: &[HabitPayload]) -> Result<(), ClientError> {
        self.save_habits(date, habits).await
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|err| err.error)
        .unwrap_or(body);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
