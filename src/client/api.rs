use crate::error::{RelayError, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_BASE_URL: &str = "https://mobileapp.yobidoyobi.ru/v2";

static SHARED: OnceLock<ApiClient> = OnceLock::new();

// No auth headers and no cookie store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !is_absolute(base_url) {
            return Err(RelayError::Config(format!(
                "API base URL must be HTTP(S): {}",
                base_url
            )));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub fn install(base_url: &str) -> Result<&'static ApiClient> {
    let client = ApiClient::new(base_url)?;
    SHARED
        .set(client)
        .map_err(|_| RelayError::Config("shared API client already installed".to_string()))?;

    tracing::info!("Shared API client bound to {}", base_url);
    shared()
}

// Falls back to DEFAULT_BASE_URL when nothing was installed at startup.
pub fn shared() -> Result<&'static ApiClient> {
    if let Some(client) = SHARED.get() {
        return Ok(client);
    }

    // Losing a race here is fine: whichever client was set first wins.
    let _ = SHARED.set(ApiClient::new(DEFAULT_BASE_URL)?);
    SHARED
        .get()
        .ok_or_else(|| RelayError::Config("shared API client unavailable".to_string()))
}
