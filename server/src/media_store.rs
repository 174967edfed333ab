//! Deleting recipe media from the external store.
//!
//! Media bytes live on a CDN; the database only keeps their urls. Cleanup
//! runs after the database commit and is best effort: failures are logged
//! and never reach the client.

use crate::config::MediaStoreConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("url is not hosted by the media store: {0}")]
    ForeignUrl(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("media store returned {status}: {body}")]
    Store { status: u16, body: String },
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Remove the object behind `url`. Already-missing objects are success.
    async fn delete(&self, url: &str) -> Result<(), CleanupError>;
}

/// Talks to the CDN's management API.
#[derive(Debug)]
pub struct HttpMediaStore {
    public_base_url: String,
    api_base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpMediaStore {
    pub fn new(config: &MediaStoreConfig) -> Self {
        Self {
            public_base_url: config.public_base_url.clone(),
            api_base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Object key of `url`: its path below the public base.
    fn object_key<'a>(&self, url: &'a str) -> Result<&'a str, CleanupError> {
        url.strip_prefix(self.public_base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|key| key.split(['?', '#']).next().unwrap_or(key))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CleanupError::ForeignUrl(url.to_string()))
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn delete(&self, url: &str) -> Result<(), CleanupError> {
        let key = self.object_key(url)?;
        let endpoint = format!("{}/objects/{}", self.api_base_url, key);

        let mut request = self.client.delete(&endpoint);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CleanupError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(CleanupError::Store {
            status: status.as_u16(),
            body,
        })
    }
}

/// Used when no media store is configured.
#[derive(Debug, Default)]
pub struct NoopMediaStore;

#[async_trait]
impl MediaStore for NoopMediaStore {
    async fn delete(&self, url: &str) -> Result<(), CleanupError> {
        tracing::debug!(url, "media store not configured, leaving media in place");
        Ok(())
    }
}

/// Records every deletion; urls in `failing` return an error.
#[derive(Debug, Default)]
pub struct FakeMediaStore {
    failing: HashSet<String>,
    deleted: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Urls passed to `delete`, in call order, including failed ones.
    pub fn calls(&self) -> Vec<String> {
        self.deleted
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn delete(&self, url: &str) -> Result<(), CleanupError> {
        if let Ok(mut calls) = self.deleted.lock() {
            calls.push(url.to_string());
        }
        if self.failing.contains(url) {
            return Err(CleanupError::Store {
                status: 500,
                body: "fake failure".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: usize,
}

/// Delete every url independently. One failure does not stop the rest.
pub async fn cleanup_media(store: &dyn MediaStore, urls: &[String]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for url in urls {
        match store.delete(url).await {
            Ok(()) => report.removed += 1,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "failed to delete recipe media");
                report.failed += 1;
            }
        }
    }
    report
}
