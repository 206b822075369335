//! # API Service
//!
//! Talks to the key-value store's HTTP API and reports completions back to
//! the controller over a channel. Every operation is a single best-effort
//! round trip: no retry, no timeout beyond the transport default, no
//! cancellation. Requests run as detached tokio tasks so the UI loop never
//! blocks on the network.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::ConnectionProfile;

/// Full key→value mapping as returned by `GET /data`.
pub type Listing = BTreeMap<String, String>;

/// Operation-level error taxonomy.
///
/// `Server` carries the structured `{"error": …}` message from a non-2xx
/// response; `NotFound` is the delete operation's distinguished 404 and
/// carries the literal key; `Transport` means the request never completed.
/// Validation failures are caught before the service is involved, so they
/// never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Server { status: u16, message: String },
    NotFound { key: String },
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Server { message, .. } => write!(f, "{message}"),
            ApiError::NotFound { key } => write!(f, "Key \"{key}\" not found"),
            ApiError::Transport(description) => write!(f, "Network error: {description}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn transport(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Receipt returned by the server for a successful save.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SaveReceipt {
    pub status: String,
    pub key: String,
}

/// Receipt returned by the server for a successful delete.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DeleteReceipt {
    pub status: String,
    pub key: String,
}

/// Aggregate statistics snapshot.
///
/// The named counters are typed; everything else the server sends is kept
/// verbatim in `raw` so the full-JSON display can echo it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub database_size: u64,
    pub raw: serde_json::Value,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    key: &'a str,
    value: &'a str,
}

/// Error body shape shared by every non-2xx response.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Completion messages delivered back to the controller.
#[derive(Debug)]
pub enum ApiEvent {
    SaveCompleted(Result<SaveReceipt, ApiError>),
    EntriesLoaded(Result<Listing, ApiError>),
    DeleteCompleted(Result<DeleteReceipt, ApiError>),
    StatsLoaded(Result<StatsSnapshot, ApiError>),
}

/// Thin async client over the store's HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the profile's base address.
    pub fn new(profile: &ConnectionProfile) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: profile.server().trim_end_matches('/').to_string(),
        })
    }

    /// `POST /data` with a `{key, value}` body.
    pub async fn save_entry(&self, key: &str, value: &str) -> Result<SaveReceipt, ApiError> {
        let url = format!("{}/data", self.base_url);
        tracing::debug!("POST {url} key={key}");
        let response = self
            .http
            .post(&url)
            .json(&SaveRequest { key, value })
            .send()
            .await
            .map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        map_save_response(status, &body)
    }

    /// `GET /data` — the full mapping.
    pub async fn list_entries(&self) -> Result<Listing, ApiError> {
        let url = format!("{}/data", self.base_url);
        tracing::debug!("GET {url}");
        let response = self.http.get(&url).send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        map_entries_response(status, &body)
    }

    /// `DELETE /data/{key}`.
    pub async fn delete_entry(&self, key: &str) -> Result<DeleteReceipt, ApiError> {
        let url = format!("{}/data/{}", self.base_url, key);
        tracing::debug!("DELETE {url}");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        map_delete_response(key, status, &body)
    }

    /// `GET /stats`.
    pub async fn fetch_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let url = format!("{}/stats", self.base_url);
        tracing::debug!("GET {url}");
        let response = self.http.get(&url).send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        map_stats_response(status, &body)
    }
}

/// Service owning the completion channel.
///
/// The controller keeps the receiving half and drains it once per loop
/// iteration; each spawned request gets a clone of the sending half. A
/// dropped receiver (controller shutting down) makes the send fail, which
/// the tasks silently accept.
pub struct ApiService {
    client: ApiClient,
    sender: mpsc::Sender<ApiEvent>,
    receiver: mpsc::Receiver<ApiEvent>,
}

impl ApiService {
    const CHANNEL_CAPACITY: usize = 16;

    /// Create a service bound to the profile's server.
    pub fn new(profile: &ConnectionProfile) -> Result<Self> {
        let (sender, receiver) = mpsc::channel(Self::CHANNEL_CAPACITY);
        Ok(Self {
            client: ApiClient::new(profile)?,
            sender,
            receiver,
        })
    }

    /// Non-blocking poll for the next completed operation.
    pub fn try_recv(&mut self) -> Option<ApiEvent> {
        self.receiver.try_recv().ok()
    }

    /// Issue a save in the background.
    pub fn spawn_save(&self, key: String, value: String) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = client.save_entry(&key, &value).await;
            let _ = sender.send(ApiEvent::SaveCompleted(result)).await;
        });
    }

    /// Issue a listing refresh in the background.
    pub fn spawn_list(&self) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = client.list_entries().await;
            let _ = sender.send(ApiEvent::EntriesLoaded(result)).await;
        });
    }

    /// Issue a delete in the background.
    pub fn spawn_delete(&self, key: String) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = client.delete_entry(&key).await;
            let _ = sender.send(ApiEvent::DeleteCompleted(result)).await;
        });
    }

    /// Issue a stats fetch in the background.
    pub fn spawn_stats(&self) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = client.fetch_stats().await;
            let _ = sender.send(ApiEvent::StatsLoaded(result)).await;
        });
    }
}

/// Turn a non-2xx response into a `Server` error, preferring the
/// structured `{"error": …}` body over a generic status message.
fn server_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}

fn malformed_body(status: StatusCode, err: serde_json::Error) -> ApiError {
    ApiError::Server {
        status: status.as_u16(),
        message: format!("Malformed server response: {err}"),
    }
}

fn map_save_response(status: StatusCode, body: &str) -> Result<SaveReceipt, ApiError> {
    if status.is_success() {
        serde_json::from_str(body).map_err(|e| malformed_body(status, e))
    } else {
        Err(server_error(status, body))
    }
}

fn map_entries_response(status: StatusCode, body: &str) -> Result<Listing, ApiError> {
    if status.is_success() {
        serde_json::from_str(body).map_err(|e| malformed_body(status, e))
    } else {
        Err(server_error(status, body))
    }
}

fn map_delete_response(
    key: &str,
    status: StatusCode,
    body: &str,
) -> Result<DeleteReceipt, ApiError> {
    if status.is_success() {
        serde_json::from_str(body).map_err(|e| malformed_body(status, e))
    } else if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound {
            key: key.to_string(),
        })
    } else {
        Err(server_error(status, body))
    }
}

fn map_stats_response(status: StatusCode, body: &str) -> Result<StatsSnapshot, ApiError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }
    let raw: serde_json::Value =
        serde_json::from_str(body).map_err(|e| malformed_body(status, e))?;
    let total_requests = raw
        .get("total_requests")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    let database_size = raw
        .get("database_size")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    Ok(StatsSnapshot {
        total_requests,
        database_size,
        raw,
    })
}
