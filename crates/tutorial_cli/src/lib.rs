//! HTTP client for the tutorial REST API.
//!
//! # Responsibility
//! - Wrap every server route in a typed async call.
//! - Surface server-side failures with the `message` the server sent.
//!
//! # Invariants
//! - `base_url` points at the API prefix (`.../api`); the welcome route is
//!   resolved against the URL with that prefix removed.
//! - Non-2xx responses never deserialize into success types.

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tutorial_core::{Tutorial, TutorialDraft, TutorialId, TutorialPatch};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Everything but RFC 3986 unreserved characters, so a space becomes `%20`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status for server-side failures, `None` for transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            Self::Api { status, .. } => Some(*status),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct TutorialClient {
    http: Client,
    base_url: String,
}

impl TutorialClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server root, i.e. the base URL without its trailing `/api`.
    pub fn root_url(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    pub async fn welcome(&self) -> ClientResult<String> {
        let url = format!("{}/", self.root_url());
        let body: MessageBody = decode(self.http.get(url).send().await?).await?;
        Ok(body.message)
    }

    pub async fn get_all(&self) -> ClientResult<Vec<Tutorial>> {
        decode(self.http.get(self.collection_url()).send().await?).await
    }

    pub async fn get(&self, id: TutorialId) -> ClientResult<Tutorial> {
        decode(self.http.get(self.item_url(id)).send().await?).await
    }

    pub async fn create(&self, draft: &TutorialDraft) -> ClientResult<Tutorial> {
        let response = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    /// Returns the server's acknowledgement message.
    pub async fn update(&self, id: TutorialId, patch: &TutorialPatch) -> ClientResult<String> {
        let response = self.http.put(self.item_url(id)).json(patch).send().await?;
        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }

    pub async fn delete(&self, id: TutorialId) -> ClientResult<String> {
        let body: MessageBody = decode(self.http.delete(self.item_url(id)).send().await?).await?;
        Ok(body.message)
    }

    pub async fn delete_all(&self) -> ClientResult<String> {
        let response = self.http.delete(self.collection_url()).send().await?;
        let body: MessageBody = decode(response).await?;
        Ok(body.message)
    }

    pub async fn find_by_title(&self, title: &str) -> ClientResult<Vec<Tutorial>> {
        let url = format!(
            "{}?title={}",
            self.collection_url(),
            encode_query_component(title)
        );
        decode(self.http.get(url).send().await?).await
    }

    pub async fn find_published(&self) -> ClientResult<Vec<Tutorial>> {
        let url = format!("{}/published", self.collection_url());
        decode(self.http.get(url).send().await?).await
    }

    fn collection_url(&self) -> String {
        format!("{}/tutorials", self.base_url)
    }

    fn item_url(&self, id: TutorialId) -> String {
        format!("{}/tutorials/{id}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    debug!(
        "event=http_response module=client status={} url={}",
        status.as_u16(),
        response.url()
    );
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let raw = response.text().await?;
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &raw),
    })
}

fn error_message(status: StatusCode, raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<MessageBody>(raw) {
        return body.message;
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.to_string()
}

fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}
