// HTTP client for the FastSchema content store
//
// The client is built once at startup and shared by every request handler.
// A bearer token obtained by `login` is attached to all later calls; without
// one, calls go out unauthenticated and the store decides whether to accept them.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nema_core::{Eat, EatFile, EatStore, StoreError};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::types::{ListResponse, LoginRequest, LoginResponse, SingleResponse};

/// Bound on every content store request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size requested for EAT listings
const LIST_LIMIT: &str = "100";

const LOGIN_PATH: &str = "/api/auth/local/login";
const EAT_PATH: &str = "/api/content/eat";
const UPLOAD_PATH: &str = "/api/file/upload";
const SCHEMA_PATH: &str = "/api/schema";

pub struct ContentStoreClient {
    base_url: String,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl ContentStoreClient {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange admin credentials for a bearer token and keep it for later calls
    pub async fn login(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest {
                login: username,
                password,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse = decode(response).await?;
        *self.token.write().await = Some(login.data.token);
        tracing::info!(base_url = %self.base_url, "Authenticated with content store");
        Ok(())
    }

    /// Whether a bearer token is held
    pub async fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .await
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Register the field schema with the store
    pub async fn apply_schema(&self, schema: &[u8]) -> Result<(), StoreError> {
        let request = self
            .http
            .post(self.url(SCHEMA_PATH))
            .header(CONTENT_TYPE, "application/json")
            .body(schema.to_vec());
        self.execute(request).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Send an authenticated request, returning the response whatever its status
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        self.authorize(request)
            .await
            .send()
            .await
            .map_err(transport_error)
    }

    /// Send an authenticated request, turning non-2xx responses into errors
    async fn execute(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.send(request).await?;
        check_status(response).await
    }

    async fn list(
        &self,
        filter: serde_json::Value,
        sort: &str,
        limit: &str,
    ) -> Result<Vec<Eat>, StoreError> {
        let request = self.http.get(self.url(EAT_PATH)).query(&[
            ("filter", filter.to_string().as_str()),
            ("sort", sort),
            ("limit", limit),
        ]);
        let response = self.execute(request).await?;
        let list: ListResponse = decode(response).await?;
        Ok(list.data.into_items())
    }
}

#[async_trait]
impl EatStore for ContentStoreClient {
    async fn list_eats(&self, since: DateTime<Utc>) -> Result<Vec<Eat>, StoreError> {
        let filter = json!({
            "event_date": { "$gte": since.to_rfc3339_opts(SecondsFormat::Secs, true) }
        });
        let eats = self.list(filter, "-event_date", LIST_LIMIT).await?;
        tracing::debug!(count = eats.len(), %since, "Listed EATs");
        Ok(eats)
    }

    async fn get_eat(&self, id: i64) -> Result<Option<Eat>, StoreError> {
        let request = self.http.get(format!("{}/{}", self.url(EAT_PATH), id));
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response).await?;
        let single: SingleResponse<Eat> = decode(response).await?;
        Ok(single.data)
    }

    async fn latest_version(&self, event_title: &str) -> Result<Option<Eat>, StoreError> {
        let filter = json!({ "event_title": { "$eq": event_title } });
        let eats = self.list(filter, "-version", "1").await?;
        Ok(eats.into_iter().next())
    }

    async fn find_version(
        &self,
        event_title: &str,
        version: u32,
    ) -> Result<Option<Eat>, StoreError> {
        let filter = json!({
            "event_title": { "$eq": event_title },
            "version": { "$eq": version }
        });
        let eats = self.list(filter, "-version", "1").await?;
        Ok(eats.into_iter().next())
    }

    async fn create_eat(&self, eat: &Eat) -> Result<Eat, StoreError> {
        let request = self.http.post(self.url(EAT_PATH)).json(eat);
        let response = self.execute(request).await?;
        let single: SingleResponse<Eat> = decode(response).await?;
        single
            .data
            .ok_or_else(|| StoreError::decode("create response has no data"))
    }

    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<EatFile, StoreError> {
        let size = data.len();
        let form = Form::new().part("file", Part::bytes(data).file_name(filename.to_string()));
        let request = self.http.post(self.url(UPLOAD_PATH)).multipart(form);
        let response = self.execute(request).await?;
        let single: SingleResponse<EatFile> = decode(response).await?;
        let file = single
            .data
            .ok_or_else(|| StoreError::decode("upload response has no data"))?;
        tracing::info!(filename, size, file_id = file.id, "Uploaded attachment");
        Ok(file)
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::transport(err.to_string())
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(e.to_string()))
}
