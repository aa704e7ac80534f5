use super::client::HttpClient;
use crate::config::ApiConfig;
use crate::errors::BackendError;
use crate::logger::{self, LogTag};
use crate::ports::{CommentBackend, TradeBackend};
use crate::types::{Comment, TradeRecord};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewComment<'a> {
    token_address: &'a str,
    text: &'a str,
}

pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, BackendError> {
        Self::new(&config.base_url, config.request_timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T>(&self, request: RequestBuilder, endpoint: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                logger::warning(LogTag::Api, &format!("{} request failed: {}", endpoint, e));
                return Err(e.into());
            }
        };
        let status = response.status();
        logger::debug(
            LogTag::Api,
            &format!("{} -> HTTP {} in {}ms", endpoint, status.as_u16(), start.elapsed().as_millis()),
        );

        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(format!("{}: {}", endpoint, e)))
    }
}

/// Id of a freshly posted comment: `{"id": n}` or a bare number
pub(crate) fn decode_comment_id(value: &Value) -> Result<u64, BackendError> {
    let id = match value {
        Value::Object(map) => map.get("id"),
        other => Some(other),
    };

    match id {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| BackendError::Decode(format!("comment id missing in {}", value)))
}

#[async_trait]
impl CommentBackend for HttpBackend {
    async fn list_comments(&self, token_address: &str) -> Result<Vec<Comment>, BackendError> {
        let request = self
            .http_client
            .client()
            .get(self.endpoint_url("comments"))
            .query(&[("tokenAddress", token_address)]);
        self.send(request, "comments.list").await
    }

    async fn add_comment(
        &self,
        token_address: &str,
        text: &str,
        access_token: &str,
    ) -> Result<u64, BackendError> {
        let request = self
            .http_client
            .client()
            .post(self.endpoint_url("comments"))
            .bearer_auth(access_token)
            .json(&NewComment {
                token_address,
                text,
            });
        let value: Value = self.send(request, "comments.add").await?;
        decode_comment_id(&value)
    }
}

#[async_trait]
impl TradeBackend for HttpBackend {
    async fn list_trades(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<Vec<TradeRecord>, BackendError> {
        let limit = limit.to_string();
        let request = self
            .http_client
            .client()
            .get(self.endpoint_url("trades"))
            .query(&[("tokenAddress", token_address), ("limit", limit.as_str())]);
        self.send(request, "trades.list").await
    }
}
