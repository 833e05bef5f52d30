//! Wire-level transport to the aggregation server.
//!
//! Every method performs exactly one RPC over a connection opened for that
//! call and dropped afterwards. There is no pooling, batching or retry at
//! this layer; a failed request surfaces immediately as a communication
//! error.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::error::{ClientError, Result};

/// The aggregation server's RPC surface at the JSON message level.
#[async_trait]
pub trait AggregatorApi: Send + Sync {
    async fn get_configuration(&self) -> Result<Value>;
    async fn get_verification_key(&self) -> Result<Value>;
    async fn get_nested_verification_key_hash(&self, vk: &Value) -> Result<String>;
    async fn register_application(&self, application_name: &str, vk: &Value) -> Result<()>;
    async fn submit_nested_transaction(&self, transaction: &Value) -> Result<()>;
    async fn get_aggregated_transaction(&self, application_name: &str) -> Result<Value>;
}

/// Transports a session can open on demand from its endpoint URL alone.
pub trait ConnectApi: AggregatorApi + Sized {
    fn connect(server_url: Url) -> Self;
}

/// HTTP transport against a live aggregation server.
#[derive(Clone, Debug)]
pub struct HttpAggregatorApi {
    server_url: Url,
}

impl ConnectApi for HttpAggregatorApi {
    fn connect(server_url: Url) -> Self {
        Self::new(server_url)
    }
}

impl HttpAggregatorApi {
    pub fn new(server_url: Url) -> Self {
        Self { server_url }
    }

    // One connection per RPC; never reused across calls.
    fn open_connection(&self) -> Result<Client> {
        Client::builder()
            .build()
            .map_err(|e| ClientError::CommunicationError(e.to_string()))
    }

    fn route(&self, path: &str) -> Result<Url> {
        self.server_url
            .join(path)
            .map_err(|e| ClientError::ServerUrlParsingError(e.to_string()))
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::CommunicationError(format!(
                "server returned {status}: {detail}"
            )));
        }
        Ok(response)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self
            .open_connection()?
            .get(self.route(path)?)
            .send()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))?;
        Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let response = self
            .open_connection()?
            .post(self.route(path)?)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))?;
        Self::expect_success(response).await
    }
}

#[async_trait]
impl AggregatorApi for HttpAggregatorApi {
    async fn get_configuration(&self) -> Result<Value> {
        self.get_json("/configuration").await
    }

    async fn get_verification_key(&self) -> Result<Value> {
        self.get_json("/verification-key").await
    }

    async fn get_nested_verification_key_hash(&self, vk: &Value) -> Result<String> {
        let response = self.post_json("/nested-verification-key-hash", vk).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))?;
        body.get("hash")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::CommunicationError("hash missing from server response".to_string())
            })
    }

    async fn register_application(&self, application_name: &str, vk: &Value) -> Result<()> {
        let body = json!({
            "application_name": application_name,
            "vk": vk,
        });
        self.post_json("/register-application", &body).await?;
        Ok(())
    }

    async fn submit_nested_transaction(&self, transaction: &Value) -> Result<()> {
        self.post_json("/submit-nested-transaction", transaction)
            .await?;
        Ok(())
    }

    async fn get_aggregated_transaction(&self, application_name: &str) -> Result<Value> {
        let body = json!({ "application_name": application_name });
        let response = self
            .open_connection()?
            .post(self.route("/aggregated-transaction")?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))?;
        // The server answers 404 while no batch is ready for this
        // application; that is a pollable outcome, not a failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::BatchNotReady(format!(
                "no batch ready for application '{application_name}'"
            )));
        }
        Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::CommunicationError(e.to_string()))
    }
}
