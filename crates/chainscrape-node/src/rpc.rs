//! Minimal JSON-RPC 2.0 client for reading the chain head.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chainscrape_core::error::ScrapeError;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Unwrap the result value or return the node's error.
    pub fn into_result(self) -> Result<Value, ScrapeError> {
        if let Some(err) = self.error {
            return Err(ScrapeError::Rpc(format!(
                "JSON-RPC error {}: {}",
                err.code, err.message
            )));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Parse a hex quantity (`0x`-prefixed or bare) into a u64.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).ok()
}

/// Anything that can report the current chain head.
#[async_trait]
pub trait ChainHeadClient: Send + Sync {
    async fn latest_block(&self) -> Result<u64, ScrapeError>;
}

/// HTTP JSON-RPC head client backed by `reqwest`.
pub struct HttpHeadClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpHeadClient {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, ScrapeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| ScrapeError::Rpc(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScrapeError::Rpc(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| ScrapeError::Rpc(e.to_string()))?
            .into_result()
    }
}

#[async_trait]
impl ChainHeadClient for HttpHeadClient {
    async fn latest_block(&self) -> Result<u64, ScrapeError> {
        let value = self.call("eth_blockNumber", vec![]).await?;
        value
            .as_str()
            .and_then(parse_hex_u64)
            .ok_or_else(|| ScrapeError::Rpc(format!("unexpected eth_blockNumber result: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_hex_u64_basic() {
        assert_eq!(parse_hex_u64("0x1"), Some(1));
        assert_eq!(parse_hex_u64("0x121eac0"), Some(19_000_000));
        assert_eq!(parse_hex_u64("ff"), Some(255));
        assert_eq!(parse_hex_u64("0xzz"), None);
    }

    #[test]
    fn request_serialization() {
        let req = JsonRpcRequest::new(7, "eth_blockNumber", vec![]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            json!({"jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 7})
        );
    }

    #[test]
    fn response_error_maps_to_rpc_error() {
        let resp: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "header not found"}
        }))
        .unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, ScrapeError::Rpc(msg) if msg.contains("header not found")));
    }

    #[test]
    fn response_result() {
        let resp: JsonRpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": "0x10"})).unwrap();
        assert_eq!(resp.into_result().unwrap(), json!("0x10"));
    }
}
