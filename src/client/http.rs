//! Thor REST client with timeout and failover handling.
//!
//! # Responsibilities
//! - Talk to the node's REST API (`/blocks`, `/accounts/*`, `/transactions`)
//! - Bound every request with a timeout
//! - Move to the next configured node on connection failures, timeouts and 5xx
//! - Derive the chain tag from the genesis block at connect time

use alloy::primitives::B256;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;

use crate::client::transport::NodeTransport;
use crate::client::types::{
    Block, BlockRevision, InspectRequest, InspectResponse, RawTransaction,
    SendTransactionResponse, TransactionReceipt,
};
use crate::config::NodeConfig;
use crate::error::{ThorError, ThorResult};

/// REST client over one or more equivalent Thor nodes.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    /// Base URLs (primary first), without trailing slash.
    nodes: Vec<String>,
    timeout_secs: u64,
    genesis: Block,
}

impl HttpClient {
    /// Connect to the configured nodes and fetch the genesis block.
    ///
    /// Fails if the primary URL is invalid or no node can serve block 0.
    pub async fn connect(config: &NodeConfig) -> ThorResult<Self> {
        let primary: url::Url = config.url.parse().map_err(|e| {
            ThorError::Transport(format!("Invalid node URL '{}': {}", config.url, e))
        })?;
        let mut nodes = vec![primary.as_str().trim_end_matches('/').to_string()];

        for url_str in &config.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => nodes.push(url.as_str().trim_end_matches('/').to_string()),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover node URL"),
            }
        }

        let mut client = Self {
            http: reqwest::Client::new(),
            nodes,
            timeout_secs: config.timeout_secs,
            genesis: Block::default(),
        };

        client.genesis = client
            .get::<Block>(&format!("/blocks/{}", BlockRevision::Number(0)))
            .await?
            .ok_or_else(|| ThorError::Transport("Genesis block not found".to_string()))?;

        tracing::info!(
            node_url = %config.url,
            failover_nodes = client.nodes.len() - 1,
            chain_tag = client.chain_tag(),
            "Thor client initialized"
        );

        Ok(client)
    }

    /// Get the genesis block fetched at connect time.
    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    /// Get the configured node URLs, primary first.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ThorResult<Option<T>> {
        self.execute(|base| self.http.get(format!("{}{}", base, path)))
            .await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ThorResult<Option<T>>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(|base| self.http.post(format!("{}{}", base, path)).json(body))
            .await
    }

    /// Run a request against each node in turn until one answers.
    async fn execute<T, F>(&self, request: F) -> ThorResult<Option<T>>
    where
        T: DeserializeOwned,
        F: Fn(&str) -> RequestBuilder,
    {
        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let mut last_error = None;

        for (i, base) in self.nodes.iter().enumerate() {
            match timeout(timeout_duration, Self::send(request(base.as_str()))).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if !e.is_failover() => return Err(e),
                Ok(Err(e)) => {
                    tracing::warn!(node_idx = i, error = %e, "Node error, trying next node");
                    last_error = Some(e);
                }
                Err(_) => {
                    tracing::warn!(node_idx = i, "Node timeout, trying next node");
                    last_error = Some(ThorError::Timeout(self.timeout_secs));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ThorError::Transport("No node configured".to_string())))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ThorResult<Option<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| ThorError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ThorError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ThorError::HttpStatus {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }

        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| ThorError::Transport(format!("Invalid response body: {}", e)))
    }
}

#[async_trait]
impl NodeTransport for HttpClient {
    fn chain_tag(&self) -> u8 {
        self.genesis.chain_tag()
    }

    async fn block(&self, revision: BlockRevision) -> ThorResult<Option<Block>> {
        self.get(&format!("/blocks/{}", revision)).await
    }

    async fn inspect(&self, request: &InspectRequest) -> ThorResult<Vec<InspectResponse>> {
        self.post("/accounts/*", request)
            .await?
            .ok_or_else(|| ThorError::Transport("Empty response to dry run".to_string()))
    }

    async fn send_raw(&self, raw: &str) -> ThorResult<B256> {
        let body = RawTransaction {
            raw: raw.to_string(),
        };
        let response: SendTransactionResponse = self
            .post("/transactions", &body)
            .await?
            .ok_or_else(|| ThorError::Transport("Empty response to transaction submit".to_string()))?;
        Ok(response.id)
    }

    async fn receipt(&self, id: &B256) -> ThorResult<Option<TransactionReceipt>> {
        self.get(&format!("/transactions/{}/receipt", id)).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("nodes", &self.nodes)
            .field("chain_tag", &self.genesis.chain_tag())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
