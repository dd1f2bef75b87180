//! [`ChainClient`] backed by an alloy HTTP JSON-RPC provider.

use std::sync::Arc;

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, B256, Bytes};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_transport::{RpcError, TransportErrorKind};
use url::Url;

use flash402::chain::{ChainClient, ChainError};

/// Chain access over a plain HTTP JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct HttpChainClient {
    inner: Arc<RootProvider>,
}

impl HttpChainClient {
    /// Connects to an HTTP JSON-RPC endpoint. No request is issued until
    /// the first call.
    pub fn new(rpc_url: Url) -> Self {
        Self {
            inner: Arc::new(RootProvider::new_http(rpc_url)),
        }
    }
}

/// Execution reverts surface as JSON-RPC error responses; anything else is
/// a transport problem.
fn into_chain_error(err: RpcError<TransportErrorKind>) -> ChainError {
    match err {
        RpcError::ErrorResp(payload) => {
            let message = payload.message.to_string();
            if payload.data.is_some() || message.to_ascii_lowercase().contains("revert") {
                ChainError::Reverted(message)
            } else {
                ChainError::Transport(message)
            }
        }
        other => ChainError::Transport(other.to_string()),
    }
}

#[async_trait::async_trait]
impl ChainClient for HttpChainClient {
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        self.inner
            .get_transaction_count(address)
            .await
            .map_err(into_chain_error)
    }

    async fn submit_raw_transaction(&self, raw: Bytes) -> Result<B256, ChainError> {
        let pending = self
            .inner
            .send_raw_transaction(&raw)
            .await
            .map_err(into_chain_error)?;
        Ok(*pending.tx_hash())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        self.inner.call(request).await.map_err(into_chain_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_json_rpc::ErrorPayload;

    #[test]
    fn error_responses_mentioning_revert_classify_as_reverted() {
        let payload: ErrorPayload = serde_json::from_str(
            r#"{"code":3,"message":"execution reverted: escrow does not exist"}"#,
        )
        .unwrap();
        let err = into_chain_error(RpcError::ErrorResp(payload));
        assert!(matches!(err, ChainError::Reverted(_)));
    }

    #[test]
    fn plain_rpc_errors_classify_as_transport() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"code":-32000,"message":"nonce too low"}"#).unwrap();
        let err = into_chain_error(RpcError::ErrorResp(payload));
        assert!(matches!(err, ChainError::Transport(_)));
    }
}
