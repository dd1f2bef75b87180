//! Blockchain capability trait shared by both protocol sides.
//!
//! The negotiator and the server middleware never talk to a wallet or RPC
//! object directly; they receive a [`ChainClient`] as an explicit constructor
//! parameter. This keeps the nonce-race hazard visible and lets tests inject
//! doubles.

use alloy_primitives::{Address, B256, Bytes};

/// Errors from blockchain interactions.
///
/// A reverted read is a distinct variant because the escrow reader interprets
/// reverts as "no escrow exists" rather than as failures, while transport
/// failures always propagate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    /// The node executed the request and the contract reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),

    /// The node could not be reached or returned a malformed response.
    #[error("chain transport error: {0}")]
    Transport(String),
}

/// Read and submit capability against a blockchain node.
///
/// Exactly the narrow surface the flash protocol needs: nonce queries for
/// the client negotiator, raw transaction submission for server settlement,
/// and read-only contract calls for the escrow reader.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the current transaction count (nonce) for an address.
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// Submits a pre-signed raw transaction to the mempool and returns the
    /// node-reported transaction hash. Does not wait for confirmation.
    async fn submit_raw_transaction(&self, raw: Bytes) -> Result<B256, ChainError>;

    /// Executes a read-only contract call and returns the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;
}
