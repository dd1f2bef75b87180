//! Error taxonomy for payment negotiation.
//!
//! Server-side protocol violations never surface as Rust errors; the
//! middleware renders them directly as 4xx responses. The negotiator, by
//! contrast, either returns a final HTTP response or propagates one of the
//! errors below to its caller, leaving no partial state behind.

use crate::chain::ChainError;
use crate::proto::header::HeaderError;

/// Errors raised by the client payment negotiator.
#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    /// The server answered 402 but advertised no payment options.
    #[error("received 402 but no payment requirements were provided")]
    NoPaymentRequirements,

    /// The 402 body could not be parsed as a payment-required document.
    #[error("invalid 402 payment-required body: {0}")]
    InvalidPaymentRequired(String),

    /// No advertised requirement passed the selection policy, or the selected
    /// requirement cannot be satisfied (bad amount, bad address).
    #[error("unsupported payment requirement: {0}")]
    UnsupportedRequirement(String),

    /// The signing capability failed; no payment header was attached.
    #[error("payment signing failed: {0}")]
    Signing(String),

    /// A blockchain read or submission failed.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Encoding or decoding a payment header failed.
    #[error(transparent)]
    Header(#[from] HeaderError),

    /// The original request has a streaming body and cannot be replayed
    /// with a payment header attached.
    #[error("request cannot be cloned for payment retry")]
    RequestNotCloneable,
}
