//! Core types for the x402 "flash" payment scheme.
//!
//! The x402 protocol enables micropayments over HTTP using the 402 Payment
//! Required status code. The "flash" scheme extends the standard "exact"
//! scheme with escrow-backed settlement: the client signs a transaction that
//! draws down a pre-funded on-chain escrow, attaches it to the retried
//! request as payment proof, and the server submits it to the chain while
//! serving the response optimistically.
//!
//! This crate is blockchain- and HTTP-framework-agnostic. It provides:
//!
//! - [`proto`] - Wire format types and the `X-Payment` header codec
//! - [`scheme`] - Payment scheme tagging, scheme clients, and requirement selection
//! - [`chain`] - The blockchain capability trait consumed by both protocol sides
//! - [`networks`] - Registry of known network names and chain ids
//! - [`error`] - Error taxonomy for payment negotiation
//!
//! EVM-specific implementations live in `flash402-evm`; HTTP client and
//! server middleware live in `flash402-http`.

pub mod chain;
pub mod error;
pub mod networks;
pub mod proto;
pub mod scheme;
