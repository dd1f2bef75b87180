//! EVM adapter for the x402 "flash" payment scheme.
//!
//! The flash scheme settles payments through the FlashPaymentBroker contract:
//! the client holds a pre-funded escrow keyed by (client, server), signs a
//! `settlePayment` transaction drawing it down, and hands that transaction to
//! the server as payment proof.
//!
//! This crate provides everything the protocol needs on an EVM chain:
//!
//! - [`broker`] - The broker contract ABI and calldata encoders
//! - [`flash`] - Settlement transaction construction and the flash [`SchemeClient`]
//! - [`escrow`] - Read-only escrow existence and balance queries
//! - [`provider`] - A [`ChainClient`] backed by an alloy HTTP provider
//! - [`signer`] - The transaction-signing capability boundary
//!
//! [`SchemeClient`]: flash402::scheme::SchemeClient
//! [`ChainClient`]: flash402::chain::ChainClient

pub mod broker;
pub mod escrow;
pub mod flash;
pub mod provider;
pub mod signer;

pub use broker::{BASE_SEPOLIA_BROKER, Broker};
pub use escrow::EscrowReader;
pub use flash::{FlashSchemeClient, SettlementFees};
pub use provider::HttpChainClient;
pub use signer::PaymentSigner;
