//! Transaction-signing capability boundary.
//!
//! The negotiator never sees key material; it only needs an address and the
//! ability to sign a transaction hash. [`PaymentSigner`] abstracts over owned
//! and `Arc`-shared signers, since alloy's `Signer` trait is not implemented
//! for `Arc<T>` and `PrivateKeySigner` does not implement `Clone`.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::{Address, B256, Signature};
use alloy_signer_local::PrivateKeySigner;

/// Signing capability for EIP-1559 settlement transactions.
pub trait PaymentSigner: Send + Sync {
    /// Returns the signer's address, used for nonce lookups and as the
    /// escrow client key.
    fn address(&self) -> Address;

    /// Signs a transaction signature hash.
    fn sign_hash(
        &self,
        hash: &B256,
    ) -> impl Future<Output = Result<Signature, alloy_signer::Error>> + Send;
}

impl PaymentSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        Self::address(self)
    }

    async fn sign_hash(&self, hash: &B256) -> Result<Signature, alloy_signer::Error> {
        alloy_signer::Signer::sign_hash(self, hash).await
    }
}

impl<T: PaymentSigner> PaymentSigner for Arc<T> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn sign_hash(&self, hash: &B256) -> Result<Signature, alloy_signer::Error> {
        (**self).sign_hash(hash).await
    }
}
