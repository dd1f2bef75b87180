//! Flash scheme client: settlement transaction construction and signing.
//!
//! Turns a selected payment requirement into a raw signed EIP-1559
//! transaction invoking `settlePayment(payTo, amount)` on the broker, hex
//! encoded for the `X-Payment` header. Per 402 encountered this costs
//! exactly one chain read (the nonce fetch) and one signature.

use std::sync::Arc;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, TxKind, U256, hex};

use flash402::chain::ChainClient;
use flash402::error::NegotiationError;
use flash402::proto::{PaymentPayload, PaymentRequirements, V1};
use flash402::scheme::{Scheme, SchemeClient};

use crate::broker::Broker;
use crate::signer::PaymentSigner;

/// Gas and fee budget for settlement transactions.
///
/// The defaults are the fixed budget the reference deployment uses on Base
/// Sepolia; they are sufficient for a `settlePayment` call there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementFees {
    /// Gas limit for the settlement call.
    pub gas_limit: u64,
    /// Maximum total fee per gas, in wei.
    pub max_fee_per_gas: u128,
    /// Maximum priority fee per gas, in wei.
    pub max_priority_fee_per_gas: u128,
}

impl Default for SettlementFees {
    fn default() -> Self {
        Self {
            gas_limit: 70_000,
            max_fee_per_gas: 1_000_000,
            max_priority_fee_per_gas: 1_000_000,
        }
    }
}

/// Client-side signer for the flash payment scheme.
///
/// Holds the chain read capability, the signing capability, and the broker
/// deployment. Nonce acquisition is not serialized: callers must keep at
/// most one payment negotiation in flight per signing account.
#[allow(missing_debug_implementations)] // holds a dyn chain client
pub struct FlashSchemeClient<S> {
    chain: Arc<dyn ChainClient>,
    signer: S,
    broker: Broker,
    chain_id: u64,
    fees: SettlementFees,
}

impl<S> FlashSchemeClient<S> {
    /// Creates a flash scheme client for a broker deployment on the given
    /// EIP-155 chain.
    pub fn new(chain: Arc<dyn ChainClient>, signer: S, broker: Broker, chain_id: u64) -> Self {
        Self {
            chain,
            signer,
            broker,
            chain_id,
            fees: SettlementFees::default(),
        }
    }

    /// Overrides the default gas and fee budget.
    #[must_use]
    pub fn with_fees(mut self, fees: SettlementFees) -> Self {
        self.fees = fees;
        self
    }

    /// Returns the signer's address (the escrow client key).
    pub fn payer(&self) -> Address
    where
        S: PaymentSigner,
    {
        self.signer.address()
    }
}

#[async_trait::async_trait]
impl<S> SchemeClient for FlashSchemeClient<S>
where
    S: PaymentSigner,
{
    fn scheme(&self) -> Scheme {
        Scheme::Flash
    }

    async fn sign_payment(
        &self,
        requirement: &PaymentRequirements,
    ) -> Result<PaymentPayload, NegotiationError> {
        // Decimal integer string, arbitrary precision. Going through a float
        // here would silently corrupt large amounts.
        let amount = U256::from_str_radix(&requirement.max_amount_required, 10).map_err(|e| {
            NegotiationError::UnsupportedRequirement(format!(
                "maxAmountRequired '{}' is not a decimal integer: {e}",
                requirement.max_amount_required
            ))
        })?;
        let pay_to: Address = requirement.pay_to.parse().map_err(|e| {
            NegotiationError::UnsupportedRequirement(format!(
                "payTo '{}' is not a valid address: {e}",
                requirement.pay_to
            ))
        })?;

        let nonce = self.chain.transaction_count(self.signer.address()).await?;

        let tx = TxEip1559 {
            chain_id: self.chain_id,
            nonce,
            gas_limit: self.fees.gas_limit,
            max_fee_per_gas: self.fees.max_fee_per_gas,
            max_priority_fee_per_gas: self.fees.max_priority_fee_per_gas,
            to: TxKind::Call(self.broker.address()),
            value: U256::ZERO,
            access_list: AccessList::default(),
            input: self.broker.settle_payment(pay_to, amount),
        };

        let signature = self
            .signer
            .sign_hash(&tx.signature_hash())
            .await
            .map_err(|e| NegotiationError::Signing(e.to_string()))?;
        let envelope = TxEnvelope::Eip1559(tx.into_signed(signature));
        let raw = envelope.encoded_2718();

        Ok(PaymentPayload {
            x402_version: V1,
            scheme: Scheme::Flash.to_string(),
            network: requirement.network.clone(),
            payload: serde_json::Value::String(format!("0x{}", hex::encode(raw))),
        })
    }
}
