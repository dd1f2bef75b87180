//! Read-only escrow queries against the broker.
//!
//! The broker reverts `getEscrowTokenBalance` when no escrow exists for a
//! (client, server) pair, and `getEscrowAccountAddress` answers the zero
//! address. [`EscrowReader`] folds both shapes into `Option` / zero so
//! callers never have to pattern-match on revert strings.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use flash402::chain::{ChainClient, ChainError};

use crate::broker::{
    Broker, getEscrowAccountAddressCall, getEscrowTokenAddressCall, getEscrowTokenBalanceCall,
};

/// Read-only view over broker escrow accounts.
#[derive(Clone)]
#[allow(missing_debug_implementations)] // holds a dyn chain client
pub struct EscrowReader {
    chain: Arc<dyn ChainClient>,
    broker: Broker,
}

impl EscrowReader {
    /// Creates a reader against a broker deployment.
    pub fn new(chain: Arc<dyn ChainClient>, broker: Broker) -> Self {
        Self { chain, broker }
    }

    /// Returns the escrow account address for a (client, server) pair, or
    /// `None` when no escrow has been opened.
    pub async fn escrow_address(
        &self,
        client: Address,
        server: Address,
    ) -> Result<Option<Address>, ChainError> {
        let data = self.broker.escrow_account_address(client, server);
        let ret = match self.chain.call(self.broker.address(), data).await {
            Ok(ret) => ret,
            Err(ChainError::Reverted(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let account = getEscrowAccountAddressCall::abi_decode_returns(&ret)
            .map_err(|e| ChainError::Transport(format!("malformed call return: {e}")))?;
        Ok((account != Address::ZERO).then_some(account))
    }

    /// Returns the escrow token balance for a (client, server) pair.
    ///
    /// An absent escrow reads as zero, matching what a payer would be able
    /// to settle. Transport failures still propagate.
    pub async fn escrow_balance(
        &self,
        client: Address,
        server: Address,
    ) -> Result<U256, ChainError> {
        if self.escrow_address(client, server).await?.is_none() {
            return Ok(U256::ZERO);
        }
        let data = self.broker.escrow_token_balance(client, server);
        let ret = match self.chain.call(self.broker.address(), data).await {
            Ok(ret) => ret,
            Err(ChainError::Reverted(_)) => return Ok(U256::ZERO),
            Err(e) => return Err(e),
        };
        getEscrowTokenBalanceCall::abi_decode_returns(&ret)
            .map_err(|e| ChainError::Transport(format!("malformed call return: {e}")))
    }

    /// Returns the token an escrow is denominated in, or `None` when no
    /// escrow has been opened.
    pub async fn escrow_token(
        &self,
        client: Address,
        server: Address,
    ) -> Result<Option<Address>, ChainError> {
        let data = self.broker.escrow_token_address(client, server);
        let ret = match self.chain.call(self.broker.address(), data).await {
            Ok(ret) => ret,
            Err(ChainError::Reverted(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let token = getEscrowTokenAddressCall::abi_decode_returns(&ret)
            .map_err(|e| ChainError::Transport(format!("malformed call return: {e}")))?;
        Ok((token != Address::ZERO).then_some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, Bytes, address};
    use alloy_sol_types::SolValue;
    use std::collections::HashMap;

    /// Maps 4-byte selectors to canned call results.
    struct CannedChain {
        returns: HashMap<[u8; 4], Result<Bytes, ChainError>>,
    }

    impl CannedChain {
        fn new() -> Self {
            Self {
                returns: HashMap::new(),
            }
        }

        fn answer(mut self, selector: [u8; 4], ret: Result<Bytes, ChainError>) -> Self {
            self.returns.insert(selector, ret);
            self
        }
    }

    #[async_trait::async_trait]
    impl ChainClient for CannedChain {
        async fn transaction_count(&self, _address: Address) -> Result<u64, ChainError> {
            Ok(0)
        }

        async fn submit_raw_transaction(&self, _raw: Bytes) -> Result<B256, ChainError> {
            Err(ChainError::Transport("not used in this test".to_owned()))
        }

        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ChainError> {
            let selector: [u8; 4] = data[..4].try_into().unwrap();
            match self.returns.get(&selector) {
                Some(Ok(ret)) => Ok(ret.clone()),
                Some(Err(ChainError::Reverted(m))) => Err(ChainError::Reverted(m.clone())),
                Some(Err(ChainError::Transport(m))) => Err(ChainError::Transport(m.clone())),
                None => Err(ChainError::Transport("unexpected call".to_owned())),
            }
        }
    }

    const CLIENT: Address = address!("0000000000000000000000000000000000000011");
    const SERVER: Address = address!("0000000000000000000000000000000000000022");

    fn reader(chain: CannedChain) -> EscrowReader {
        EscrowReader::new(Arc::new(chain), Broker::base_sepolia())
    }

    #[tokio::test]
    async fn open_escrow_reports_address_and_balance() {
        let account = address!("00000000000000000000000000000000000000aa");
        let chain = CannedChain::new()
            .answer(
                getEscrowAccountAddressCall::SELECTOR,
                Ok(account.abi_encode().into()),
            )
            .answer(
                getEscrowTokenBalanceCall::SELECTOR,
                Ok(U256::from(1234u64).abi_encode().into()),
            );
        let reader = reader(chain);

        assert_eq!(
            reader.escrow_address(CLIENT, SERVER).await.unwrap(),
            Some(account)
        );
        assert_eq!(
            reader.escrow_balance(CLIENT, SERVER).await.unwrap(),
            U256::from(1234u64)
        );
    }

    #[tokio::test]
    async fn zero_account_address_means_no_escrow() {
        let chain = CannedChain::new().answer(
            getEscrowAccountAddressCall::SELECTOR,
            Ok(Address::ZERO.abi_encode().into()),
        );
        let reader = reader(chain);
        assert_eq!(reader.escrow_address(CLIENT, SERVER).await.unwrap(), None);
        assert_eq!(
            reader.escrow_balance(CLIENT, SERVER).await.unwrap(),
            U256::ZERO
        );
    }

    #[tokio::test]
    async fn balance_revert_reads_as_zero() {
        let account = address!("00000000000000000000000000000000000000aa");
        let chain = CannedChain::new()
            .answer(
                getEscrowAccountAddressCall::SELECTOR,
                Ok(account.abi_encode().into()),
            )
            .answer(
                getEscrowTokenBalanceCall::SELECTOR,
                Err(ChainError::Reverted("escrow does not exist".to_owned())),
            );
        let reader = reader(chain);
        assert_eq!(
            reader.escrow_balance(CLIENT, SERVER).await.unwrap(),
            U256::ZERO
        );
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let chain = CannedChain::new().answer(
            getEscrowAccountAddressCall::SELECTOR,
            Err(ChainError::Transport("connection refused".to_owned())),
        );
        let reader = reader(chain);
        let err = reader.escrow_address(CLIENT, SERVER).await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)));
    }

    #[tokio::test]
    async fn token_query_folds_revert_to_none() {
        let chain = CannedChain::new().answer(
            getEscrowTokenAddressCall::SELECTOR,
            Err(ChainError::Reverted("escrow does not exist".to_owned())),
        );
        let reader = reader(chain);
        assert_eq!(reader.escrow_token(CLIENT, SERVER).await.unwrap(), None);
    }
}
