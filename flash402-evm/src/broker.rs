//! FlashPaymentBroker contract interface.
//!
//! The broker is an external on-chain collaborator; this module only encodes
//! calls against its fixed ABI. Escrow accounts are keyed by the
//! (client, server) address pair and hold an ERC-20 token balance.

use alloy_primitives::{Address, Bytes, U256, address};
use alloy_sol_types::{SolCall, sol};

sol! {
    /// Settles a payment from the caller's escrow to the payment address.
    function settlePayment(address paymentAddress, uint256 amount);

    /// Opens an escrow from the caller to a server, funded with `amount`
    /// of the given token.
    function openEscrow(address paymentAddress, address tokenAddress, uint256 amount);

    /// Returns the escrow account address for a (client, server) pair, or
    /// the zero address when none exists.
    function getEscrowAccountAddress(address client, address server) returns (address);

    /// Returns the token balance of the escrow for a (client, server) pair.
    /// Reverts when no escrow exists.
    function getEscrowTokenBalance(address client, address server) returns (uint256);

    /// Returns the token the escrow for a (client, server) pair is
    /// denominated in.
    function getEscrowTokenAddress(address client, address server) returns (address);

    /// Raw mapping accessor mirroring `getEscrowAccountAddress`.
    function escrowAccounts(address client, address server) returns (address);

    /// Closes the caller's escrow towards a server.
    function clientCloseEscrow(address server);

    /// Closes the escrow a client holds towards the caller.
    function serverCloseEscrow(address client);
}

/// The broker deployment on Base Sepolia.
pub const BASE_SEPOLIA_BROKER: Address = address!("9904d883ea8037739c0946cac52c42b38165360a");

/// A FlashPaymentBroker deployment.
///
/// Pure calldata encoding; pair with a [`ChainClient`] to execute calls.
///
/// [`ChainClient`]: flash402::chain::ChainClient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Broker {
    address: Address,
}

impl Broker {
    /// Creates a broker handle for a deployment address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// The reference deployment on Base Sepolia.
    #[must_use]
    pub const fn base_sepolia() -> Self {
        Self::new(BASE_SEPOLIA_BROKER)
    }

    /// Returns the deployment address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Encodes `settlePayment(payTo, amount)` calldata.
    #[must_use]
    pub fn settle_payment(&self, pay_to: Address, amount: U256) -> Bytes {
        settlePaymentCall {
            paymentAddress: pay_to,
            amount,
        }
        .abi_encode()
        .into()
    }

    /// Encodes `openEscrow(server, token, amount)` calldata.
    #[must_use]
    pub fn open_escrow(&self, server: Address, token: Address, amount: U256) -> Bytes {
        openEscrowCall {
            paymentAddress: server,
            tokenAddress: token,
            amount,
        }
        .abi_encode()
        .into()
    }

    /// Encodes `getEscrowAccountAddress(client, server)` calldata.
    #[must_use]
    pub fn escrow_account_address(&self, client: Address, server: Address) -> Bytes {
        getEscrowAccountAddressCall { client, server }
            .abi_encode()
            .into()
    }

    /// Encodes `getEscrowTokenBalance(client, server)` calldata.
    #[must_use]
    pub fn escrow_token_balance(&self, client: Address, server: Address) -> Bytes {
        getEscrowTokenBalanceCall { client, server }
            .abi_encode()
            .into()
    }

    /// Encodes `getEscrowTokenAddress(client, server)` calldata.
    #[must_use]
    pub fn escrow_token_address(&self, client: Address, server: Address) -> Bytes {
        getEscrowTokenAddressCall { client, server }
            .abi_encode()
            .into()
    }

    /// Encodes `escrowAccounts(client, server)` calldata, the raw mapping
    /// accessor behind `getEscrowAccountAddress`.
    #[must_use]
    pub fn escrow_accounts(&self, client: Address, server: Address) -> Bytes {
        escrowAccountsCall { client, server }.abi_encode().into()
    }

    /// Encodes `clientCloseEscrow(server)` calldata.
    ///
    /// Escrow closing is not exercised by the payment flow; the encoder
    /// exists for completeness of the broker surface.
    #[must_use]
    pub fn client_close_escrow(&self, server: Address) -> Bytes {
        clientCloseEscrowCall { server }.abi_encode().into()
    }

    /// Encodes `serverCloseEscrow(client)` calldata.
    #[must_use]
    pub fn server_close_escrow(&self, client: Address) -> Bytes {
        serverCloseEscrowCall { client }.abi_encode().into()
    }
}
