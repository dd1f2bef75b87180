//! Registry of known network names and their EIP-155 chain ids.
//!
//! The flash scheme addresses networks by human-readable name on the wire
//! ("base-sepolia"), while transaction signing needs the numeric chain id.

/// A known network definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network name used on the wire.
    pub name: &'static str,
    /// EIP-155 chain id.
    pub chain_id: u64,
}

/// Networks the flash payment broker is known on.
///
/// The reference deployment lives on Base Sepolia; Base mainnet is listed
/// for forward compatibility.
pub const KNOWN_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        name: "base-sepolia",
        chain_id: 84532,
    },
    NetworkInfo {
        name: "base",
        chain_id: 8453,
    },
];

/// Looks up the chain id for a wire network name.
#[must_use]
pub fn chain_id_by_name(name: &str) -> Option<u64> {
    KNOWN_NETWORKS
        .iter()
        .find(|n| n.name == name)
        .map(|n| n.chain_id)
}

/// Looks up the wire network name for a chain id.
#[must_use]
pub fn name_by_chain_id(chain_id: u64) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|n| n.chain_id == chain_id)
        .map(|n| n.name)
}
