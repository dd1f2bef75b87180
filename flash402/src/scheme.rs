//! Payment scheme tagging, scheme clients, and requirement selection.
//!
//! The wire format keeps `scheme` as a string; [`Scheme`] is the validated
//! form the middleware dispatches on. Unknown scheme strings fail to parse
//! and are rejected with a protocol error instead of being poked at as
//! untyped data.

use std::fmt;
use std::str::FromStr;

use crate::error::NegotiationError;
use crate::proto::{PaymentPayload, PaymentRequirements};

/// A payment scheme supported by this protocol implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Direct on-chain transfer proof, settled by a standard x402 facilitator.
    Exact,
    /// Escrow-settlement proof: a raw signed transaction drawing down a
    /// pre-funded escrow, submitted by the server.
    Flash,
}

impl Scheme {
    /// Returns the wire name of the scheme.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Flash => "flash",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized scheme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment scheme '{0}'")]
pub struct UnknownSchemeError(pub String);

impl FromStr for Scheme {
    type Err = UnknownSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "flash" => Ok(Self::Flash),
            other => Err(UnknownSchemeError(other.to_owned())),
        }
    }
}

/// Client-side capability: turn a selected payment requirement into a signed
/// payment payload for the `X-Payment` header.
///
/// Implementations receive the whole requirement and may ignore its `scheme`
/// field: the flash negotiator pays with its own scheme against whatever
/// requirement the selector picked, mirroring the protocol's documented
/// first-wins simplification.
#[async_trait::async_trait]
pub trait SchemeClient: Send + Sync {
    /// The scheme this client signs payments for.
    fn scheme(&self) -> Scheme;

    /// Builds and signs a payment payload satisfying `requirement`.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError`] if the requirement cannot be satisfied
    /// or if a chain read or signing operation fails. On error no partial
    /// payment state is left behind.
    async fn sign_payment(
        &self,
        requirement: &PaymentRequirements,
    ) -> Result<PaymentPayload, NegotiationError>;
}

/// Policy for choosing one requirement out of a 402 `accepts` list.
///
/// The list is never ranked by the protocol itself. The selection policy is
/// configurable precisely because the default may pick a requirement the
/// client cannot satisfy.
pub trait RequirementSelector: Send + Sync {
    /// Picks a requirement from a non-empty `accepts` list, or `None` if no
    /// entry is acceptable under this policy.
    fn select<'a>(&self, accepts: &'a [PaymentRequirements]) -> Option<&'a PaymentRequirements>;
}

/// Default selection policy: the first advertised requirement wins,
/// regardless of its scheme or network.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWins;

impl RequirementSelector for FirstWins {
    fn select<'a>(&self, accepts: &'a [PaymentRequirements]) -> Option<&'a PaymentRequirements> {
        accepts.first()
    }
}

/// Opt-in selection policy: the first requirement advertising the given
/// scheme wins, falling back to the first entry when none matches.
///
/// The fallback keeps behavior compatible with servers whose discovery path
/// only advertises "exact" even though they settle flash payments.
#[derive(Debug, Clone, Copy)]
pub struct FirstSupported(pub Scheme);

impl RequirementSelector for FirstSupported {
    fn select<'a>(&self, accepts: &'a [PaymentRequirements]) -> Option<&'a PaymentRequirements> {
        accepts
            .iter()
            .find(|r| r.scheme.parse::<Scheme>() == Ok(self.0))
            .or_else(|| accepts.first())
    }
}
