//! HTTP transport for the x402 flash payment scheme.
//!
//! Two halves, each behind a feature flag:
//!
//! - `client` - a `reqwest-middleware` middleware that answers
//!   402 Payment Required challenges by signing a flash payment and retrying
//!   the request once with an `X-Payment` header.
//! - `server` - a tower layer for axum that challenges unpaid requests
//!   on priced routes and settles attached flash payments optimistically.

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub use client::FlashNegotiator;
#[cfg(feature = "server")]
pub use server::{FlashPaymentMiddleware, RouteConfig, RouteTable};
