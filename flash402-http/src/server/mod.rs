//! Server-side payment enforcement for axum.
//!
//! [`FlashPaymentMiddleware`] is applied as a tower layer. Each request on a
//! priced route either carries a flash payment, which the middleware settles
//! optimistically, or is handed to an [`ExactSchemeHandler`] which by default
//! answers with a 402 challenge advertising the route's price.

mod exact;
mod gate;
mod layer;
mod routes;

pub use exact::{ChallengeHandler, ExactSchemeHandler};
pub use layer::{FlashPaymentMiddleware, FlashPaymentService};
pub use routes::{RouteConfig, RouteTable};
