//! Delegation point for the "exact" payment scheme.
//!
//! The middleware settles flash payments itself; requests carrying an exact
//! scheme payment, and requests carrying no payment at all, are handed to an
//! [`ExactSchemeHandler`]. The default handler answers both with a 402
//! challenge. Deployments that verify exact payments through a facilitator
//! plug in their own handler.

use std::convert::Infallible;

use axum_core::extract::Request;
use axum_core::response::Response;
use http::StatusCode;
use tower::util::BoxCloneSyncService;

use flash402::proto::{PaymentRequired, V1};
use flash402::scheme::Scheme;

use super::gate::json_response;
use super::routes::RouteConfig;

/// Handles requests on priced routes that the flash settlement path does not
/// cover.
#[async_trait::async_trait]
pub trait ExactSchemeHandler: Send + Sync {
    /// Produces the response for a request without a flash payment. `inner`
    /// is the protected service; handlers that accept the payment call it,
    /// handlers that reject do not.
    async fn handle(
        &self,
        req: Request,
        route: &RouteConfig,
        inner: BoxCloneSyncService<Request, Response, Infallible>,
    ) -> Response;
}

/// Default handler: always challenges with a 402 advertising the route's
/// price under the exact scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChallengeHandler;

#[async_trait::async_trait]
impl ExactSchemeHandler for ChallengeHandler {
    async fn handle(
        &self,
        _req: Request,
        route: &RouteConfig,
        _inner: BoxCloneSyncService<Request, Response, Infallible>,
    ) -> Response {
        let challenge = PaymentRequired {
            x402_version: V1,
            accepts: vec![route.requirements(Scheme::Exact)],
            error: Some("X-Payment header is required".to_owned()),
        };
        json_response(StatusCode::PAYMENT_REQUIRED, &challenge)
    }
}
