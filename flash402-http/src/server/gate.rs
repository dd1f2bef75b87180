//! Per-request payment gate.
//!
//! Enforcement order on a priced route: missing header delegates to the
//! exact handler, malformed header fails, wrong network fails, then the
//! scheme dispatches. The network check runs before scheme dispatch, so an
//! unknown scheme on the wrong network reports the network error.

use std::convert::Infallible;
use std::sync::Arc;

use alloy_primitives::{Bytes, hex, keccak256};
use axum_core::body::Body;
use axum_core::extract::Request;
use axum_core::response::Response;
use http::StatusCode;
use serde::Serialize;
use tower::Service;
use tower::util::BoxCloneSyncService;

use flash402::chain::ChainClient;
use flash402::proto::header::{X_PAYMENT, X_PAYMENT_RESPONSE, decode_header, encode_header};
use flash402::proto::{PaymentPayload, PaymentResponse};
use flash402::scheme::Scheme;

use super::exact::ExactSchemeHandler;
use super::routes::RouteTable;

type Inner = BoxCloneSyncService<Request, Response, Infallible>;

/// Payment enforcement state for a single request.
pub(crate) struct PaymentGate {
    pub(crate) routes: Arc<RouteTable>,
    pub(crate) chain: Arc<dyn ChainClient>,
    pub(crate) exact: Arc<dyn ExactSchemeHandler>,
}

impl PaymentGate {
    pub(crate) async fn handle(self, mut inner: Inner, req: Request) -> Response {
        let Some(route) = self
            .routes
            .get(req.method(), req.uri().path())
            .cloned()
        else {
            // Unpriced route, nothing to enforce.
            return into_ok(inner.call(req).await);
        };

        let Some(header) = req.headers().get(X_PAYMENT) else {
            return self.exact.handle(req, &route, inner).await;
        };

        let payload: PaymentPayload = match decode_header(header.as_bytes()) {
            Ok(payload) => payload,
            Err(_) => return protocol_error(StatusCode::BAD_REQUEST, "Invalid X-Payment JSON"),
        };

        if payload.network != route.network {
            return protocol_error(StatusCode::BAD_REQUEST, "Unsupported x402 payment network");
        }

        match payload.scheme.parse::<Scheme>() {
            Ok(Scheme::Flash) => self.settle_flash(payload, inner, req).await,
            Ok(Scheme::Exact) => self.exact.handle(req, &route, inner).await,
            Err(_) => protocol_error(StatusCode::BAD_REQUEST, "Unsupported x402 payment scheme"),
        }
    }

    /// Settles a flash payment optimistically: the raw transaction is
    /// submitted fire-and-forget and the response carries its hash as the
    /// receipt without waiting for inclusion. A submission failure is
    /// logged; the response has already committed to success by then.
    async fn settle_flash(
        &self,
        payload: PaymentPayload,
        mut inner: Inner,
        req: Request,
    ) -> Response {
        let Some(raw_hex) = payload.payload.as_str() else {
            return protocol_error(StatusCode::BAD_REQUEST, "Invalid X-Payment JSON");
        };
        let Ok(raw) = hex::decode(raw_hex) else {
            return protocol_error(StatusCode::BAD_REQUEST, "Invalid X-Payment JSON");
        };

        // The receipt hash is computed locally so the response never waits
        // on the chain. keccak256 of the raw signed transaction is its
        // transaction hash.
        let tx_hash = keccak256(&raw);
        let receipt = PaymentResponse {
            success: true,
            transaction: tx_hash.to_string(),
            network: payload.network,
        };
        let receipt_header = encode_header(&receipt).expect("receipt serializes to base64");

        let chain = Arc::clone(&self.chain);
        let raw = Bytes::from(raw);
        tokio::spawn(async move {
            match chain.submit_raw_transaction(raw).await {
                Ok(hash) => tracing::info!(%hash, "settlement transaction submitted"),
                Err(err) => tracing::warn!(%err, "settlement transaction failed to submit"),
            }
        });

        let mut response = into_ok(inner.call(req).await);
        response.headers_mut().insert(
            X_PAYMENT_RESPONSE,
            receipt_header
                .parse()
                .expect("base64 is a valid header value"),
        );
        response
    }
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Serializes a body as a JSON response with the given status.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let bytes = serde_json::to_vec(body).expect("body serializes to JSON");
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(bytes))
        .expect("response construction is infallible")
}

/// A protocol-level rejection, as a `{"error": ...}` JSON body.
pub(crate) fn protocol_error(status: StatusCode, message: &str) -> Response {
    json_response(status, &serde_json::json!({ "error": message }))
}
