//! Tower layer wiring the payment gate into an axum router.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum_core::extract::Request;
use axum_core::response::Response;
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service};

use flash402::chain::ChainClient;

use super::exact::{ChallengeHandler, ExactSchemeHandler};
use super::gate::PaymentGate;
use super::routes::RouteTable;

/// Payment middleware for axum.
///
/// Apply as a [`tower::Layer`] over a router. Routes priced in the
/// [`RouteTable`] are challenged and settled; everything else passes through.
#[allow(missing_debug_implementations)] // holds dyn trait objects
pub struct FlashPaymentMiddleware {
    routes: Arc<RouteTable>,
    chain: Arc<dyn ChainClient>,
    exact: Arc<dyn ExactSchemeHandler>,
}

impl Clone for FlashPaymentMiddleware {
    fn clone(&self) -> Self {
        Self {
            routes: Arc::clone(&self.routes),
            chain: Arc::clone(&self.chain),
            exact: Arc::clone(&self.exact),
        }
    }
}

impl FlashPaymentMiddleware {
    /// Creates the middleware with the default 402-challenge handler for
    /// unpaid and exact-scheme requests.
    #[must_use]
    pub fn new(routes: RouteTable, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            routes: Arc::new(routes),
            chain,
            exact: Arc::new(ChallengeHandler),
        }
    }

    /// Replaces the handler for unpaid and exact-scheme requests.
    #[must_use]
    pub fn with_exact_handler(mut self, handler: impl ExactSchemeHandler + 'static) -> Self {
        self.exact = Arc::new(handler);
        self
    }
}

impl<S> Layer<S> for FlashPaymentMiddleware
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    type Service = FlashPaymentService;

    fn layer(&self, inner: S) -> Self::Service {
        FlashPaymentService {
            routes: Arc::clone(&self.routes),
            chain: Arc::clone(&self.chain),
            exact: Arc::clone(&self.exact),
            inner: BoxCloneSyncService::new(inner),
        }
    }
}

/// The service produced by [`FlashPaymentMiddleware`].
#[allow(missing_debug_implementations)] // BoxCloneSyncService does not implement Debug
pub struct FlashPaymentService {
    routes: Arc<RouteTable>,
    chain: Arc<dyn ChainClient>,
    exact: Arc<dyn ExactSchemeHandler>,
    inner: BoxCloneSyncService<Request, Response, Infallible>,
}

impl Clone for FlashPaymentService {
    fn clone(&self) -> Self {
        Self {
            routes: Arc::clone(&self.routes),
            chain: Arc::clone(&self.chain),
            exact: Arc::clone(&self.exact),
            inner: self.inner.clone(),
        }
    }
}

impl Service<Request> for FlashPaymentService {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let gate = PaymentGate {
            routes: Arc::clone(&self.routes),
            chain: Arc::clone(&self.chain),
            exact: Arc::clone(&self.exact),
        };
        let inner = self.inner.clone();
        Box::pin(async move { Ok(gate.handle(inner, req).await) })
    }
}
