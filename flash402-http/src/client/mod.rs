//! Client-side payment negotiation for reqwest.
//!
//! [`FlashNegotiator`] is a [`reqwest_middleware::Middleware`] that turns 402
//! Payment Required responses into paid retries: it parses the challenge
//! body, picks a requirement, signs a payment through the configured
//! [`SchemeClient`], and replays the request once with an `X-Payment` header.

use std::sync::Arc;

use http::{Extensions, HeaderName, StatusCode};
use reqwest::{Request, Response};
use reqwest_middleware as rqm;

use flash402::error::NegotiationError;
use flash402::proto::header::{X_PAYMENT_RESPONSE, decode_header, encode_header};
use flash402::proto::{PaymentRequired, PaymentResponse};
use flash402::scheme::{FirstWins, RequirementSelector, SchemeClient};

/// Automatic 402 negotiation middleware.
///
/// Exactly one retry per request: if the paid retry also comes back 402, that
/// response is surfaced to the caller rather than negotiated again.
#[allow(missing_debug_implementations)] // holds a dyn scheme client
pub struct FlashNegotiator<TSelector = FirstWins> {
    scheme: Arc<dyn SchemeClient>,
    selector: TSelector,
}

impl FlashNegotiator {
    /// Creates a negotiator that pays with the given scheme client and picks
    /// the first advertised requirement.
    pub fn new<S: SchemeClient + 'static>(scheme: S) -> Self {
        Self {
            scheme: Arc::new(scheme),
            selector: FirstWins,
        }
    }
}

impl<TSelector> FlashNegotiator<TSelector> {
    /// Replaces the requirement selector.
    pub fn with_selector<P: RequirementSelector>(self, selector: P) -> FlashNegotiator<P> {
        FlashNegotiator {
            scheme: self.scheme,
            selector,
        }
    }
}

impl<TSelector> FlashNegotiator<TSelector>
where
    TSelector: RequirementSelector,
{
    /// Turns a 402 response into an `X-Payment` header value.
    ///
    /// Consumes the response: the challenge body is read and parsed, a
    /// requirement is selected, and a payment is signed for it.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError::InvalidPaymentRequired`] when the body is
    /// not a payment challenge, [`NegotiationError::NoPaymentRequirements`]
    /// when the challenge offers nothing to pay, and whatever the scheme
    /// client reports when signing fails. Nothing is signed unless a
    /// requirement was selected.
    pub async fn make_payment_header(&self, res: Response) -> Result<String, NegotiationError> {
        let challenge: PaymentRequired = res
            .json()
            .await
            .map_err(|e| NegotiationError::InvalidPaymentRequired(e.to_string()))?;

        if challenge.accepts.is_empty() {
            return Err(NegotiationError::NoPaymentRequirements);
        }
        let requirement = self.selector.select(&challenge.accepts).ok_or_else(|| {
            NegotiationError::UnsupportedRequirement(
                "no advertised payment requirement is supported".to_owned(),
            )
        })?;

        let payload = self.scheme.sign_payment(requirement).await?;
        Ok(encode_header(&payload)?)
    }
}

/// Decodes the `X-Payment-Response` settlement receipt from a paid response,
/// if the server attached one.
#[must_use]
pub fn payment_response(res: &Response) -> Option<PaymentResponse> {
    let header = res.headers().get(X_PAYMENT_RESPONSE)?;
    decode_header(header.as_bytes()).ok()
}

#[async_trait::async_trait]
impl<TSelector> rqm::Middleware for FlashNegotiator<TSelector>
where
    TSelector: RequirementSelector + Send + Sync + 'static,
{
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        // Cloned before the first send; requests with streaming bodies
        // cannot be replayed.
        let retry_req = req.try_clone();
        let res = next.clone().run(req, extensions).await?;

        if res.status() != StatusCode::PAYMENT_REQUIRED {
            return Ok(res);
        }

        tracing::debug!(url = %res.url(), "received 402 Payment Required, negotiating payment");

        let header = self
            .make_payment_header(res)
            .await
            .map_err(|e| rqm::Error::Middleware(e.into()))?;

        let mut retry = retry_req.ok_or(rqm::Error::Middleware(
            NegotiationError::RequestNotCloneable.into(),
        ))?;
        retry.headers_mut().insert(
            HeaderName::from_static("x-payment"),
            header.parse().expect("base64 is a valid header value"),
        );

        next.run(retry, extensions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flash402::proto::{PaymentPayload, PaymentRequirements, V1};
    use flash402::scheme::Scheme;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StubScheme {
        signatures: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl SchemeClient for StubScheme {
        fn scheme(&self) -> Scheme {
            Scheme::Flash
        }

        async fn sign_payment(
            &self,
            requirement: &PaymentRequirements,
        ) -> Result<PaymentPayload, NegotiationError> {
            self.signatures.fetch_add(1, Ordering::SeqCst);
            Ok(PaymentPayload {
                x402_version: V1,
                scheme: Scheme::Flash.to_string(),
                network: requirement.network.clone(),
                payload: serde_json::Value::String("0xdeadbeef".to_owned()),
            })
        }
    }

    fn paying_client(signatures: Arc<AtomicUsize>) -> rqm::ClientWithMiddleware {
        rqm::ClientBuilder::new(reqwest::Client::new())
            .with(FlashNegotiator::new(StubScheme { signatures }))
            .build()
    }

    fn challenge_body() -> serde_json::Value {
        serde_json::json!({
            "x402Version": 1,
            "accepts": [{
                "scheme": "exact",
                "network": "base-sepolia",
                "maxAmountRequired": "1000",
                "payTo": "0xb4bd6078a915b9d71de4bc857063db20dd1ad4a3"
            }],
            "error": "X-Payment header is required"
        })
    }

    #[tokio::test]
    async fn non_402_responses_pass_through_unsigned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/free"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let signatures = Arc::new(AtomicUsize::new(0));
        let client = paying_client(Arc::clone(&signatures));

        let res = client
            .get(format!("{}/free", server.uri()))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(signatures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pays_once_and_retries_with_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paid"))
            .and(header_exists("x-payment"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("paid content")
                    .insert_header(
                        "x-payment-response",
                        encode_header(&PaymentResponse {
                            success: true,
                            transaction: "0xabc".to_owned(),
                            network: "base-sepolia".to_owned(),
                        })
                        .unwrap()
                        .as_str(),
                    ),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/paid"))
            .respond_with(ResponseTemplate::new(402).set_body_json(challenge_body()))
            .mount(&server)
            .await;

        let signatures = Arc::new(AtomicUsize::new(0));
        let client = paying_client(Arc::clone(&signatures));

        let res = client
            .get(format!("{}/paid", server.uri()))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(signatures.load(Ordering::SeqCst), 1);

        let receipt = payment_response(&res).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.transaction, "0xabc");
        assert_eq!(receipt.network, "base-sepolia");

        assert_eq!(res.text().await.unwrap(), "paid content");
    }

    #[tokio::test]
    async fn empty_accepts_fails_without_signing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paid"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "x402Version": 1,
                "accepts": [],
                "error": "X-Payment header is required"
            })))
            .mount(&server)
            .await;

        let signatures = Arc::new(AtomicUsize::new(0));
        let client = paying_client(Arc::clone(&signatures));

        let err = client
            .get(format!("{}/paid", server.uri()))
            .send()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no payment requirements"));
        assert_eq!(signatures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_challenge_402_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paid"))
            .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
            .mount(&server)
            .await;

        let signatures = Arc::new(AtomicUsize::new(0));
        let client = paying_client(Arc::clone(&signatures));

        let res = client.get(format!("{}/paid", server.uri())).send().await;
        assert!(res.is_err());
        assert_eq!(signatures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_402_is_surfaced_not_renegotiated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paid"))
            .respond_with(ResponseTemplate::new(402).set_body_json(challenge_body()))
            .mount(&server)
            .await;

        let signatures = Arc::new(AtomicUsize::new(0));
        let client = paying_client(Arc::clone(&signatures));

        let res = client
            .get(format!("{}/paid", server.uri()))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 402);
        assert_eq!(signatures.load(Ordering::SeqCst), 1);
    }
}
