//! Base64-JSON codec for the x402 payment headers.
//!
//! Both x402 headers carry UTF-8 JSON encoded with the standard base64
//! alphabet. The codec is deliberately symmetric so that
//! `decode(encode(v)) == v` for every serializable value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Request header carrying the base64-encoded payment payload.
pub const X_PAYMENT: &str = "X-Payment";

/// Response header carrying the base64-encoded settlement receipt.
pub const X_PAYMENT_RESPONSE: &str = "X-Payment-Response";

/// Errors produced by the header codec.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// The header value is not valid base64.
    #[error("invalid base64 in payment header: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not the expected JSON shape.
    #[error("invalid JSON in payment header: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a value as base64 of its JSON representation.
///
/// # Errors
///
/// Returns [`HeaderError::Json`] if the value cannot be serialized. The wire
/// types in [`crate::proto`] always serialize successfully.
pub fn encode_header<T: Serialize>(value: &T) -> Result<String, HeaderError> {
    let json = serde_json::to_vec(value)?;
    Ok(b64.encode(json))
}

/// Decodes a base64-JSON header value into a typed structure.
///
/// # Errors
///
/// Returns [`HeaderError`] if the bytes are not valid base64 or the decoded
/// JSON does not match `T`.
pub fn decode_header<T: DeserializeOwned>(raw: &[u8]) -> Result<T, HeaderError> {
    let json = b64.decode(raw)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{PaymentPayload, PaymentResponse};

    #[test]
    fn payment_response_round_trips_through_base64_json() {
        let response = PaymentResponse {
            success: true,
            transaction: "0x1111111111111111111111111111111111111111111111111111111111111111"
                .to_owned(),
            network: "base-sepolia".to_owned(),
        };
        let encoded = encode_header(&response).unwrap();
        let decoded: PaymentResponse = decode_header(encoded.as_bytes()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn decode_matches_hand_built_header() {
        // base64 of {"x402Version":1,"scheme":"flash","network":"base-sepolia","payload":"0x"}
        let raw = b64.encode(
            r#"{"x402Version":1,"scheme":"flash","network":"base-sepolia","payload":"0x"}"#,
        );
        let decoded: PaymentPayload = decode_header(raw.as_bytes()).unwrap();
        assert_eq!(decoded.scheme, "flash");
        assert_eq!(decoded.network, "base-sepolia");
        assert_eq!(decoded.payload.as_str(), Some("0x"));
        assert_eq!(u8::from(decoded.x402_version), 1);
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let result: Result<PaymentResponse, _> = decode_header(b"not base64!!!");
        assert!(matches!(result, Err(HeaderError::Base64(_))));
    }

    #[test]
    fn decode_rejects_non_json_payload() {
        let raw = b64.encode("definitely not json");
        let result: Result<PaymentResponse, _> = decode_header(raw.as_bytes());
        assert!(matches!(result, Err(HeaderError::Json(_))));
    }
}
