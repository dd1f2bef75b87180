//! Wire format types for the x402 flash payment protocol.
//!
//! All types serialize to JSON with camelCase field names. The protocol
//! version is carried in the `x402Version` field and is always `1` for the
//! flash scheme.
//!
//! # Key Types
//!
//! - [`PaymentRequirements`] - One accepted payment option in a 402 body
//! - [`PaymentRequired`] - The 402 response body (`accepts` list)
//! - [`PaymentPayload`] - The decoded `X-Payment` request header value
//! - [`PaymentResponse`] - The decoded `X-Payment-Response` response header value
//!
//! Header values travel as base64 of UTF-8 JSON; see [`header`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod header;

/// A protocol version marker parameterized by its numeric value.
///
/// Serializes as a bare integer and rejects any other value on
/// deserialization, so a mismatched `x402Version` fails at decode time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version<const N: u8>;

impl<const N: u8> Version<N> {
    /// The numeric value of this protocol version.
    pub const VALUE: u8 = N;
}

impl<const N: u8> PartialEq<u8> for Version<N> {
    fn eq(&self, other: &u8) -> bool {
        *other == N
    }
}

impl<const N: u8> From<Version<N>> for u8 {
    fn from(_: Version<N>) -> Self {
        N
    }
}

impl<const N: u8> std::fmt::Display for Version<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{N}")
    }
}

impl<const N: u8> Serialize for Version<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(N)
    }
}

impl<'de, const N: u8> Deserialize<'de> for Version<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = u8::deserialize(deserializer)?;
        if v == N {
            Ok(Self)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected version {N}, got {v}"
            )))
        }
    }
}

/// Version marker for x402 protocol version 1.
pub type X402Version1 = Version<1>;

/// Convenience constant for constructing protocol messages.
pub const V1: X402Version1 = Version;

/// One accepted payment option returned in a 402 body.
///
/// Amounts stay decimal integer strings on the wire; parsing to an
/// arbitrary-precision integer happens at the chain boundary, never through
/// a floating-point type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// The payment scheme (e.g. "exact", "flash").
    pub scheme: String,
    /// The network name (e.g. "base-sepolia").
    pub network: String,
    /// The maximum amount required, as a decimal integer string in the
    /// asset's smallest unit.
    pub max_amount_required: String,
    /// The recipient address for payment.
    pub pay_to: String,
    /// The token asset address, when the scheme pays in a specific token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// The resource URL being paid for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Human-readable description of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Maximum time in seconds for payment validity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_timeout_seconds: Option<u64>,
}

/// HTTP 402 Payment Required response body.
///
/// Carries the list of acceptable payment options. An empty `accepts` list
/// is representable on the wire and is rejected by the negotiator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    /// Protocol version (always 1).
    pub x402_version: X402Version1,
    /// List of acceptable payment options.
    #[serde(default)]
    pub accepts: Vec<PaymentRequirements>,
    /// Optional error message describing why payment is (still) required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The decoded value of the `X-Payment` request header.
///
/// `payload` is scheme-specific. For the flash scheme it is a JSON string
/// holding the raw signed transaction hex, and that string must be preserved
/// byte-exact: the server recomputes the transaction hash from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload<TPayload = serde_json::Value> {
    /// Protocol version (always 1).
    pub x402_version: X402Version1,
    /// The payment scheme name.
    pub scheme: String,
    /// The network name the payment targets.
    pub network: String,
    /// The scheme-specific payment proof.
    pub payload: TPayload,
}

/// The decoded value of the `X-Payment-Response` response header.
///
/// Emitted by the server after dispatching settlement. `transaction` is the
/// precalculated hash of the submitted raw transaction, computed before and
/// independently of on-chain confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Whether settlement was dispatched.
    pub success: bool,
    /// The transaction hash, 0x-prefixed hex.
    pub transaction: String,
    /// The network the settlement was submitted to.
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_serializes_as_bare_integer() {
        let json = serde_json::to_string(&V1).unwrap();
        assert_eq!(json, "1");
    }

    #[test]
    fn version_rejects_mismatched_value() {
        let result: Result<X402Version1, _> = serde_json::from_str("2");
        assert!(result.is_err());
    }

    #[test]
    fn payment_requirements_wire_names_are_camel_case() {
        let req = PaymentRequirements {
            scheme: "flash".to_owned(),
            network: "base-sepolia".to_owned(),
            max_amount_required: "1000".to_owned(),
            pay_to: "0xb4bd6078a915b9d71de4bc857063db20dd1ad4a3".to_owned(),
            asset: None,
            resource: None,
            description: None,
            mime_type: None,
            max_timeout_seconds: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["maxAmountRequired"], "1000");
        assert_eq!(json["payTo"], "0xb4bd6078a915b9d71de4bc857063db20dd1ad4a3");
        assert!(json.get("asset").is_none());
    }

    #[test]
    fn payment_required_accepts_defaults_to_empty() {
        let body: PaymentRequired = serde_json::from_str(r#"{"x402Version":1}"#).unwrap();
        assert!(body.accepts.is_empty());
    }

    #[test]
    fn flash_payload_hex_string_survives_round_trip() {
        let payload = PaymentPayload {
            x402_version: V1,
            scheme: "flash".to_owned(),
            network: "base-sepolia".to_owned(),
            payload: serde_json::Value::String("0x02f86b8302053980".to_owned()),
        };
        let json = serde_json::to_string(&payload).unwrap();
        let decoded: PaymentPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.payload.as_str(), Some("0x02f86b8302053980"));
        assert_eq!(decoded.scheme, "flash");
    }

    #[test]
    fn payment_response_round_trips() {
        let response = PaymentResponse {
            success: true,
            transaction: "0xabc123".to_owned(),
            network: "base-sepolia".to_owned(),
        };
        let json = serde_json::to_string(&response).unwrap();
        let decoded: PaymentResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, response);
    }
}
