//! Per-route pricing configuration.

use std::collections::HashMap;

use http::Method;

use flash402::proto::PaymentRequirements;
use flash402::scheme::Scheme;

/// Pricing for one protected route.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Network the payment must settle on, e.g. `base-sepolia`.
    pub network: String,
    /// Amount due, as a decimal string in the asset's smallest unit.
    pub max_amount_required: String,
    /// Address payments are made out to.
    pub pay_to: String,
    /// Optional asset contract the price is denominated in.
    pub asset: Option<String>,
    /// Optional human-readable description, surfaced in 402 challenges.
    pub description: Option<String>,
}

impl RouteConfig {
    /// Renders this route's price as a challenge requirement for the given
    /// scheme.
    #[must_use]
    pub fn requirements(&self, scheme: Scheme) -> PaymentRequirements {
        PaymentRequirements {
            scheme: scheme.to_string(),
            network: self.network.clone(),
            max_amount_required: self.max_amount_required.clone(),
            pay_to: self.pay_to.clone(),
            asset: self.asset.clone(),
            resource: None,
            description: self.description.clone(),
            mime_type: None,
            max_timeout_seconds: None,
        }
    }
}

/// Maps `"METHOD /path"` keys to route pricing.
///
/// Requests whose method and path have no entry here pass through the
/// payment middleware untouched.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteConfig>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prices a route. The key is `"METHOD /path"`, e.g. `"GET /hello"`.
    #[must_use]
    pub fn route(mut self, key: impl Into<String>, config: RouteConfig) -> Self {
        self.routes.insert(key.into(), config);
        self
    }

    /// Looks up the pricing for a request, if any.
    #[must_use]
    pub fn get(&self, method: &Method, path: &str) -> Option<&RouteConfig> {
        self.routes.get(&format!("{method} {path}"))
    }

    /// Iterates over all priced routes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteConfig)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v))
    }
}
