//! Server configuration.
//!
//! Loaded from a TOML file with `$VAR` / `${VAR}` environment variable
//! expansion in string values, so payout addresses and RPC endpoints can
//! live in the environment instead of the file.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3002
//! rpc_url = "https://sepolia-preconf.base.org"
//! network = "base-sepolia"
//! pay_to = "$PAY_TO"
//!
//! [routes."GET /hello"]
//! max_amount_required = "1000"
//! description = "A paid greeting"
//! ```
//!
//! Environment variables: `CONFIG` selects the file (default `config.toml`),
//! `HOST` / `PORT` / `PAY_TO` override the file values.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port (default: `3002`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP JSON-RPC endpoint used to submit settlement transactions.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Network payments must settle on (default: `base-sepolia`).
    #[serde(default = "default_network")]
    pub network: String,

    /// Address payments are made out to.
    #[serde(default)]
    pub pay_to: String,

    /// Priced routes, keyed `"METHOD /path"`.
    #[serde(default)]
    pub routes: HashMap<String, RouteEntry>,
}

/// Pricing for one route in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    /// Amount due, as a decimal string in the asset's smallest unit.
    pub max_amount_required: String,

    /// Optional description surfaced in 402 challenges.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    3002
}

fn default_rpc_url() -> String {
    "https://sepolia-preconf.base.org".to_owned()
}

fn default_network() -> String {
    "base-sepolia".to_owned()
}

impl ServerConfig {
    /// Loads configuration from the path in the `CONFIG` environment
    /// variable, falling back to `config.toml`. A missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = std::env::var("CONFIG").unwrap_or_else(|_| "config.toml".to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = if Path::new(path).exists() {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };

        let expanded = expand_env_vars(&content);
        let mut config: Self = toml::from_str(&expanded)?;

        if let Ok(host) = std::env::var("HOST")
            && let Ok(addr) = host.parse()
        {
            config.host = addr;
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }
        if let Ok(pay_to) = std::env::var("PAY_TO") {
            config.pay_to = pay_to;
        }

        Ok(config)
    }
}

/// Expands `$VAR` and `${VAR}` references from the process environment.
/// Unresolved references are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            name.push(c);
            chars.next();
        }

        if name.is_empty() {
            result.push('$');
            if braced {
                result.push('{');
            }
        } else if let Ok(value) = std::env::var(&name) {
            result.push_str(&value);
        } else {
            result.push('$');
            if braced {
                result.push('{');
            }
            result.push_str(&name);
            if braced {
                result.push('}');
            }
        }
    }

    result
}
