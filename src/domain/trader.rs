//! Watched trader identity.

use serde::Deserialize;

/// A trader whose fills are watched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Trader {
    /// Proxy wallet address (`0x` + 40 hex digits).
    #[serde(default)]
    pub address: String,
    /// Display name, also used for the profile URL.
    #[serde(default)]
    pub name: String,
}

impl Trader {
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }

    /// Profile page for this trader on the given site.
    #[must_use]
    pub fn profile_url(&self, site_url: &str) -> String {
        format!("{}/@{}", site_url.trim_end_matches('/'), self.name)
    }
}

/// Check that `address` looks like an EVM address: `0x` followed by 40 hex digits.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_address() {
        assert!(is_valid_address(
            "0xdB27bf2ac5D428a9c63dbc914611036855a6c56e"
        ));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("db27bf2ac5d428a9c63dbc914611036855a6c56e"));
        assert!(!is_valid_address("0xdb27bf2ac5d428a9c63dbc914611036855a6c56"));
        assert!(!is_valid_address("0xzb27bf2ac5d428a9c63dbc914611036855a6c56e"));
    }

    #[test]
    fn profile_url_ignores_trailing_slash() {
        let trader = Trader::new("0x0", "whale");
        assert_eq!(
            trader.profile_url("https://polymarket.com/"),
            "https://polymarket.com/@whale"
        );
    }
}
