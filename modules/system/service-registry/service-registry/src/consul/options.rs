//! Connection options understood by the Consul backend.

use std::net::Ipv6Addr;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::backend::BackendError;
use crate::config::ConnectionOptions;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8500;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Typed view of the opaque connection options map.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsulOptions {
    /// Agent host name or IP address.
    pub host: String,

    /// Agent HTTP API port.
    pub port: u16,

    /// Use HTTPS instead of plain HTTP.
    pub secure: bool,

    /// ACL token sent as `X-Consul-Token`.
    pub token: Option<SecretString>,

    /// Per-request deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ConsulOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            secure: false,
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ConsulOptions {
    /// Parse the opaque options map.
    ///
    /// # Errors
    /// Returns `BackendError::InvalidOptions` on unknown keys, wrongly typed
    /// values, an empty host, a host that carries a port, or a zero timeout.
    pub fn from_map(options: &ConnectionOptions) -> Result<Self, BackendError> {
        let parsed: Self = serde_json::from_value(serde_json::Value::Object(options.clone()))
            .map_err(|e| BackendError::InvalidOptions(e.to_string()))?;

        if parsed.host.trim().is_empty() {
            return Err(BackendError::InvalidOptions("host must not be empty".to_owned()));
        }
        if parsed.host.contains(':') && !is_ipv6_literal(&parsed.host) {
            return Err(BackendError::InvalidOptions(format!(
                "host '{}' must not include a port; set the `port` option instead",
                parsed.host
            )));
        }
        if parsed.timeout_ms == 0 {
            return Err(BackendError::InvalidOptions(
                "timeout_ms must be greater than zero".to_owned(),
            ));
        }
        Ok(parsed)
    }

    /// Agent base URL, e.g. `http://127.0.0.1:8500`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{scheme}://[{}]:{}", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}", self.host, self.port)
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn is_ipv6_literal(host: &str) -> bool {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<Ipv6Addr>().is_ok()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn options(value: serde_json::Value) -> ConnectionOptions {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let opts = ConsulOptions::from_map(&options(json!({"host": "consul.local"}))).unwrap();
        assert_eq!(opts.host, "consul.local");
        assert_eq!(opts.port, 8500);
        assert!(!opts.secure);
        assert!(opts.token.is_none());
        assert_eq!(opts.timeout(), Duration::from_secs(10));
        assert_eq!(opts.base_url(), "http://consul.local:8500");
    }

    #[test]
    fn test_secure_switches_scheme() {
        let opts = ConsulOptions::from_map(&options(json!({
            "host": "consul.local",
            "port": 8501,
            "secure": true
        })))
        .unwrap();
        assert_eq!(opts.base_url(), "https://consul.local:8501");
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let opts = ConsulOptions::from_map(&options(json!({"host": "::1"}))).unwrap();
        assert_eq!(opts.base_url(), "http://[::1]:8500");
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let opts = ConsulOptions::from_map(&options(json!({"token": "s3cr3t"}))).unwrap();
        assert_eq!(
            opts.token.as_ref().map(|t| t.expose_secret()),
            Some("s3cr3t")
        );
        assert!(!format!("{opts:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_rejects_host_with_port() {
        let err = ConsulOptions::from_map(&options(json!({"host": "consul:8500"}))).unwrap_err();
        match err {
            BackendError::InvalidOptions(message) => {
                assert!(message.contains("must not include a port"), "{message}");
            }
            other => panic!("expected InvalidOptions, got {other:?}"),
        }

        let opts = ConsulOptions::from_map(&options(json!({"host": "[fe80::1]"}))).unwrap();
        assert_eq!(opts.base_url(), "http://[fe80::1]:8500");
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = ConsulOptions::from_map(&options(json!({"hostname": "x"}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidOptions(_)));
    }

    #[test]
    fn test_rejects_wrong_type() {
        let err = ConsulOptions::from_map(&options(json!({"port": "eighty"}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidOptions(_)));
    }

    #[test]
    fn test_rejects_empty_host_and_zero_timeout() {
        let err = ConsulOptions::from_map(&options(json!({"host": ""}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidOptions(_)));

        let err = ConsulOptions::from_map(&options(json!({"timeout_ms": 0}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidOptions(_)));
    }
}
