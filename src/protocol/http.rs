// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport to the bridge.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::TransportError;

// ============================================================================
// PairingPolicy - How long to wait for the link button
// ============================================================================

/// Retry policy for the pairing handshake.
///
/// The bridge refuses to pair until its physical link button is pressed, so
/// pairing is attempted several times with a fixed delay in between.
///
/// # Examples
///
/// ```
/// use hugh_lib::protocol::PairingPolicy;
/// use std::time::Duration;
///
/// let policy = PairingPolicy::default();
/// assert_eq!(policy.retry_delay(), Duration::from_secs(10));
/// assert_eq!(policy.max_attempts(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPolicy {
    retry_delay: Duration,
    max_attempts: u32,
}

impl PairingPolicy {
    /// Default delay between pairing attempts.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
    /// Default number of pairing attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

    /// Creates a pairing policy.
    #[must_use]
    pub const fn new(retry_delay: Duration, max_attempts: u32) -> Self {
        Self {
            retry_delay,
            max_attempts,
        }
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for PairingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETRY_DELAY, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

// ============================================================================
// SessionConfig - Connection parameters for a bridge session
// ============================================================================

/// Configuration for a bridge session.
///
/// The bridge speaks plain HTTP on the local network. Each call is an
/// independent request; nothing is kept between calls except the credential.
///
/// # Examples
///
/// ```
/// use hugh_lib::protocol::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::new("192.168.1.2")
///     .with_port(8080)
///     .with_device_type("living-room-panel")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.2:8080");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    port: u16,
    device_type: String,
    timeout: Option<Duration>,
    pairing: PairingPolicy,
}

impl SessionConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default client identifier sent when pairing.
    pub const DEFAULT_DEVICE_TYPE: &'static str = "hugh_lib";

    /// Creates a new configuration for the specified bridge address.
    ///
    /// A leading `http://` and trailing slashes are accepted and dropped. A
    /// trailing `:port` is split off into the port, so a later
    /// [`with_port`](Self::with_port) replaces it.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the bridge, optionally with a port
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host
            .strip_prefix("http://")
            .unwrap_or(&host)
            .trim_end_matches('/');

        let (host, port) = match host.rsplit_once(':') {
            Some((name, port)) if !name.contains(':') => match port.parse::<u16>() {
                Ok(port) => (name, port),
                Err(_) => (host, Self::DEFAULT_PORT),
            },
            _ => (host, Self::DEFAULT_PORT),
        };

        Self {
            host: host.to_string(),
            port,
            device_type: Self::DEFAULT_DEVICE_TYPE.to_string(),
            timeout: None,
            pairing: PairingPolicy::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the client identifier sent as `devicetype` when pairing.
    #[must_use]
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// Sets a request timeout. Without one the transport default applies.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the pairing policy used by `Session::pair` and re-authentication.
    #[must_use]
    pub fn with_pairing_policy(mut self, pairing: PairingPolicy) -> Self {
        self.pairing = pairing;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Returns the request timeout, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the pairing policy.
    #[must_use]
    pub fn pairing(&self) -> PairingPolicy {
        self.pairing
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn build_client(&self) -> Result<HttpClient, TransportError> {
        if self.host.is_empty() {
            return Err(TransportError::InvalidAddress(
                "host is required".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
        })
    }
}

// ============================================================================
// HttpClient - JSON over HTTP
// ============================================================================

/// HTTP client that exchanges JSON documents with the bridge.
///
/// It knows nothing about credentials or bridge error objects; it only
/// turns a method, a path and an optional body into a parsed JSON value.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Returns the base URL of the bridge.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and parses the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails, the status is not a
    /// success, or the body is not JSON.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = self.build_url(path);

        tracing::debug!(
            method = %method,
            path = %redact_credential(path),
            "Sending HTTP request"
        );

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(TransportError::Http)?;

        tracing::debug!(body = %text, "Received HTTP response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(TransportError::InvalidJson)
    }
}

/// Masks the credential segment of an `/api/<credential>/...` path for logs.
fn redact_credential(path: &str) -> String {
    match path.strip_prefix("/api/") {
        Some(rest) => match rest.split_once('/') {
            Some((_, tail)) => format!("/api/<credential>/{tail}"),
            None => "/api/<credential>".to_string(),
        },
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_default_values() {
        let config = SessionConfig::new("192.168.1.2");
        assert_eq!(config.host(), "192.168.1.2");
        assert_eq!(config.port(), 80);
        assert_eq!(config.device_type(), "hugh_lib");
        assert!(config.timeout().is_none());
        assert_eq!(config.pairing(), PairingPolicy::default());
    }

    #[test]
    fn session_config_strips_scheme() {
        let config = SessionConfig::new("http://192.168.1.2/");
        assert_eq!(config.host(), "192.168.1.2");
        assert_eq!(config.base_url(), "http://192.168.1.2");
    }

    #[test]
    fn session_config_base_url_custom_port() {
        let config = SessionConfig::new("192.168.1.2").with_port(8080);
        assert_eq!(config.base_url(), "http://192.168.1.2:8080");
    }

    #[test]
    fn session_config_host_with_port() {
        let config = SessionConfig::new("127.0.0.1:4321");
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 4321);
        assert_eq!(config.base_url(), "http://127.0.0.1:4321");
    }

    #[test]
    fn session_config_with_port_replaces_port_in_host() {
        let config = SessionConfig::new("http://127.0.0.1:4321/").with_port(8080);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");

        let config = SessionConfig::new("bridge.local:80").with_port(8080);
        assert_eq!(config.base_url(), "http://bridge.local:8080");
    }

    #[test]
    fn session_config_keeps_unparsable_port_in_host() {
        let config = SessionConfig::new("bridge.local:http");
        assert_eq!(config.host(), "bridge.local:http");
        assert_eq!(config.port(), 80);
    }

    #[test]
    fn session_config_builder_chain() {
        let policy = PairingPolicy::new(Duration::from_millis(5), 2);
        let config = SessionConfig::new("bridge.local")
            .with_device_type("panel")
            .with_timeout(Duration::from_secs(3))
            .with_pairing_policy(policy);

        assert_eq!(config.device_type(), "panel");
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.pairing().max_attempts(), 2);
        assert_eq!(config.pairing().retry_delay(), Duration::from_millis(5));
    }

    #[test]
    fn build_client_rejects_empty_host() {
        let result = SessionConfig::new("").build_client();
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[test]
    fn build_client_builds_url() {
        let client = SessionConfig::new("10.0.0.5").build_client().unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5");
        assert_eq!(client.build_url("/api"), "http://10.0.0.5/api");
    }

    #[test]
    fn redact_credential_masks_credential_segment() {
        assert_eq!(
            redact_credential("/api/83b7780291a6ceffbe0bd049104df/lights/1/state"),
            "/api/<credential>/lights/1/state"
        );
        assert_eq!(redact_credential("/api/secret"), "/api/<credential>");
        assert_eq!(redact_credential("/api//config"), "/api/<credential>/config");
        assert_eq!(redact_credential("/api"), "/api");
    }
}
