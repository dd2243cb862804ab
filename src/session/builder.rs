// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session builder.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::observer::{SessionObserver, TracingObserver};
use crate::protocol::{PairingPolicy, SessionConfig};
use crate::session::Session;

/// Builder for creating bridge sessions.
///
/// This builder can be created in two ways:
/// - `Session::builder("host")` - Simple host string
/// - `Session::with_config(SessionConfig::new("host").with_port(8080))` - Advanced configuration
///
/// # Examples
///
/// ```
/// use hugh_lib::Session;
/// use hugh_lib::protocol::PairingPolicy;
/// use std::time::Duration;
///
/// # fn example() -> hugh_lib::Result<()> {
/// // Without a credential: call `pair()` before anything else
/// let session = Session::builder("192.168.1.2").build()?;
/// assert!(session.credential().is_none());
///
/// // With a stored credential and a shorter pairing window
/// let session = Session::builder("192.168.1.2")
///     .with_credential("83b7780291a6ceffbe0bd049104df")
///     .with_pairing_policy(PairingPolicy::new(Duration::from_secs(5), 3))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    config: SessionConfig,
    credential: Option<String>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl SessionBuilder {
    pub(crate) fn new(config: SessionConfig) -> Self {
        Self {
            config,
            credential: None,
            observer: None,
        }
    }

    /// Sets a previously obtained credential, skipping pairing.
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets the client identifier sent when pairing.
    #[must_use]
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.config = self.config.with_device_type(device_type);
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the pairing policy.
    #[must_use]
    pub fn with_pairing_policy(mut self, pairing: PairingPolicy) -> Self {
        self.config = self.config.with_pairing_policy(pairing);
        self
    }

    /// Sets the observer receiving session events.
    ///
    /// Defaults to [`TracingObserver`].
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Builds the session. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the address is empty or the HTTP client cannot be created.
    pub fn build(self) -> Result<Session> {
        let client = self.config.build_client()?;
        let observer: Arc<dyn SessionObserver> = match self.observer {
            Some(observer) => observer,
            None => Arc::new(TracingObserver),
        };

        Ok(Session::new(self.config, client, self.credential, observer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};

    #[test]
    fn builder_defaults() {
        let session = Session::builder("192.168.1.2").build().unwrap();
        assert!(session.credential().is_none());
        assert_eq!(session.config().device_type(), "hugh_lib");
        assert_eq!(session.config().pairing(), PairingPolicy::default());
    }

    #[test]
    fn builder_with_all_options() {
        let builder = Session::builder("192.168.1.2")
            .with_credential("token")
            .with_device_type("kitchen-panel")
            .with_port(8080)
            .with_timeout(Duration::from_secs(2))
            .with_pairing_policy(PairingPolicy::new(Duration::from_millis(1), 2));

        assert_eq!(builder.config().base_url(), "http://192.168.1.2:8080");

        let session = builder.build().unwrap();
        assert_eq!(session.credential().as_deref(), Some("token"));
        assert_eq!(session.config().device_type(), "kitchen-panel");
        assert_eq!(session.config().timeout(), Some(Duration::from_secs(2)));
        assert_eq!(session.config().pairing().max_attempts(), 2);
    }

    #[test]
    fn builder_from_config() {
        let config = SessionConfig::new("bridge.local").with_device_type("panel");
        let session = Session::with_config(config).build().unwrap();
        assert_eq!(session.config().host(), "bridge.local");
    }

    #[test]
    fn builder_rejects_empty_host() {
        let result = Session::builder("").build();
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::InvalidAddress(_)))
        ));
    }
}
