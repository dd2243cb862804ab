// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated session with a bridge.
//!
//! A [`Session`] owns the bridge address and the credential. It runs the
//! pairing handshake and sends every authenticated request, pairing again
//! once when the bridge stops accepting the credential.
//!
//! # Pairing
//!
//! ```no_run
//! use hugh_lib::Session;
//!
//! # async fn example() -> hugh_lib::Result<()> {
//! let session = Session::builder("192.168.1.2").build()?;
//!
//! // Blocks for up to a minute while the user presses the link button.
//! if session.pair().await? {
//!     println!("store this credential: {:?}", session.credential());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Reusing a credential
//!
//! ```no_run
//! use hugh_lib::Session;
//! use serde_json::json;
//!
//! # async fn example() -> hugh_lib::Result<()> {
//! let session = Session::builder("192.168.1.2")
//!     .with_credential("83b7780291a6ceffbe0bd049104df")
//!     .build()?;
//!
//! session.light_action(1, &json!({"on": true, "bri": 254})).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Calls on one session run one request at a time and never in parallel.
//! The credential sits behind a lock, so a session may be shared, but two
//! tasks that both trigger re-pairing will each run a full handshake.

mod builder;
mod resources;

pub use builder::SessionBuilder;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Method;
use serde_json::{Value, json};

use crate::error::{BridgeError, Error, Result};
use crate::observer::SessionObserver;
use crate::protocol::{BridgeReply, HttpClient, SessionConfig};

/// Root endpoint of the bridge API; pairing posts here.
const API_ROOT: &str = "/api";

/// First attempt plus one retry after re-pairing.
const MAX_REQUEST_ATTEMPTS: u32 = 2;

/// A session with one bridge.
pub struct Session {
    config: SessionConfig,
    client: HttpClient,
    credential: RwLock<Option<String>>,
    observer: Arc<dyn SessionObserver>,
}

impl Session {
    /// Returns a builder for a session with the bridge at `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(SessionConfig::new(host))
    }

    /// Returns a builder for a session with a prepared configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    pub(crate) fn new(
        config: SessionConfig,
        client: HttpClient,
        credential: Option<String>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            config,
            client,
            credential: RwLock::new(credential),
            observer,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.credential.read().clone()
    }

    /// Replaces the credential.
    pub fn set_credential(&self, credential: impl Into<String>) {
        *self.credential.write() = Some(credential.into());
    }

    /// Runs the pairing handshake with the configured pairing policy.
    ///
    /// # Errors
    ///
    /// See [`authenticate`](Self::authenticate).
    pub async fn pair(&self) -> Result<bool> {
        let policy = self.config.pairing();
        self.authenticate(policy.retry_delay(), policy.max_attempts())
            .await
    }

    /// Runs the pairing handshake.
    ///
    /// Posts the client identifier to the bridge up to `max_attempts` times,
    /// sleeping `retry_delay` between attempts. Returns `Ok(true)` as soon as
    /// the bridge hands out a credential, which then replaces the session's
    /// credential. While the link button has not been pressed the bridge
    /// answers with error 101, which is reported to the observer and retried.
    /// Returns `Ok(false)` when every attempt got error 101.
    ///
    /// # Errors
    ///
    /// - `Error::Auth` if the bridge answers with any other error, or with
    ///   something other than a result list holding an error or a username;
    ///   the payload is the bridge's reply as received
    /// - `Error::Transport` if the bridge cannot be reached
    pub async fn authenticate(&self, retry_delay: Duration, max_attempts: u32) -> Result<bool> {
        let body = json!({ "devicetype": self.config.device_type() });

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(retry_delay).await;
            }

            let response = self.client.send(Method::POST, API_ROOT, Some(&body)).await?;

            match BridgeReply::classify(&response) {
                BridgeReply::Success(success) => {
                    let Some(username) = success.get("username").and_then(Value::as_str) else {
                        return Err(Error::Auth(BridgeError::new(response.clone())));
                    };
                    self.set_credential(username);
                    self.observer.on_paired(attempt);
                    return Ok(true);
                }
                BridgeReply::Error(err) if err.is_link_button_not_pressed() => {
                    self.observer.on_link_button_pending(attempt, max_attempts);
                }
                BridgeReply::Error(err) => return Err(Error::Auth(err)),
                BridgeReply::Data(other) => {
                    return Err(Error::Auth(BridgeError::new(other.clone())));
                }
            }
        }

        Ok(false)
    }

    /// Sends an authenticated request and returns the parsed response.
    ///
    /// `path` is relative to the credential prefix and starts with `/`
    /// (`/lights`, `/groups/3/action`); an empty path addresses the whole
    /// datastore.
    ///
    /// If the bridge answers with error 1 (unauthorized user), the session
    /// pairs again once and repeats the request once with the new
    /// credential. The answer is returned as-is otherwise.
    ///
    /// # Errors
    ///
    /// - `Error::Api` if the bridge reports an error, including a second
    ///   rejection after re-pairing
    /// - `Error::Auth` if re-pairing fails
    /// - `Error::Transport` if the bridge cannot be reached or sends non-JSON
    pub async fn request(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let mut attempt = 1;

        loop {
            self.observer.on_request(&method, path);
            let response = self
                .client
                .send(method.clone(), &self.api_path(path), body)
                .await?;

            let rejection = match BridgeReply::classify(&response) {
                BridgeReply::Error(err) => Some(err),
                _ => None,
            };
            let Some(err) = rejection else {
                return Ok(response);
            };

            if !err.is_unauthorized() || attempt >= MAX_REQUEST_ATTEMPTS {
                return Err(Error::Api(err));
            }

            self.observer.on_reauthenticate(path);
            if !self.pair().await? {
                return Err(Error::Auth(err));
            }
            attempt += 1;
        }
    }

    /// Sends an authenticated GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(path, Method::GET, None).await
    }

    /// Sends an authenticated POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(path, Method::POST, Some(body)).await
    }

    /// Sends an authenticated PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(path, Method::PUT, Some(body)).await
    }

    /// Sends an authenticated DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(path, Method::DELETE, None).await
    }

    fn api_path(&self, path: &str) -> String {
        let credential = self.credential.read();
        format!("{API_ROOT}/{}{path}", credential.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("paired", &self.credential.read().is_some())
            .finish_non_exhaustive()
    }
}
