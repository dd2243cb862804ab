// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol of the bridge.
//!
//! The bridge answers writes and failures with a list of result objects,
//! each holding either a `success` or an `error` entry:
//!
//! ```json
//! [{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]
//! [{"success": {"username": "83b7780291a6ceffbe0bd049104df"}}]
//! ```
//!
//! Only the first entry is ever inspected. Reads answer with plain objects.

mod http;

pub use http::{HttpClient, PairingPolicy, SessionConfig};

use serde_json::Value;

use crate::error::BridgeError;

/// Classification of a bridge response by its first result entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeReply<'a> {
    /// The first entry carries a `success` payload.
    Success(&'a Value),
    /// The first entry carries an `error` payload.
    Error(BridgeError),
    /// Anything else: plain objects, empty lists, lists of other entries.
    Data(&'a Value),
}

impl<'a> BridgeReply<'a> {
    /// Classifies a parsed response.
    ///
    /// # Examples
    ///
    /// ```
    /// use hugh_lib::protocol::BridgeReply;
    /// use serde_json::json;
    ///
    /// let body = json!([{"error": {"type": 1, "description": "unauthorized user"}}]);
    /// match BridgeReply::classify(&body) {
    ///     BridgeReply::Error(err) => assert!(err.is_unauthorized()),
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        let Some(first) = value.as_array().and_then(|entries| entries.first()) else {
            return Self::Data(value);
        };

        if let Some(error) = first.get("error") {
            Self::Error(BridgeError::new(error.clone()))
        } else if let Some(success) = first.get("success") {
            Self::Success(success)
        } else {
            Self::Data(value)
        }
    }
}
