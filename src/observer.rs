// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session event hooks.
//!
//! A [`Session`](crate::Session) reports what it does through the
//! [`SessionObserver`] it was built with. Every hook has a default body that
//! emits a `tracing` event, so an observer only overrides what it needs.
//!
//! # Examples
//!
//! ```
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use hugh_lib::observer::SessionObserver;
//!
//! #[derive(Default)]
//! struct ButtonPrompt {
//!     prompts: AtomicU32,
//! }
//!
//! impl SessionObserver for ButtonPrompt {
//!     fn on_link_button_pending(&self, attempt: u32, max_attempts: u32) {
//!         self.prompts.fetch_add(1, Ordering::Relaxed);
//!         println!("Press the bridge button ({attempt}/{max_attempts})");
//!     }
//! }
//! ```

use reqwest::Method;

/// Receives events from a session.
///
/// Hooks run synchronously on the calling task and must not block.
pub trait SessionObserver: Send + Sync {
    /// An authenticated request is about to be sent.
    fn on_request(&self, method: &Method, path: &str) {
        tracing::debug!(method = %method, path = %path, "Bridge request");
    }

    /// The bridge refused to pair because its link button was not pressed.
    fn on_link_button_pending(&self, attempt: u32, max_attempts: u32) {
        tracing::warn!(
            attempt,
            max_attempts,
            "Link button not pressed, go press the button on the bridge"
        );
    }

    /// Pairing succeeded and a new credential is in use.
    fn on_paired(&self, attempt: u32) {
        tracing::info!(attempt, "Paired with bridge");
    }

    /// The bridge rejected the credential; the session is pairing again.
    fn on_reauthenticate(&self, path: &str) {
        tracing::info!(path = %path, "Credential rejected, pairing again");
    }
}

/// Observer that only emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {}
