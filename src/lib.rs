// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hugh_lib` - A Rust client for Hue-style lighting bridges.
//!
//! This library talks to a bridge's local HTTP API: it pairs with the bridge
//! to obtain a credential, sends authenticated requests, and exposes the
//! bridge's resources as generic records.
//!
//! # Supported Features
//!
//! - **Pairing**: link-button handshake with retry and delay
//! - **Re-authentication**: one transparent re-pair and retry when the
//!   bridge rejects the credential
//! - **Resources**: lights, groups, schedules, scenes, sensors and rules as
//!   [`Record`]s, with create, modify and delete
//! - **Actions**: light and group state changes, scene light states,
//!   whitelist revocation
//!
//! The bridge address is supplied by the caller; there is no discovery, no
//! caching of bridge state, and no persistence of credentials.
//!
//! # Quick Start
//!
//! ```no_run
//! use hugh_lib::Session;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> hugh_lib::Result<()> {
//!     let session = Session::builder("192.168.1.2").build()?;
//!
//!     // Press the link button on the bridge while this runs
//!     if !session.pair().await? {
//!         eprintln!("link button was not pressed");
//!         return Ok(());
//!     }
//!
//!     for (id, light) in session.lights().await? {
//!         println!("{id}: {light}");
//!     }
//!
//!     // Turn every light on through the implicit group 0
//!     session.group_action(0, &json!({"on": true})).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Editing a record
//!
//! ```no_run
//! use hugh_lib::Session;
//! use serde_json::json;
//!
//! # async fn example(session: &Session) -> hugh_lib::Result<()> {
//! let mut schedules = session.schedules().await?;
//! if let Some(wake_up) = schedules.get_mut("1") {
//!     wake_up.set("localtime", json!("W124/T07:00:00"))?;
//!     session.modify(wake_up).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod observer;
pub mod protocol;
pub mod resource;
mod session;

pub use error::{BridgeError, Error, FieldError, ParseError, Result, TransportError};
pub use observer::{SessionObserver, TracingObserver};
pub use protocol::{PairingPolicy, SessionConfig};
pub use resource::{
    Collection, Group, Light, Record, ResourceId, ResourceKind, Rule, Scene, Schedule, Sensor,
    scene_id_for_name,
};
pub use session::{Session, SessionBuilder};
