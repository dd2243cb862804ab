// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge resource kinds and their records.
//!
//! Every resource the bridge exposes (lights, groups, schedules, scenes,
//! sensors, rules) is represented by the same [`Record`] type. The kind tag
//! only decides how identifiers are parsed, where the collection lives, and
//! how the record prints.

mod record;

pub use record::{Collection, Record};

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::ParseError;

/// Identifier type of a resource kind.
///
/// Lights, groups, schedules, sensors and rules use integers; scenes use
/// strings.
pub trait ResourceId: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync {
    /// Converts a collection key sent by the bridge.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidIdentifier` if the key does not convert.
    fn parse_id(kind: &'static str, raw: &str) -> Result<Self, ParseError>;

    /// Renders the identifier as a URL path segment.
    fn path_segment(&self) -> String;
}

impl ResourceId for u32 {
    fn parse_id(kind: &'static str, raw: &str) -> Result<Self, ParseError> {
        raw.parse().map_err(|_| ParseError::InvalidIdentifier {
            kind,
            id: raw.to_string(),
        })
    }

    fn path_segment(&self) -> String {
        self.to_string()
    }
}

impl ResourceId for String {
    fn parse_id(_kind: &'static str, raw: &str) -> Result<Self, ParseError> {
        Ok(raw.to_string())
    }

    fn path_segment(&self) -> String {
        urlencoding::encode(self).into_owned()
    }
}

/// A kind of bridge resource.
pub trait ResourceKind: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    /// Identifier type.
    type Id: ResourceId;

    /// Display name, used when printing records.
    const NAME: &'static str;

    /// Collection endpoint, relative to the credential prefix.
    const PATH: &'static str;

    /// Name of the structural identifier field.
    const ID_FIELD: &'static str;
}

macro_rules! resource_kind {
    ($(#[$meta:meta])* $kind:ident, $id:ty, $path:literal, $id_field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $kind;

        impl ResourceKind for $kind {
            type Id = $id;
            const NAME: &'static str = stringify!($kind);
            const PATH: &'static str = $path;
            const ID_FIELD: &'static str = $id_field;
        }
    };
}

resource_kind!(
    /// A light bulb or fixture.
    Light, u32, "/lights", "light_id"
);
resource_kind!(
    /// A group of lights.
    Group, u32, "/groups", "group_id"
);
resource_kind!(
    /// A timed command.
    Schedule, u32, "/schedules", "schedule_id"
);
resource_kind!(
    /// A stored set of light states.
    Scene, String, "/scenes", "scene_id"
);
resource_kind!(
    /// A switch, motion sensor or virtual sensor.
    Sensor, u32, "/sensors", "sensor_id"
);
resource_kind!(
    /// A condition/action rule.
    Rule, u32, "/rules", "rule_id"
);

/// Identifier of the group every bridge has implicitly.
pub const ALL_LIGHTS_GROUP_ID: u32 = 0;

/// Name given to the implicit all-lights group.
pub const ALL_LIGHTS_GROUP_NAME: &str = "All Lights";

/// Suffix appended to derived scene identifiers.
const SCENE_ID_SUFFIX: &str = "-on-0";

/// Derives the identifier under which a scene with this name is stored.
///
/// The identifier is the first 9 hex digits of the SHA-256 of the UTF-8
/// name followed by `-on-0`, so the same name always maps to the same scene.
///
/// # Examples
///
/// ```
/// use hugh_lib::resource::scene_id_for_name;
///
/// let id = scene_id_for_name("Evening");
/// assert_eq!(id.len(), 9 + "-on-0".len());
/// assert!(id.ends_with("-on-0"));
/// assert_eq!(id, scene_id_for_name("Evening"));
/// ```
#[must_use]
pub fn scene_id_for_name(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}{SCENE_ID_SUFFIX}", &digest[..9])
}

/// Converts light identifiers to the string list the bridge expects.
pub(crate) fn light_id_list(lights: &[u32]) -> Value {
    Value::Array(
        lights
            .iter()
            .map(|id| Value::String(id.to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_identifiers_parse() {
        assert_eq!(u32::parse_id("Light", "12").unwrap(), 12);
    }

    #[test]
    fn integer_identifiers_reject_text() {
        let err = u32::parse_id("Light", "abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidIdentifier {
                kind: "Light",
                id: "abc".to_string()
            }
        );
    }

    #[test]
    fn string_identifiers_are_kept() {
        assert_eq!(
            String::parse_id("Scene", "3e9a1f0b2-on-0").unwrap(),
            "3e9a1f0b2-on-0"
        );
    }

    #[test]
    fn string_identifiers_are_escaped_in_paths() {
        assert_eq!("a b/c".to_string().path_segment(), "a%20b%2Fc");
    }

    #[test]
    fn kind_constants() {
        assert_eq!(Light::NAME, "Light");
        assert_eq!(Group::PATH, "/groups");
        assert_eq!(Scene::ID_FIELD, "scene_id");
        assert_eq!(Rule::PATH, "/rules");
    }

    #[test]
    fn scene_id_matches_sha256_prefix() {
        let digest = hex::encode(Sha256::digest("Evening".as_bytes()));
        assert_eq!(scene_id_for_name("Evening"), format!("{}-on-0", &digest[..9]));
    }

    #[test]
    fn scene_id_is_deterministic() {
        let first = scene_id_for_name("Evening");
        for _ in 0..3 {
            assert_eq!(scene_id_for_name("Evening"), first);
        }
        assert_ne!(scene_id_for_name("Morning"), first);
        assert!(first[..9].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn light_ids_become_strings() {
        assert_eq!(light_id_list(&[1, 4]), json!(["1", "4"]));
    }
}
