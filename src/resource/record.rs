// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic field-map record.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{FieldError, ParseError};
use crate::resource::ResourceKind;

/// Resources of one kind, keyed by identifier as sent by the bridge.
pub type Collection<K> = BTreeMap<String, Record<K>>;

/// One bridge resource: an identifier plus the fields exactly as the bridge
/// reported them.
///
/// Fields are read and written by name. Only fields the bridge sent can be
/// written with [`set`](Self::set); new ones need an explicit
/// [`insert`](Self::insert). The identifier is structural: it lives outside
/// the field map and cannot be overwritten.
///
/// # Examples
///
/// ```
/// use hugh_lib::resource::{Light, Record};
/// use serde_json::json;
///
/// let mut light = Record::<Light>::from_value(3, json!({"name": "Desk", "state": {"on": false}})).unwrap();
/// assert_eq!(light.get("name").unwrap(), "Desk");
///
/// light.set("name", json!("Desk lamp")).unwrap();
/// assert!(light.get("hue").is_err());
/// assert!(light.set("light_id", json!(4)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K: ResourceKind> {
    id: K::Id,
    fields: Map<String, Value>,
    kind: PhantomData<K>,
}

impl<K: ResourceKind> Record<K> {
    /// Creates a record from an identifier and a field map.
    #[must_use]
    pub fn new(id: K::Id, fields: Map<String, Value>) -> Self {
        Self {
            id,
            fields,
            kind: PhantomData,
        }
    }

    /// Creates a record from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if `value` is not an object.
    pub fn from_value(id: K::Id, value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(fields) => Ok(Self::new(id, fields)),
            other => Err(ParseError::UnexpectedFormat(format!(
                "{} {id} is not an object: {other}",
                K::NAME
            ))),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &K::Id {
        &self.id
    }

    /// Returns the name of the identifier field (`light_id`, `scene_id`, ...).
    #[must_use]
    pub fn id_field(&self) -> &'static str {
        K::ID_FIELD
    }

    /// Reads a field.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::NoSuchField` if the record has no such field.
    pub fn get(&self, name: &str) -> Result<&Value, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::NoSuchField(name.to_string()))
    }

    /// Returns whether the record has a field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Overwrites an existing field and returns its previous value.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::ReadOnly` for the identifier field and
    /// `FieldError::NoSuchField` if the field does not exist.
    pub fn set(&mut self, name: &str, value: Value) -> Result<Value, FieldError> {
        if name == K::ID_FIELD {
            return Err(FieldError::ReadOnly(name.to_string()));
        }
        match self.fields.get_mut(name) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(FieldError::NoSuchField(name.to_string())),
        }
    }

    /// Adds or overwrites a field.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::ReadOnly` for the identifier field.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, FieldError> {
        let name = name.into();
        if name == K::ID_FIELD {
            return Err(FieldError::ReadOnly(name));
        }
        Ok(self.fields.insert(name, value))
    }

    /// Returns the field map.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record and returns the field map.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Returns the fields as the JSON object sent back to the bridge.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl<K: ResourceKind> Serialize for Record<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<K: ResourceKind> From<Record<K>> for Value {
    fn from(record: Record<K>) -> Self {
        Value::Object(record.fields)
    }
}

impl<K: ResourceKind> fmt::Display for Record<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", K::NAME, Value::Object(self.fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Group, Light, Scene};
    use serde_json::json;

    fn desk_lamp() -> Record<Light> {
        Record::from_value(
            1,
            json!({
                "name": "Desk",
                "type": "Extended color light",
                "state": {"on": true, "bri": 200, "xy": [0.31, 0.32]}
            }),
        )
        .unwrap()
    }

    #[test]
    fn get_existing_field() {
        let light = desk_lamp();
        assert_eq!(light.get("name").unwrap(), &json!("Desk"));
        assert_eq!(light.get("state").unwrap()["bri"], json!(200));
        assert_eq!(*light.id(), 1);
    }

    #[test]
    fn get_missing_field() {
        let light = desk_lamp();
        assert_eq!(
            light.get("hue").unwrap_err(),
            FieldError::NoSuchField("hue".to_string())
        );
    }

    #[test]
    fn identifier_is_not_a_field() {
        let light = desk_lamp();
        assert_eq!(light.id_field(), "light_id");
        assert!(light.get("light_id").is_err());
        assert!(!light.contains("light_id"));
    }

    #[test]
    fn set_existing_field_in_place() {
        let mut light = desk_lamp();
        let previous = light.set("name", json!("Desk lamp")).unwrap();
        assert_eq!(previous, json!("Desk"));
        assert_eq!(light.get("name").unwrap(), &json!("Desk lamp"));
        assert_eq!(light.fields().len(), 3);
    }

    #[test]
    fn set_missing_field_fails() {
        let mut light = desk_lamp();
        assert_eq!(
            light.set("effect", json!("colorloop")).unwrap_err(),
            FieldError::NoSuchField("effect".to_string())
        );
        assert!(!light.contains("effect"));
    }

    #[test]
    fn identifier_field_is_read_only() {
        let mut light = desk_lamp();
        assert_eq!(
            light.set("light_id", json!(9)).unwrap_err(),
            FieldError::ReadOnly("light_id".to_string())
        );
        assert!(light.insert("light_id", json!(9)).is_err());
        assert_eq!(*light.id(), 1);
    }

    #[test]
    fn insert_adds_field() {
        let mut light = desk_lamp();
        assert_eq!(light.insert("effect", json!("none")).unwrap(), None);
        assert_eq!(light.get("effect").unwrap(), &json!("none"));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        let result = Record::<Group>::from_value(2, json!(["1", "2"]));
        assert!(matches!(result, Err(ParseError::UnexpectedFormat(_))));
    }

    #[test]
    fn fields_survive_json_round_trip() {
        let light = desk_lamp();
        let text = serde_json::to_string(&light).unwrap();
        let parsed: Map<String, Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(&parsed, light.fields());
        assert_eq!(Value::from(light.clone()), light.to_json());
    }

    #[test]
    fn display_uses_kind_name() {
        let scene = Record::<Scene>::from_value("abc-on-0".to_string(), json!({"name": "Evening"}))
            .unwrap();
        assert_eq!(scene.to_string(), r#"Scene{"name":"Evening"}"#);
    }
}
