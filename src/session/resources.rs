// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed access to bridge resources.
//!
//! Every accessor fetches fresh data; nothing is cached between calls.

use serde_json::{Map, Value, json};

use crate::error::{ParseError, Result};
use crate::resource::{
    ALL_LIGHTS_GROUP_ID, ALL_LIGHTS_GROUP_NAME, Collection, Group, Light, Record, ResourceId,
    ResourceKind, Rule, Scene, Schedule, Sensor, light_id_list, scene_id_for_name,
};
use crate::session::Session;

impl Session {
    /// Returns the full bridge datastore.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn state(&self) -> Result<Value> {
        self.get("").await
    }

    /// Returns the bridge configuration.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn bridge_config(&self) -> Result<Value> {
        self.get("/config").await
    }

    /// Fetches every resource of one kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the bridge does not answer with an object of
    /// objects or a key does not convert to the kind's identifier type, and
    /// the errors of [`request`](Self::request).
    pub async fn collection<K: ResourceKind>(&self) -> Result<Collection<K>> {
        let entries = match self.get(K::PATH).await? {
            Value::Object(entries) => entries,
            other => {
                return Err(ParseError::UnexpectedFormat(format!(
                    "{} is not an object: {other}",
                    K::PATH
                ))
                .into());
            }
        };

        let mut collection = Collection::new();
        for (key, fields) in entries {
            let id = K::Id::parse_id(K::NAME, &key)?;
            collection.insert(key, Record::from_value(id, fields)?);
        }
        Ok(collection)
    }

    /// Fetches all lights.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn lights(&self) -> Result<Collection<Light>> {
        self.collection().await
    }

    /// Fetches all groups, including group `"0"` ("All Lights").
    ///
    /// The bridge does not list group 0, so it is built here with its
    /// `lights` field holding the current lights, fetched in a second call.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn groups(&self) -> Result<Collection<Group>> {
        let mut groups = self.collection::<Group>().await?;

        let lights: Map<String, Value> = self
            .lights()
            .await?
            .into_iter()
            .map(|(id, light)| (id, Value::from(light)))
            .collect();

        let mut fields = Map::new();
        fields.insert("name".to_string(), json!(ALL_LIGHTS_GROUP_NAME));
        fields.insert("lights".to_string(), Value::Object(lights));

        groups.insert(
            ALL_LIGHTS_GROUP_ID.to_string(),
            Record::new(ALL_LIGHTS_GROUP_ID, fields),
        );
        Ok(groups)
    }

    /// Fetches all schedules.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn schedules(&self) -> Result<Collection<Schedule>> {
        self.collection().await
    }

    /// Fetches all scenes.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn scenes(&self) -> Result<Collection<Scene>> {
        self.collection().await
    }

    /// Fetches all sensors.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn sensors(&self) -> Result<Collection<Sensor>> {
        self.collection().await
    }

    /// Fetches all rules.
    ///
    /// # Errors
    ///
    /// See [`collection`](Self::collection).
    pub async fn rules(&self) -> Result<Collection<Rule>> {
        self.collection().await
    }

    /// Creates a resource from a record's fields (POST to the collection).
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn create<K: ResourceKind>(&self, record: &Record<K>) -> Result<Value> {
        self.post(K::PATH, &record.to_json()).await
    }

    /// Creates a resource from a raw JSON object.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn create_raw<K: ResourceKind>(&self, body: &Value) -> Result<Value> {
        self.post(K::PATH, body).await
    }

    /// Writes a record's fields back to the bridge (PUT to `<collection>/<id>`).
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn modify<K: ResourceKind>(&self, record: &Record<K>) -> Result<Value> {
        self.put(&resource_path::<K>(record.id()), &record.to_json())
            .await
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete_resource<K: ResourceKind>(&self, record: &Record<K>) -> Result<Value> {
        self.delete(&resource_path::<K>(record.id())).await
    }

    /// Creates a group of lights.
    ///
    /// Returns `Ok(None)` without contacting the bridge when `lights` is empty.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn create_group(&self, name: &str, lights: &[u32]) -> Result<Option<Value>> {
        if lights.is_empty() {
            return Ok(None);
        }
        let body = json!({ "name": name, "lights": light_id_list(lights) });
        self.post(Group::PATH, &body).await.map(Some)
    }

    /// Stores a scene under the identifier derived from its name.
    ///
    /// See [`scene_id_for_name`].
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn create_scene(&self, name: &str, lights: &[u32]) -> Result<Value> {
        let scene_id = scene_id_for_name(name);
        let body = json!({ "name": name, "lights": light_id_list(lights) });
        self.put(&resource_path::<Scene>(&scene_id), &body).await
    }

    /// Applies a state change to one light.
    ///
    /// The delta is sent unvalidated, e.g. `{"on": true, "bri": 254}`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn light_action(&self, light_id: u32, state: &Value) -> Result<Value> {
        self.put(&format!("{}/state", resource_path::<Light>(&light_id)), state)
            .await
    }

    /// Applies a state change to every light in a group.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn group_action(&self, group_id: u32, state: &Value) -> Result<Value> {
        self.put(&format!("{}/action", resource_path::<Group>(&group_id)), state)
            .await
    }

    /// Changes the state stored for one light in a scene.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn modify_scene_light(
        &self,
        scene_id: &str,
        light_id: u32,
        state: &Value,
    ) -> Result<Value> {
        let path = format!(
            "{}/lights/{}/state",
            resource_path::<Scene>(&scene_id.to_string()),
            light_id.path_segment()
        );
        self.put(&path, state).await
    }

    /// Revokes another client's credential.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete_whitelist_entry(&self, credential: &str) -> Result<Value> {
        self.delete(&format!(
            "/config/whitelist/{}",
            urlencoding::encode(credential)
        ))
        .await
    }
}

fn resource_path<K: ResourceKind>(id: &K::Id) -> String {
    format!("{}/{}", K::PATH, id.path_segment())
}
