//! In-memory catalog
//!
//! Holds entities in their JSON wire form and applies saves the way the
//! server does: placeholders get GUIDs, relationship semantics are honoured
//! and explicit nulls clear attributes. Used for tests and the CLI's
//! `--offline` mode.

use crate::client::{CatalogClient, DeleteType};
use crate::response::{MutatedEntities, MutationResponse};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tessera_core::{Guid, Identity, Result, TesseraError};
use tessera_model::wire::{encode_for_save, APPEND_KEY, REMOVE_KEY};
use tessera_model::{Asset, Tag};
use tessera_search::{matches_request, sort_assets, IndexSearchRequest, SearchPage, SearchSource};
use tracing::debug;

#[derive(Debug, Default)]
struct Store {
    /// Entities in insertion order
    entities: Vec<Value>,
}

impl Store {
    fn position_by_guid(&self, guid: &str) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.get("guid").and_then(Value::as_str) == Some(guid))
    }

    fn position_by_qualified_name(&self, type_name: &str, qualified_name: &str) -> Option<usize> {
        self.entities.iter().position(|e| {
            e.get("typeName").and_then(Value::as_str) == Some(type_name)
                && qualified_name_of(e) == Some(qualified_name)
        })
    }

    fn guid_at(&self, index: usize) -> String {
        self.entities[index]
            .get("guid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Swap placeholders for assigned GUIDs and attach GUIDs to references
    /// that only carry a qualified name, when the target is known
    fn resolve_references(&self, entity: &mut Value, assignments: &BTreeMap<String, String>) {
        for section in ["attributes", APPEND_KEY, REMOVE_KEY] {
            let Some(Value::Object(attrs)) = entity.get_mut(section) else {
                continue;
            };
            for value in attrs.values_mut() {
                match value {
                    Value::Array(items) => {
                        for item in items.iter_mut() {
                            self.resolve_reference(item, assignments);
                        }
                    }
                    single => self.resolve_reference(single, assignments),
                }
            }
        }
    }

    fn resolve_reference(&self, reference: &mut Value, assignments: &BTreeMap<String, String>) {
        if !is_reference(reference) {
            return;
        }
        if let Some(guid) = reference.get("guid").and_then(Value::as_str) {
            if let Some(assigned) = assignments.get(guid) {
                reference["guid"] = json!(assigned);
            }
            return;
        }
        let type_name = reference.get("typeName").and_then(Value::as_str);
        let qualified_name = reference
            .pointer("/uniqueAttributes/qualifiedName")
            .and_then(Value::as_str);
        if let (Some(type_name), Some(qualified_name)) = (type_name, qualified_name) {
            if let Some(index) = self.position_by_qualified_name(type_name, qualified_name) {
                reference["guid"] = json!(self.guid_at(index));
            }
        }
    }
}

/// Where a save lands
enum Target {
    Existing(usize),
    New(String),
    /// A repeat of an asset created earlier in the same batch
    Repeat(String),
}

/// Type and qualified name of each asset created by the current batch,
/// with the GUID it was given
type Claimed = BTreeMap<(String, String), String>;

/// A catalog held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryClient {
    store: Mutex<Store>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with wire-form entities. Entities without a GUID
    /// (or with a placeholder) are given one; missing status means active.
    pub fn from_entities(entities: Vec<Value>) -> Result<Self> {
        let mut store = Store::default();
        for mut entity in entities {
            if entity.get("typeName").and_then(Value::as_str).is_none() {
                return Err(TesseraError::UnknownType("(missing typeName)".to_string()));
            }
            let has_guid = entity
                .get("guid")
                .and_then(Value::as_str)
                .is_some_and(|g| !Identity::parse(g).is_pending());
            if !has_guid {
                entity["guid"] = json!(Guid::generate().as_str());
            }
            if entity.get("status").is_none() {
                entity["status"] = json!("ACTIVE");
            }
            store.entities.push(entity);
        }
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    /// Load a fixture file: a JSON array of entities, or `{"entities": [...]}`
    pub fn from_fixture(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let entities = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("entities") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self::from_entities(entities)
    }

    /// Write the current state back as a fixture file
    pub fn write_fixture(&self, path: &Path) -> Result<()> {
        let store = self.lock()?;
        let content = serde_json::to_string_pretty(&json!({ "entities": store.entities }))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.entities.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored wire form of an entity
    pub fn raw(&self, guid: &str) -> Option<Value> {
        let store = self.lock().ok()?;
        store
            .position_by_guid(guid)
            .map(|i| store.entities[i].clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| TesseraError::Transport("in-memory store lock poisoned".to_string()))
    }

    fn target_for(
        store: &Store,
        payload: &Value,
        assignments: &mut BTreeMap<String, String>,
        claimed: &mut Claimed,
    ) -> Result<Target> {
        let type_name = payload
            .get("typeName")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let identity = payload.get("guid").and_then(Value::as_str).map(Identity::parse);

        if let Some(Identity::Assigned(guid)) = &identity {
            return store
                .position_by_guid(guid.as_str())
                .map(Target::Existing)
                .ok_or_else(|| not_found(guid.as_str()));
        }

        let qualified_name = qualified_name_of(payload);
        let existing =
            qualified_name.and_then(|qn| store.position_by_qualified_name(type_name, qn));
        let key = qualified_name.map(|qn| (type_name.to_string(), qn.to_string()));
        let target = match (existing, key.as_ref().and_then(|k| claimed.get(k))) {
            (Some(index), _) => Target::Existing(index),
            (None, Some(guid)) => Target::Repeat(guid.clone()),
            (None, None) => {
                let guid = Guid::generate().to_string();
                if let Some(key) = key {
                    claimed.insert(key, guid.clone());
                }
                Target::New(guid)
            }
        };

        if let Some(Identity::Pending(local)) = &identity {
            let guid = match &target {
                Target::Existing(index) => store.guid_at(*index),
                Target::New(guid) | Target::Repeat(guid) => guid.clone(),
            };
            assignments.insert(local.to_wire(), guid);
        }
        Ok(target)
    }
}

impl SearchSource for InMemoryClient {
    fn search(&self, request: &IndexSearchRequest) -> Result<SearchPage> {
        let store = self.lock()?;
        let mut found: Vec<Value> = store
            .entities
            .iter()
            .filter(|e| matches_request(request, e))
            .cloned()
            .collect();
        drop(store);

        sort_assets(&mut found, &request.dsl.sort);
        let approximate_count = found.len() as u64;
        let entities = found
            .into_iter()
            .skip(request.dsl.from)
            .take(request.dsl.size)
            .map(Asset::from_json)
            .collect::<Result<Vec<_>>>()?;
        debug!(matches = approximate_count, returned = entities.len(), "in-memory search");
        Ok(SearchPage {
            approximate_count,
            entities,
        })
    }
}

impl CatalogClient for InMemoryClient {
    fn get_by_guid(
        &self,
        guid: &str,
        _min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>> {
        let store = self.lock()?;
        store
            .position_by_guid(guid)
            .map(|i| decode_view(&store.entities[i], ignore_relationships))
            .transpose()
    }

    fn get_by_qualified_name(
        &self,
        type_name: &str,
        qualified_name: &str,
        _min_ext_info: bool,
        ignore_relationships: bool,
    ) -> Result<Option<Asset>> {
        let store = self.lock()?;
        store
            .position_by_qualified_name(type_name, qualified_name)
            .map(|i| decode_view(&store.entities[i], ignore_relationships))
            .transpose()
    }

    fn save(&self, assets: &[Asset], replace_tags: bool) -> Result<MutationResponse> {
        let payloads = assets
            .iter()
            .map(encode_for_save)
            .collect::<Result<Vec<_>>>()?;

        let mut store = self.lock()?;
        let mut assignments = BTreeMap::new();
        let mut claimed = Claimed::new();
        let targets = payloads
            .iter()
            .map(|p| Self::target_for(&store, p, &mut assignments, &mut claimed))
            .collect::<Result<Vec<_>>>()?;

        let mut mutated = MutatedEntities::default();
        // GUID to position in `mutated.create`
        let mut created = BTreeMap::new();
        for (mut payload, target) in payloads.into_iter().zip(targets) {
            store.resolve_references(&mut payload, &assignments);
            match target {
                Target::New(guid) => {
                    let entity = create_entity(payload, &guid);
                    created.insert(guid, mutated.create.len());
                    mutated.create.push(Asset::from_json(entity.clone())?);
                    store.entities.push(entity);
                }
                Target::Repeat(guid) => {
                    let index = store
                        .position_by_guid(&guid)
                        .ok_or_else(|| not_found(&guid))?;
                    merge_entity(&mut store.entities[index], payload, replace_tags);
                    if let Some(&position) = created.get(&guid) {
                        mutated.create[position] = Asset::from_json(store.entities[index].clone())?;
                    }
                }
                Target::Existing(index) => {
                    let before = store.entities[index].clone();
                    merge_entity(&mut store.entities[index], payload, replace_tags);
                    if store.entities[index] != before {
                        mutated
                            .update
                            .push(Asset::from_json(store.entities[index].clone())?);
                    }
                }
            }
        }

        debug!(
            created = mutated.create.len(),
            updated = mutated.update.len(),
            "in-memory save"
        );
        Ok(MutationResponse {
            mutated_entities: mutated,
            guid_assignments: assignments,
        })
    }

    fn add_tags(&self, type_name: &str, qualified_name: &str, tags: &[Tag]) -> Result<()> {
        let mut store = self.lock()?;
        let index = store
            .position_by_qualified_name(type_name, qualified_name)
            .ok_or_else(|| TesseraError::Api {
                status: 404,
                message: format!(
                    "Asset with qualifiedName {} of type {} does not exist",
                    qualified_name, type_name
                ),
            })?;

        let entity = &mut store.entities[index];
        let mut current = match entity.get_mut("classifications").map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        for tag in tags {
            let present = current
                .iter()
                .any(|t| t.get("typeName").and_then(Value::as_str) == Some(tag.type_name.as_str()));
            if !present {
                current.push(serde_json::to_value(tag)?);
            }
        }
        entity["classifications"] = Value::Array(current);
        Ok(())
    }

    fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse> {
        let mut store = self.lock()?;
        let mut mutated = MutatedEntities::default();
        for guid in guids {
            let index = store
                .position_by_guid(guid.as_str())
                .ok_or_else(|| not_found(guid.as_str()))?;
            match delete_type {
                DeleteType::Soft => {
                    store.entities[index]["status"] = json!("DELETED");
                    mutated
                        .delete
                        .push(Asset::from_json(store.entities[index].clone())?);
                }
                DeleteType::Hard | DeleteType::Purge => {
                    let removed = store.entities.remove(index);
                    mutated.delete.push(Asset::from_json(removed)?);
                }
            }
        }
        debug!(%delete_type, deleted = mutated.delete.len(), "in-memory delete");
        Ok(MutationResponse {
            mutated_entities: mutated,
            guid_assignments: BTreeMap::new(),
        })
    }

    fn restore(&self, guids: &[Guid]) -> Result<MutationResponse> {
        let mut store = self.lock()?;
        let mut mutated = MutatedEntities::default();
        for guid in guids {
            let index = store
                .position_by_guid(guid.as_str())
                .ok_or_else(|| not_found(guid.as_str()))?;
            let entity = &mut store.entities[index];
            if entity.get("status").and_then(Value::as_str) == Some("DELETED") {
                entity["status"] = json!("ACTIVE");
                mutated.update.push(Asset::from_json(entity.clone())?);
            }
        }
        Ok(MutationResponse {
            mutated_entities: mutated,
            guid_assignments: BTreeMap::new(),
        })
    }
}

fn not_found(guid: &str) -> TesseraError {
    TesseraError::Api {
        status: 404,
        message: format!("Asset with GUID {} does not exist", guid),
    }
}

fn qualified_name_of(entity: &Value) -> Option<&str> {
    entity
        .pointer("/attributes/qualifiedName")
        .and_then(Value::as_str)
        .or_else(|| {
            entity
                .pointer("/uniqueAttributes/qualifiedName")
                .and_then(Value::as_str)
        })
}

fn is_reference(value: &Value) -> bool {
    value.get("typeName").is_some()
        && (value.get("guid").is_some() || value.get("uniqueAttributes").is_some())
        && value.get("attributes").is_none()
}

fn is_relationship(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_reference),
        single => is_reference(single),
    }
}

fn same_reference(a: &Value, b: &Value) -> bool {
    let guid = |v: &Value| v.get("guid").and_then(Value::as_str).map(str::to_string);
    let key = |v: &Value| {
        (
            v.get("typeName").and_then(Value::as_str).map(str::to_string),
            v.pointer("/uniqueAttributes/qualifiedName")
                .and_then(Value::as_str)
                .map(str::to_string),
        )
    };
    match (guid(a), guid(b)) {
        (Some(x), Some(y)) => x == y,
        _ => {
            let (ka, kb) = (key(a), key(b));
            ka.1.is_some() && ka == kb
        }
    }
}

/// Decode a stored entity, dropping relationship attributes if asked
fn decode_view(entity: &Value, ignore_relationships: bool) -> Result<Asset> {
    let mut view = entity.clone();
    if ignore_relationships {
        if let Some(Value::Object(attrs)) = view.get_mut("attributes") {
            attrs.retain(|_, v| !is_relationship(v));
        }
    }
    Asset::from_json(view)
}

fn take_section(payload: &mut Value, key: &str) -> Map<String, Value> {
    match payload.as_object_mut().and_then(|o| o.remove(key)) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn create_entity(mut payload: Value, guid: &str) -> Value {
    let append = take_section(&mut payload, APPEND_KEY);
    take_section(&mut payload, REMOVE_KEY);

    let mut attributes = take_section(&mut payload, "attributes");
    attributes.retain(|_, v| !v.is_null());
    for (key, refs) in append {
        attributes.insert(key, refs);
    }

    payload["guid"] = json!(guid);
    payload["status"] = json!("ACTIVE");
    payload["attributes"] = Value::Object(attributes);
    payload
}

fn merge_entity(stored: &mut Value, mut payload: Value, replace_tags: bool) {
    let append = take_section(&mut payload, APPEND_KEY);
    let remove = take_section(&mut payload, REMOVE_KEY);
    let updates = take_section(&mut payload, "attributes");

    if !stored.get("attributes").is_some_and(Value::is_object) {
        stored["attributes"] = json!({});
    }
    let Some(attributes) = stored.get_mut("attributes").and_then(Value::as_object_mut) else {
        return;
    };

    for (key, value) in updates {
        if value.is_null() {
            attributes.remove(&key);
        } else {
            attributes.insert(key, value);
        }
    }

    for (key, refs) in append {
        let mut current = match attributes.remove(&key) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        };
        let incoming = match refs {
            Value::Array(items) => items,
            single => vec![single],
        };
        for reference in incoming {
            if !current.iter().any(|c| same_reference(c, &reference)) {
                current.push(reference);
            }
        }
        attributes.insert(key, Value::Array(current));
    }

    for (key, refs) in remove {
        let outgoing = match refs {
            Value::Array(items) => items,
            single => vec![single],
        };
        match attributes.remove(&key) {
            Some(Value::Array(mut items)) => {
                items.retain(|c| !outgoing.iter().any(|r| same_reference(c, r)));
                attributes.insert(key, Value::Array(items));
            }
            Some(single) if !outgoing.iter().any(|r| same_reference(&single, r)) => {
                attributes.insert(key, single);
            }
            _ => {}
        }
    }

    if replace_tags {
        if let Some(tags) = payload.get("classifications").cloned() {
            match tags {
                Value::Array(items) if items.is_empty() => {
                    if let Some(object) = stored.as_object_mut() {
                        object.remove("classifications");
                    }
                }
                other => stored["classifications"] = other,
            }
        }
    }
}
