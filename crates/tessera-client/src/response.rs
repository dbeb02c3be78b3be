//! Server response shapes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{Guid, Identity};
use tessera_model::{Asset, CatalogAsset, Referenceable};

/// Body of a single-entity get
#[derive(Debug, Clone, Deserialize)]
pub struct EntityResponse {
    pub entity: Asset,
}

/// Assets touched by a mutation, grouped by what happened to them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutatedEntities {
    #[serde(rename = "CREATE", default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<Asset>,
    #[serde(rename = "UPDATE", default, skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<Asset>,
    #[serde(rename = "PARTIAL_UPDATE", default, skip_serializing_if = "Vec::is_empty")]
    pub partial_update: Vec<Asset>,
    #[serde(rename = "DELETE", default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<Asset>,
}

/// Result of a save, delete or restore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(default)]
    pub mutated_entities: MutatedEntities,
    /// Placeholder (`"-17"`) to assigned GUID
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub guid_assignments: BTreeMap<String, String>,
}

impl MutationResponse {
    pub fn created(&self) -> &[Asset] {
        &self.mutated_entities.create
    }

    /// Fully and partially updated assets
    pub fn updated(&self) -> Vec<&Asset> {
        self.mutated_entities
            .update
            .iter()
            .chain(&self.mutated_entities.partial_update)
            .collect()
    }

    pub fn deleted(&self) -> &[Asset] {
        &self.mutated_entities.delete
    }

    pub fn is_empty(&self) -> bool {
        self.created().is_empty() && self.updated().is_empty() && self.deleted().is_empty()
    }

    /// The GUID the server assigned to a placeholder identity
    pub fn assigned_guid(&self, identity: &Identity) -> Option<Guid> {
        match identity {
            Identity::Assigned(guid) => Some(guid.clone()),
            Identity::Pending(local) => self
                .guid_assignments
                .get(&local.to_wire())
                .map(|g| Guid::new(g.as_str())),
        }
    }

    /// The first updated (or else created) asset of type `T`
    pub fn first_updated<T: CatalogAsset>(&self) -> Option<T> {
        self.updated()
            .into_iter()
            .chain(self.created())
            .find(|a| a.type_name() == T::TYPE_NAME)
            .and_then(|a| T::from_asset(a.clone()).ok())
    }

    /// Whether `guid` appears among the updated assets
    pub fn updated_guid(&self, guid: &Guid) -> bool {
        self.updated()
            .iter()
            .any(|a| a.guid().and_then(Identity::assigned) == Some(guid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::LocalId;
    use tessera_model::Table;

    fn sample() -> MutationResponse {
        serde_json::from_value(json!({
            "mutatedEntities": {
                "CREATE": [{"typeName": "Table", "guid": "g-new", "attributes": {"qualifiedName": "c/d/s/new"}}],
                "PARTIAL_UPDATE": [{"typeName": "Table", "guid": "g-old", "attributes": {"qualifiedName": "c/d/s/old", "name": "old"}}]
            },
            "guidAssignments": {"-5": "g-new"}
        }))
        .unwrap()
    }

    #[test]
    fn test_groups() {
        let response = sample();
        assert_eq!(response.created().len(), 1);
        assert_eq!(response.updated().len(), 1);
        assert!(response.deleted().is_empty());
        assert!(!response.is_empty());
        assert!(MutationResponse::default().is_empty());
    }

    #[test]
    fn test_assigned_guid() {
        let response = sample();
        let pending = Identity::Pending(LocalId::from_raw(5));
        assert_eq!(response.assigned_guid(&pending), Some(Guid::new("g-new")));
        assert_eq!(
            response.assigned_guid(&Identity::Pending(LocalId::from_raw(6))),
            None
        );
    }

    #[test]
    fn test_first_updated_prefers_updates() {
        let table: Table = sample().first_updated().unwrap();
        assert_eq!(table.name(), Some("old"));
        assert!(sample().updated_guid(&Guid::new("g-old")));
    }
}
