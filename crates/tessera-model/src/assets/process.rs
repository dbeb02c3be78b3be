//! Lineage processes connecting inputs to outputs

use super::asset_type;
use crate::entity::Entity;
use crate::reference::AssetReference;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::{name as qn, Identity, KeyHash};

/// A process that reads its inputs and produces its outputs
pub type Process = Entity<ProcessAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<AssetReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<AssetReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<String>,
}

asset_type!(ProcessAttributes, Process, "Process");

impl Process {
    /// A new process under `connection_qualified_name`.
    ///
    /// Without a `process_id` the key is derived from the name and the
    /// (sorted) input and output keys, so recreating the same lineage
    /// yields the same qualified name.
    pub fn creator(
        name: impl Into<String>,
        connection_qualified_name: &str,
        process_id: Option<&str>,
        inputs: Vec<AssetReference>,
        outputs: Vec<AssetReference>,
    ) -> Self {
        let name = name.into();
        let id = match process_id {
            Some(id) => id.to_string(),
            None => Self::derive_id(&name, connection_qualified_name, &inputs, &outputs),
        };

        let mut process = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(qn::child_qualified_name(connection_qualified_name, &id))
            .with_name(name)
            .with_connection_qualified_name(connection_qualified_name);
        let attrs = process.specific_mut();
        attrs.inputs = Some(inputs);
        attrs.outputs = Some(outputs);
        process
    }

    fn derive_id(
        name: &str,
        connection_qualified_name: &str,
        inputs: &[AssetReference],
        outputs: &[AssetReference],
    ) -> String {
        let mut input_keys: Vec<String> = inputs.iter().map(AssetReference::key_string).collect();
        let mut output_keys: Vec<String> = outputs.iter().map(AssetReference::key_string).collect();
        input_keys.sort();
        output_keys.sort();

        let parts = [name.to_string(), connection_qualified_name.to_string()]
            .into_iter()
            .chain(input_keys)
            .chain(std::iter::once("->".to_string()))
            .chain(output_keys);
        KeyHash::from_parts(parts).to_hex()
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.specific_mut().sql = Some(sql.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Table;
    use crate::traits::Referenceable;

    fn io() -> (Vec<AssetReference>, Vec<AssetReference>) {
        (
            vec![
                Table::ref_by_qualified_name("c/x/1/DB/S/A"),
                Table::ref_by_qualified_name("c/x/1/DB/S/B"),
            ],
            vec![Table::ref_by_qualified_name("c/x/1/DB/S/C")],
        )
    }

    #[test]
    fn test_explicit_id() {
        let (inputs, outputs) = io();
        let process = Process::creator("etl", "c/x/1", Some("job-42"), inputs, outputs);
        assert_eq!(process.qualified_name(), Some("c/x/1/job-42"));
        assert_eq!(process.specific().inputs.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_derived_id_ignores_input_order() {
        let (inputs, outputs) = io();
        let mut reversed = inputs.clone();
        reversed.reverse();
        let a = Process::creator("etl", "c/x/1", None, inputs, outputs.clone());
        let b = Process::creator("etl", "c/x/1", None, reversed, outputs);
        assert_eq!(a.qualified_name(), b.qualified_name());
        assert_ne!(a.guid, b.guid);
    }

    #[test]
    fn test_derived_id_depends_on_outputs() {
        let (inputs, outputs) = io();
        let a = Process::creator("etl", "c/x/1", None, inputs.clone(), outputs);
        let b = Process::creator("etl", "c/x/1", None, inputs, vec![]);
        assert_ne!(a.qualified_name(), b.qualified_name());
    }
}
