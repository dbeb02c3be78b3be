//! Type registry: decode wire values into typed assets by `typeName`

use crate::asset::Asset;
use crate::assets::{
    ApiPathAttributes, ApiSpecAttributes, BiReportAttributes, ConnectionAttributes,
    DashboardAttributes, GlossaryTermAttributes, PersonaAttributes, ProcessAttributes,
    PurposeAttributes, TableAttributes,
};
use crate::entity::{Entity, GenericAttributes};
use crate::traits::TypeAttributes;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tessera_core::{Result, TesseraError};

type DecodeFn = fn(Value) -> Result<Asset>;

/// How one asset type is decoded and validated
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub type_name: &'static str,
    /// Type-specific fields an update must carry
    pub required_update_fields: &'static [&'static str],
    decode: DecodeFn,
}

impl TypeDefinition {
    pub fn of<A: TypeAttributes>() -> Self {
        Self {
            type_name: A::TYPE_NAME,
            required_update_fields: A::REQUIRED_FOR_UPDATE,
            decode: decode_as::<A>,
        }
    }

    pub fn decode(&self, value: Value) -> Result<Asset> {
        (self.decode)(value)
    }
}

fn decode_as<A: TypeAttributes>(value: Value) -> Result<Asset> {
    let entity: Entity<A> = serde_json::from_value(value)?;
    Ok(A::wrap(entity))
}

/// Registry that maps `typeName` to a decoder.
///
/// Unregistered types decode to [`Asset::Generic`], keeping every attribute.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<&'static str, TypeDefinition>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in asset type
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<ConnectionAttributes>();
        registry.register::<TableAttributes>();
        registry.register::<DashboardAttributes>();
        registry.register::<BiReportAttributes>();
        registry.register::<PersonaAttributes>();
        registry.register::<PurposeAttributes>();
        registry.register::<ProcessAttributes>();
        registry.register::<ApiSpecAttributes>();
        registry.register::<ApiPathAttributes>();
        registry.register::<GlossaryTermAttributes>();
        registry
    }

    /// The shared built-in registry
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TypeRegistry::builtin)
    }

    pub fn register<A: TypeAttributes>(&mut self) {
        self.types.insert(A::TYPE_NAME, TypeDefinition::of::<A>());
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// All registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        self.types.keys().copied().collect()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Type-specific update fields for `type_name` (empty when unknown)
    pub fn required_update_fields(&self, type_name: &str) -> &'static [&'static str] {
        self.get(type_name)
            .map(|def| def.required_update_fields)
            .unwrap_or(&[])
    }

    /// Decode a wire value, dispatching on its `typeName`
    pub fn decode(&self, value: Value) -> Result<Asset> {
        let type_name = value
            .get("typeName")
            .and_then(Value::as_str)
            .ok_or_else(|| TesseraError::UnknownType("(missing typeName)".to_string()))?;

        match self.get(type_name) {
            Some(def) => def.decode(value),
            None => {
                let entity: Entity<GenericAttributes> = serde_json::from_value(value)?;
                Ok(Asset::Generic(entity))
            }
        }
    }

    /// Like [`decode`](Self::decode), but refuse unregistered types
    pub fn decode_strict(&self, value: Value) -> Result<Asset> {
        let type_name = value.get("typeName").and_then(Value::as_str).unwrap_or("");
        if !self.contains(type_name) {
            return Err(TesseraError::UnknownType(type_name.to_string()));
        }
        self.decode(value)
    }
}
