//! Personas: access-control groupings of users

use super::asset_type;
use crate::entity::Entity;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::Identity;

/// A persona granting a set of users a curated view of the catalog
pub type Persona = Entity<PersonaAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_access_control_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_asset_tabs: Option<Vec<String>>,
}

asset_type!(PersonaAttributes, Persona, "Persona", {
    const REQUIRED_FOR_UPDATE: &'static [&'static str] = &["isAccessControlEnabled"];

    fn missing_required(&self) -> Vec<&'static str> {
        if self.is_access_control_enabled.is_none() {
            vec!["isAccessControlEnabled"]
        } else {
            Vec::new()
        }
    }

    fn retain_required(&self) -> Self {
        Self {
            is_access_control_enabled: self.is_access_control_enabled,
            ..Self::default()
        }
    }
});

impl Persona {
    /// A new, enabled persona
    pub fn creator(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut persona = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(name.clone())
            .with_display_name(name.clone())
            .with_name(name);
        persona.specific_mut().is_access_control_enabled = Some(true);
        persona
    }

    /// The smallest payload that updates a persona; the enabled flag must
    /// always be re-asserted or the server resets it
    pub fn updater_with_state(
        qualified_name: impl Into<String>,
        name: impl Into<String>,
        is_enabled: bool,
    ) -> Self {
        let mut persona = Self::updater(qualified_name, name);
        persona.specific_mut().is_access_control_enabled = Some(is_enabled);
        persona
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specific_mut().persona_users = Some(users.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Referenceable;

    #[test]
    fn test_creator_is_enabled() {
        let persona = Persona::creator("Data Stewards");
        assert_eq!(persona.qualified_name(), Some("Data Stewards"));
        assert_eq!(persona.specific().is_access_control_enabled, Some(true));
    }

    #[test]
    fn test_trim_keeps_only_enabled_flag() {
        let persona = Persona::updater_with_state("p", "p", true).with_users(["ada"]);
        let trimmed = persona.trim_to_required().unwrap();
        assert_eq!(trimmed.specific().is_access_control_enabled, Some(true));
        assert!(trimmed.specific().persona_users.is_none());
    }
}
