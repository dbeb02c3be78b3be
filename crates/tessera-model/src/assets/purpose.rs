//! Purposes: access control driven by tags

use super::asset_type;
use crate::entity::Entity;
use crate::traits::CatalogAsset;
use serde::{Deserialize, Serialize};
use tessera_core::Identity;

/// A purpose granting access to every asset carrying certain tags
pub type Purpose = Entity<PurposeAttributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurposeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_access_control_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose_classifications: Option<Vec<String>>,
}

asset_type!(PurposeAttributes, Purpose, "Purpose", {
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

impl Purpose {
    /// A new, enabled purpose scoped to the given tags
    pub fn creator<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut purpose = Self::blank()
            .with_guid(Identity::pending())
            .with_qualified_name(name.clone())
            .with_display_name(name.clone())
            .with_name(name);
        let attrs = purpose.specific_mut();
        attrs.is_access_control_enabled = Some(true);
        attrs.purpose_classifications = Some(tags.into_iter().map(Into::into).collect());
        purpose
    }

    pub fn updater_with_state(
        qualified_name: impl Into<String>,
        name: impl Into<String>,
        is_enabled: bool,
    ) -> Self {
        let mut purpose = Self::updater(qualified_name, name);
        purpose.specific_mut().is_access_control_enabled = Some(is_enabled);
        purpose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::TesseraError;

    #[test]
    fn test_creator_scopes_tags() {
        let purpose = Purpose::creator("PII access", ["PII", "Confidential"]);
        assert_eq!(
            purpose.specific().purpose_classifications,
            Some(vec!["PII".to_string(), "Confidential".to_string()])
        );
    }

    #[test]
    fn test_trim_requires_flag_and_name() {
        let purpose = Purpose::blank().with_qualified_name("p");
        match purpose.trim_to_required().unwrap_err() {
            TesseraError::MissingRequiredUpdateParam { fields, .. } => {
                assert_eq!(fields, vec!["name", "isAccessControlEnabled"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
