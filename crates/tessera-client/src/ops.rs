//! Typed operations every asset type gets for free
//!
//! [`AssetOps`] is blanket-implemented for every [`CatalogAsset`], so
//! `Table::get(&client, Some(id), false)` or
//! `Persona::update_certificate(&client, Persona::updater_with_state(qn, name, true), status, None)`
//! work against any [`CatalogClient`]. Nothing here retries or caches: each
//! call is one or two fresh round trips.
//!
//! Helpers that take an `updater` expect the smallest update payload for
//! the type: `T::updater(qn, name)`, or `updater_with_state` for Persona
//! and Purpose, whose enabled flag must always be re-asserted. An updater
//! missing such a field fails with `MissingRequiredUpdateParam` before
//! anything is sent.

use crate::client::{CatalogClient, DeleteType};
use crate::response::MutationResponse;
use tessera_core::{is_guid_shaped, Guid, Identity, Result, TesseraError};
use tessera_model::{
    AnnouncementType, Asset, AssetReference, CatalogAsset, CertificateStatus, Referenceable,
    SaveSemantic, Tag,
};
use tessera_search::{Condition, FluentSearch};
use tracing::debug;

/// Rendered in the error for a missing identifier
const NULL_ID: &str = "(null)";

/// Narrow a fetched asset, reporting a type mismatch against `id`
fn narrow<T: CatalogAsset>(asset: Asset, id: &str) -> Result<T> {
    T::from_asset(asset).map_err(|_| TesseraError::NotTypeRequested {
        id: id.to_string(),
        expected: T::TYPE_NAME.to_string(),
    })
}

fn not_found<T: CatalogAsset>(id: &str) -> TesseraError {
    if is_guid_shaped(id) {
        TesseraError::NotFoundByGuid(id.to_string())
    } else {
        TesseraError::NotFoundByQualifiedName {
            type_name: T::TYPE_NAME.to_string(),
            qualified_name: id.to_string(),
        }
    }
}

/// Validate a caller-built updater and reduce it to the minimal payload.
///
/// Fails before any remote call when a field the type needs for a safe
/// partial update is unset.
fn update_payload<T: CatalogAsset>(updater: &T) -> Result<Asset> {
    Ok(updater.trim_to_required()?.into_asset())
}

/// Save one asset and hand back its updated form, if the server changed it
fn save_one<T: CatalogAsset, C: CatalogClient + ?Sized>(
    client: &C,
    asset: Asset,
    replace_tags: bool,
) -> Result<Option<T>> {
    let response = client.save(&[asset], replace_tags)?;
    Ok(response.first_updated::<T>())
}

pub trait AssetOps: CatalogAsset {
    /// Retrieve an asset by GUID or qualified name.
    ///
    /// GUID-shaped ids are fetched by GUID, anything else by qualified name
    /// within this type. With `load_relationships` false the server may
    /// omit relationship attributes.
    fn get<C: CatalogClient + ?Sized>(
        client: &C,
        id: Option<&str>,
        load_relationships: bool,
    ) -> Result<Self> {
        let id = id.ok_or_else(|| TesseraError::NotFoundByGuid(NULL_ID.to_string()))?;
        let minimal = !load_relationships;
        let found = if is_guid_shaped(id) {
            client.get_by_guid(id, minimal, minimal)?
        } else {
            client.get_by_qualified_name(Self::TYPE_NAME, id, minimal, minimal)?
        };
        let asset = found.ok_or_else(|| not_found::<Self>(id))?;
        narrow(asset, id)
    }

    /// Retrieve an asset through search, limited to the listed attributes
    /// (and attributes of related assets).
    ///
    /// The GUID branch does not filter by type, so a GUID of another type
    /// fails with `NotTypeRequested` rather than not found.
    fn get_with<C: CatalogClient + ?Sized>(
        client: &C,
        id: Option<&str>,
        attributes: &[&str],
        related_attributes: &[&str],
    ) -> Result<Self> {
        let id = id.ok_or_else(|| TesseraError::NotFoundByGuid(NULL_ID.to_string()))?;
        let search = if is_guid_shaped(id) {
            FluentSearch::new().where_(Condition::guid(id))
        } else {
            FluentSearch::new()
                .where_(Condition::type_name(Self::TYPE_NAME))
                .where_(Condition::qualified_name(id))
        };
        let search = search
            .includes_on_results(attributes.iter().copied())
            .includes_on_relations(related_attributes.iter().copied())
            .page_size(1);

        match search.first(client)? {
            Some(asset) => narrow(asset, id),
            None => Err(not_found::<Self>(id)),
        }
    }

    /// Search preset to active assets of this type
    fn select() -> FluentSearch {
        Self::select_all(false)
    }

    /// Search preset to assets of this type, archived ones included if asked
    fn select_all(include_archived: bool) -> FluentSearch {
        let search = FluentSearch::new().where_(Condition::type_name(Self::TYPE_NAME));
        if include_archived {
            search
        } else {
            search.where_(Condition::active())
        }
    }

    /// Soft-delete: the asset remains, with status `DELETED`
    fn archive<C: CatalogClient + ?Sized>(client: &C, guid: &str) -> Result<MutationResponse> {
        client.delete(&[Guid::new(guid)], DeleteType::Soft)
    }

    /// Permanently delete
    fn purge<C: CatalogClient + ?Sized>(client: &C, guid: &str) -> Result<MutationResponse> {
        client.delete(&[Guid::new(guid)], DeleteType::Purge)
    }

    /// Return an archived asset to `ACTIVE`.
    ///
    /// Returns `false` if no asset (active or archived) has this qualified
    /// name, `true` once it is active.
    fn restore<C: CatalogClient + ?Sized>(client: &C, qualified_name: &str) -> Result<bool> {
        let Some(asset) = client.get_by_qualified_name(Self::TYPE_NAME, qualified_name, true, true)?
        else {
            return Ok(false);
        };
        if asset.is_active() {
            return Ok(true);
        }
        let Some(guid) = asset.guid().and_then(Identity::assigned).cloned() else {
            return Ok(false);
        };
        let response = client.restore(&[guid.clone()])?;
        Ok(response.updated_guid(&guid))
    }

    /// Create or update this asset, leaving stored tags alone
    fn save<C: CatalogClient + ?Sized>(&self, client: &C) -> Result<MutationResponse> {
        client.save(&[self.clone().into_asset()], false)
    }

    /// Create or update this asset, replacing stored tags with its own
    fn save_replacing_tags<C: CatalogClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<MutationResponse> {
        client.save(&[self.clone().into_asset()], true)
    }

    fn remove_description<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        asset.null_field("description");
        save_one(client, asset, false)
    }

    fn remove_user_description<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        asset.null_field("userDescription");
        save_one(client, asset, false)
    }

    /// Clear both owner users and owner groups
    fn remove_owners<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        asset.null_field("ownerUsers");
        asset.null_field("ownerGroups");
        save_one(client, asset, false)
    }

    fn update_certificate<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
        status: CertificateStatus,
        message: Option<&str>,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        let common = asset.common_mut();
        common.certificate_status = Some(status);
        common.certificate_status_message = message.map(str::to_string);
        save_one(client, asset, false)
    }

    fn remove_certificate<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        asset.null_field("certificateStatus");
        asset.null_field("certificateStatusMessage");
        save_one(client, asset, false)
    }

    fn update_announcement<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
        kind: AnnouncementType,
        title: &str,
        message: Option<&str>,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        let common = asset.common_mut();
        common.announcement_type = Some(kind);
        common.announcement_title = Some(title.to_string());
        common.announcement_message = message.map(str::to_string);
        save_one(client, asset, false)
    }

    fn remove_announcement<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
    ) -> Result<Option<Self>> {
        let mut asset = update_payload(&updater)?;
        asset.null_field("announcementType");
        asset.null_field("announcementTitle");
        asset.null_field("announcementMessage");
        save_one(client, asset, false)
    }

    /// Replace every assigned term; an empty list removes them all
    fn replace_terms<C: CatalogClient + ?Sized>(
        client: &C,
        updater: Self,
        terms: Vec<AssetReference>,
    ) -> Result<Option<Self>> {
        let terms = terms
            .into_iter()
            .map(|t| t.with_semantic(SaveSemantic::Replace))
            .collect();
        let mut asset = update_payload(&updater)?;
        asset.common_mut().meanings = Some(terms);
        save_one(client, asset, false)
    }

    /// Add terms to those already assigned.
    ///
    /// Read-modify-write: the current terms are read, merged locally and
    /// written back. A concurrent change between the read and the write is
    /// lost.
    fn append_terms<C: CatalogClient + ?Sized>(
        client: &C,
        qualified_name: &str,
        terms: Vec<AssetReference>,
    ) -> Result<Option<Self>> {
        let (current, mut asset) = read_for_update::<Self, C>(client, qualified_name)?;
        let mut merged: Vec<AssetReference> = current.common().meanings.clone().unwrap_or_default();
        for term in terms {
            if !merged.iter().any(|m| m.same_target(&term)) {
                merged.push(term);
            }
        }
        debug!(
            type_name = Self::TYPE_NAME,
            qualified_name,
            terms = merged.len(),
            "read-modify-write: appending terms"
        );
        asset.common_mut().meanings = Some(replace_semantics(merged));
        save_one(client, asset, false)
    }

    /// Remove terms from those already assigned.
    ///
    /// Read-modify-write: a concurrent change between the read and the
    /// write is lost.
    fn remove_terms<C: CatalogClient + ?Sized>(
        client: &C,
        qualified_name: &str,
        terms: &[AssetReference],
    ) -> Result<Option<Self>> {
        let (current, mut asset) = read_for_update::<Self, C>(client, qualified_name)?;
        let remaining: Vec<AssetReference> = current
            .common()
            .meanings
            .clone()
            .unwrap_or_default()
            .into_iter()
            .filter(|m| !terms.iter().any(|t| t.same_target(m)))
            .collect();
        debug!(
            type_name = Self::TYPE_NAME,
            qualified_name,
            terms = remaining.len(),
            "read-modify-write: removing terms"
        );
        asset.common_mut().meanings = Some(replace_semantics(remaining));
        save_one(client, asset, false)
    }

    /// Append tags atomically on the server, without reading the asset
    fn add_tags<C: CatalogClient + ?Sized>(
        client: &C,
        qualified_name: &str,
        tags: &[Tag],
    ) -> Result<()> {
        client.add_tags(Self::TYPE_NAME, qualified_name, tags)
    }

    /// Add tags to those already assigned.
    ///
    /// Read-modify-write: prefer [`add_tags`](Self::add_tags) where the
    /// server-side append is enough. A concurrent change between the read
    /// and the write is lost.
    fn append_tags<C: CatalogClient + ?Sized>(
        client: &C,
        qualified_name: &str,
        tags: Vec<Tag>,
    ) -> Result<Option<Self>> {
        let (current, mut asset) = read_for_update::<Self, C>(client, qualified_name)?;
        let mut merged: Vec<Tag> = current.classifications().cloned().unwrap_or_default();
        for tag in tags {
            if !merged.iter().any(|t| t.type_name == tag.type_name) {
                merged.push(tag);
            }
        }
        debug!(
            type_name = Self::TYPE_NAME,
            qualified_name,
            tags = merged.len(),
            "read-modify-write: appending tags"
        );
        asset.set_classifications(Some(merged));
        save_one(client, asset, true)
    }

    /// Remove one tag.
    ///
    /// Read-modify-write: a concurrent change between the read and the
    /// write is lost.
    fn remove_tag<C: CatalogClient + ?Sized>(
        client: &C,
        qualified_name: &str,
        tag_name: &str,
    ) -> Result<Option<Self>> {
        let (current, mut asset) = read_for_update::<Self, C>(client, qualified_name)?;
        let remaining: Vec<Tag> = current
            .classifications()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.type_name != tag_name)
            .collect();
        debug!(
            type_name = Self::TYPE_NAME,
            qualified_name,
            tag_name,
            "read-modify-write: removing tag"
        );
        asset.set_classifications(Some(remaining));
        save_one(client, asset, true)
    }
}

impl<T: CatalogAsset> AssetOps for T {}

/// Read the full current asset and derive the minimal payload to update it
fn read_for_update<T: CatalogAsset, C: CatalogClient + ?Sized>(
    client: &C,
    qualified_name: &str,
) -> Result<(Asset, Asset)> {
    let current = client
        .get_by_qualified_name(T::TYPE_NAME, qualified_name, false, false)?
        .ok_or_else(|| not_found::<T>(qualified_name))?;
    let typed: T = narrow(current.clone(), qualified_name)?;
    let payload = typed.trim_to_required()?.into_asset();
    Ok((current, payload))
}

fn replace_semantics(references: Vec<AssetReference>) -> Vec<AssetReference> {
    references
        .into_iter()
        .map(|r| r.with_semantic(SaveSemantic::Replace))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryClient;
    use serde_json::Value;
    use std::sync::Mutex;
    use tessera_model::wire::encode_for_save;
    use tessera_model::{Connection, Dashboard, GlossaryTerm, Persona, Purpose, Table};
    use tessera_search::{IndexSearchRequest, SearchPage, SearchSource};

    const CONN: &str = "default/snowflake/1700000000";
    const SCHEMA: &str = "default/snowflake/1700000000/DB/S";
    const ORDERS: &str = "default/snowflake/1700000000/DB/S/ORDERS";

    /// A catalog with one connection and one table; returns the table guid
    fn catalog() -> (InMemoryClient, String) {
        let client = InMemoryClient::new();
        let connection = Connection::creator_at("sf", "snowflake", 1_700_000_000);
        let table = Table::creator("ORDERS", SCHEMA)
            .with_description("all orders")
            .with_owner_users(["ada"]);
        let placeholder = table.guid.clone().unwrap();
        let response = client
            .save(&[connection.into_asset(), table.into_asset()], false)
            .unwrap();
        let guid = response.assigned_guid(&placeholder).unwrap().to_string();
        (client, guid)
    }

    /// Keeps the wire payload of every save, then passes calls through
    #[derive(Default)]
    struct Recording {
        inner: InMemoryClient,
        saved: Mutex<Vec<Value>>,
    }

    impl Recording {
        fn saved(&self) -> Vec<Value> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl SearchSource for Recording {
        fn search(&self, request: &IndexSearchRequest) -> Result<SearchPage> {
            self.inner.search(request)
        }
    }

    impl CatalogClient for Recording {
        fn get_by_guid(&self, guid: &str, min: bool, ignore: bool) -> Result<Option<Asset>> {
            self.inner.get_by_guid(guid, min, ignore)
        }

        fn get_by_qualified_name(
            &self,
            type_name: &str,
            qualified_name: &str,
            min: bool,
            ignore: bool,
        ) -> Result<Option<Asset>> {
            self.inner
                .get_by_qualified_name(type_name, qualified_name, min, ignore)
        }

        fn save(&self, assets: &[Asset], replace_tags: bool) -> Result<MutationResponse> {
            for asset in assets {
                self.saved.lock().unwrap().push(encode_for_save(asset)?);
            }
            self.inner.save(assets, replace_tags)
        }

        fn add_tags(&self, type_name: &str, qualified_name: &str, tags: &[Tag]) -> Result<()> {
            self.inner.add_tags(type_name, qualified_name, tags)
        }

        fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse> {
            self.inner.delete(guids, delete_type)
        }

        fn restore(&self, guids: &[Guid]) -> Result<MutationResponse> {
            self.inner.restore(guids)
        }
    }

    /// The minimal updater for the catalog's table
    fn orders() -> Table {
        Table::updater(ORDERS, "ORDERS")
    }

    #[test]
    fn test_get_by_guid_and_qualified_name() {
        let (client, guid) = catalog();
        let by_guid = Table::get(&client, Some(guid.as_str()), false).unwrap();
        let by_qn = Table::get(&client, Some(ORDERS), true).unwrap();
        assert_eq!(by_guid.guid, by_qn.guid);
        assert_eq!(by_qn.common().description.as_deref(), Some("all orders"));
    }

    #[test]
    fn test_get_missing_identifier() {
        let (client, _) = catalog();
        assert!(matches!(
            Table::get(&client, None, false),
            Err(TesseraError::NotFoundByGuid(id)) if id == "(null)"
        ));
    }

    #[test]
    fn test_get_absent_guid_and_name() {
        let (client, _) = catalog();
        let absent = "99999999-9999-9999-9999-999999999999";
        assert!(matches!(
            Table::get(&client, Some(absent), false),
            Err(TesseraError::NotFoundByGuid(id)) if id == absent
        ));
        assert!(matches!(
            Table::get(&client, Some("default/snowflake/1700000000/DB/S/NOPE"), false),
            Err(TesseraError::NotFoundByQualifiedName { type_name, .. }) if type_name == "Table"
        ));
    }

    #[test]
    fn test_get_absent_assets_report_how_they_were_looked_up() {
        let (client, _) = catalog();
        assert!(matches!(
            Table::get(&client, Some("11111111-1111-1111-1111-111111111111"), false),
            Err(TesseraError::NotFoundByGuid(id)) if id == "11111111-1111-1111-1111-111111111111"
        ));
        assert!(matches!(
            Table::get(&client, Some("db/schema/table"), false),
            Err(TesseraError::NotFoundByQualifiedName { type_name, qualified_name })
                if type_name == "Table" && qualified_name == "db/schema/table"
        ));
    }

    #[test]
    fn test_get_wrong_type() {
        let (client, guid) = catalog();
        assert!(matches!(
            Dashboard::get(&client, Some(guid.as_str()), false),
            Err(TesseraError::NotTypeRequested { expected, .. }) if expected == "Dashboard"
        ));
        // Looked up by name, another type's asset is simply not found
        assert!(matches!(
            Dashboard::get(&client, Some(ORDERS), false),
            Err(TesseraError::NotFoundByQualifiedName { .. })
        ));
    }

    #[test]
    fn test_get_with() {
        let (client, guid) = catalog();
        let table = Table::get_with(&client, Some(ORDERS), &["description"], &[]).unwrap();
        assert_eq!(table.guid.as_ref().map(|g| g.to_wire()), Some(guid.clone()));

        assert!(matches!(
            Dashboard::get_with(&client, Some(guid.as_str()), &[], &[]),
            Err(TesseraError::NotTypeRequested { .. })
        ));
        assert!(matches!(
            Table::get_with(&client, Some("x/y"), &[], &[]),
            Err(TesseraError::NotFoundByQualifiedName { .. })
        ));
        assert!(matches!(
            Table::get_with(&client, None, &[], &[]),
            Err(TesseraError::NotFoundByGuid(_))
        ));
    }

    #[test]
    fn test_select_archive_restore() {
        let (client, guid) = catalog();
        assert_eq!(Table::select().collect_all(&client).unwrap().len(), 1);

        Table::archive(&client, &guid).unwrap();
        assert!(Table::select().collect_all(&client).unwrap().is_empty());
        assert_eq!(Table::select_all(true).collect_all(&client).unwrap().len(), 1);
        assert!(!Table::get(&client, Some(guid.as_str()), false).unwrap().is_active());

        assert!(Table::restore(&client, ORDERS).unwrap());
        assert!(Table::get(&client, Some(guid.as_str()), false).unwrap().is_active());
        // Already active
        assert!(Table::restore(&client, ORDERS).unwrap());
        assert!(!Table::restore(&client, "no/such/table").unwrap());
    }

    #[test]
    fn test_purge() {
        let (client, guid) = catalog();
        Table::purge(&client, &guid).unwrap();
        assert!(matches!(
            Table::get(&client, Some(guid.as_str()), false),
            Err(TesseraError::NotFoundByGuid(_))
        ));
    }

    #[test]
    fn test_certificate_and_announcement() {
        let (client, _) = catalog();
        let updated = Table::update_certificate(
            &client,
            orders(),
            CertificateStatus::Verified,
            Some("checked"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            updated.common().certificate_status,
            Some(CertificateStatus::Verified)
        );

        Table::update_announcement(
            &client,
            orders(),
            AnnouncementType::Warning,
            "migrating",
            None,
        )
        .unwrap();
        let removed = Table::remove_certificate(&client, orders())
            .unwrap()
            .unwrap();
        assert!(removed.common().certificate_status.is_none());
        assert!(removed.common().certificate_status_message.is_none());
        assert_eq!(removed.common().announcement_title.as_deref(), Some("migrating"));

        let cleared = Table::remove_announcement(&client, orders())
            .unwrap()
            .unwrap();
        assert!(cleared.common().announcement_type.is_none());
    }

    #[test]
    fn test_remove_description_and_owners() {
        let (client, _) = catalog();
        let table = Table::remove_description(&client, orders())
            .unwrap()
            .unwrap();
        assert!(table.common().description.is_none());
        assert_eq!(table.common().owner_users, Some(vec!["ada".to_string()]));

        let table = Table::remove_owners(&client, orders())
            .unwrap()
            .unwrap();
        assert!(table.common().owner_users.is_none());

        // Nothing left to remove: the server reports no change
        assert!(Table::remove_owners(&client, orders()).unwrap().is_none());
        assert!(Table::remove_user_description(&client, orders())
            .unwrap()
            .is_none());
    }

    fn term_guids(table: &Table) -> Vec<String> {
        table
            .common()
            .meanings
            .iter()
            .flatten()
            .map(AssetReference::key_string)
            .collect()
    }

    #[test]
    fn test_terms() {
        let (client, _) = catalog();
        let t1 = GlossaryTerm::ref_by_guid("term-1");
        let t2 = GlossaryTerm::ref_by_guid("term-2");
        let t3 = GlossaryTerm::ref_by_guid("term-3");

        let table = Table::replace_terms(&client, orders(), vec![t1.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(term_guids(&table), vec!["term-1"]);

        let table = Table::append_terms(&client, ORDERS, vec![t2.clone(), t1.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(term_guids(&table), vec!["term-1", "term-2"]);

        Table::append_terms(&client, ORDERS, vec![t3]).unwrap();
        let table = Table::remove_terms(&client, ORDERS, &[t1, t2]).unwrap().unwrap();
        assert_eq!(term_guids(&table), vec!["term-3"]);

        let table = Table::replace_terms(&client, orders(), vec![])
            .unwrap()
            .unwrap();
        assert!(term_guids(&table).is_empty());
    }

    #[test]
    fn test_append_terms_on_missing_asset() {
        let (client, _) = catalog();
        assert!(matches!(
            Table::append_terms(&client, "no/such", vec![GlossaryTerm::ref_by_guid("t")]),
            Err(TesseraError::NotFoundByQualifiedName { .. })
        ));
    }

    #[test]
    fn test_tags() {
        let (client, guid) = catalog();
        Table::add_tags(&client, ORDERS, &[Tag::new("PII")]).unwrap();

        let table = Table::append_tags(&client, ORDERS, vec![Tag::new("Gold"), Tag::new("PII")])
            .unwrap()
            .unwrap();
        assert_eq!(table.tag_names(), vec!["PII", "Gold"]);

        let table = Table::remove_tag(&client, ORDERS, "PII").unwrap().unwrap();
        assert_eq!(table.tag_names(), vec!["Gold"]);

        let fetched = Table::get(&client, Some(guid.as_str()), false).unwrap();
        assert_eq!(fetched.tag_names(), vec!["Gold"]);
    }

    #[test]
    fn test_rmw_keeps_persona_enabled_flag() {
        let client = InMemoryClient::new();
        Persona::creator("analysts").save(&client).unwrap();

        let persona = Persona::append_tags(&client, "analysts", vec![Tag::new("Team")])
            .unwrap()
            .unwrap();
        assert_eq!(persona.specific().is_access_control_enabled, Some(true));
        assert_eq!(persona.tag_names(), vec!["Team"]);
    }

    #[test]
    fn test_persona_helpers_send_enabled_flag() {
        let client = Recording::default();
        Persona::creator("analysts").save(&client).unwrap();

        let persona = Persona::update_certificate(
            &client,
            Persona::updater_with_state("analysts", "analysts", true),
            CertificateStatus::Verified,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(persona.specific().is_access_control_enabled, Some(true));
        assert_eq!(
            persona.common().certificate_status,
            Some(CertificateStatus::Verified)
        );

        let payload = client.saved().pop().unwrap();
        assert_eq!(payload["typeName"], "Persona");
        assert_eq!(payload["attributes"]["isAccessControlEnabled"], true);
        assert_eq!(payload["attributes"]["certificateStatus"], "VERIFIED");

        Persona::remove_certificate(
            &client,
            Persona::updater_with_state("analysts", "analysts", true),
        )
        .unwrap();
        let payload = client.saved().pop().unwrap();
        assert_eq!(payload["attributes"]["isAccessControlEnabled"], true);
        assert!(payload["attributes"]["certificateStatus"].is_null());
    }

    #[test]
    fn test_updater_missing_enabled_flag_is_rejected_before_sending() {
        let client = Recording::default();
        Persona::creator("analysts").save(&client).unwrap();
        let sent = client.saved().len();

        let err = Persona::update_announcement(
            &client,
            Persona::updater("analysts", "analysts"),
            AnnouncementType::Information,
            "hello",
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TesseraError::MissingRequiredUpdateParam { ref fields, .. }
                if fields == &vec!["isAccessControlEnabled".to_string()]
        ));
        assert!(matches!(
            Purpose::remove_description(&client, Purpose::updater("p", "p")),
            Err(TesseraError::MissingRequiredUpdateParam { .. })
        ));
        assert_eq!(client.saved().len(), sent);
    }

    #[test]
    fn test_purpose_helpers_keep_enabled_flag() {
        let client = InMemoryClient::new();
        Purpose::creator("pii", ["PII"]).save(&client).unwrap();

        let purpose = Purpose::update_announcement(
            &client,
            Purpose::updater_with_state("pii", "pii", true),
            AnnouncementType::Warning,
            "under review",
            Some("policy changes pending"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(purpose.specific().is_access_control_enabled, Some(true));
        assert_eq!(
            purpose.common().announcement_title.as_deref(),
            Some("under review")
        );
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let client = InMemoryClient::new();

        // Create
        let connection = Connection::creator_at("sf", "snowflake", 1_700_000_000);
        let table = Table::creator("ORDERS", SCHEMA);
        let pending = table.guid.clone().unwrap();
        let response = client
            .save(&[connection.into_asset(), table.into_asset()], false)
            .unwrap();
        assert_eq!(response.created().len(), 2);
        let guid = response.assigned_guid(&pending).unwrap();

        // Reference and trim
        let reference = Table::get(&client, Some(guid.as_str()), false)
            .unwrap()
            .trim_to_reference()
            .unwrap();
        assert_eq!(reference, Table::ref_by_guid(guid.clone()));

        // Update through a trimmed updater
        let fetched = Table::get(&client, Some(ORDERS), false).unwrap();
        let updater = fetched.trim_to_required().unwrap().with_description("curated");
        updater.save(&client).unwrap();
        assert_eq!(
            Table::get(&client, Some(ORDERS), false)
                .unwrap()
                .common()
                .description
                .as_deref(),
            Some("curated")
        );
        assert_eq!(
            Table::get(&client, Some(ORDERS), false)
                .unwrap()
                .common()
                .connection_qualified_name
                .as_deref(),
            Some(CONN)
        );

        // Archive and restore
        Table::archive(&client, guid.as_str()).unwrap();
        assert!(Table::restore(&client, ORDERS).unwrap());
        assert!(Table::get(&client, Some(ORDERS), false).unwrap().is_active());
    }
}
