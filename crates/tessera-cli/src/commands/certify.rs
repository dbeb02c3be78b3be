//! Certify command

use super::{print_outcome, resolve_updater, with_asset_type};
use anyhow::Result;
use tessera_client::{AssetOps, CatalogClient};
use tessera_model::CertificateStatus;

pub struct CertifyArgs {
    pub type_name: String,
    pub qualified_name: String,
    /// `None` removes the certificate
    pub status: Option<CertificateStatus>,
    pub message: Option<String>,
    pub name: Option<String>,
}

pub fn run(client: &dyn CatalogClient, args: CertifyArgs) -> Result<()> {
    with_asset_type!(args.type_name, T => certify::<T>(client, &args))
}

fn certify<T: AssetOps>(client: &dyn CatalogClient, args: &CertifyArgs) -> Result<()> {
    let qualified_name = args.qualified_name.as_str();
    let updater = resolve_updater::<T, _>(client, qualified_name, args.name.clone())?;
    let outcome = match args.status {
        Some(status) => {
            T::update_certificate(client, updater, status, args.message.as_deref())?
        }
        None => T::remove_certificate(client, updater)?,
    };
    print_outcome(outcome, qualified_name)
}
