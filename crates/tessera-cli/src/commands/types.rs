//! Types command: list the registered asset types

use anyhow::Result;
use tessera_model::TypeRegistry;

pub fn run() -> Result<()> {
    let registry = TypeRegistry::global();
    for type_name in registry.type_names() {
        let required = registry.required_update_fields(type_name);
        if required.is_empty() {
            println!("{}", type_name);
        } else {
            println!("{} (updates require: {})", type_name, required.join(", "));
        }
    }
    Ok(())
}
