//! List the registered transforms.

use anyhow::Result;
use marginalia_core::TransformRegistry;

pub fn list_filters(json: bool) -> Result<()> {
    let names: Vec<&str> = TransformRegistry::builtin().names().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}
