use super::{json_pretty, EXIT_SUCCESS};
use quarry_schema::{CapabilityName, Catalog};

pub fn run(catalog: &Catalog, json: bool) -> Result<u8, String> {
    if json {
        println!("{}", json_pretty(catalog)?);
        return Ok(EXIT_SUCCESS);
    }

    let bom = catalog.bom(None);
    println!("catalog {} (bom {bom})", catalog.version);
    if let Some(v) = &catalog.default_runtime_version {
        println!("default runtime version: {v}");
    }

    if catalog.runtimes.is_empty() {
        println!("no runtimes.");
    } else {
        println!("runtimes:");
        for (name, entry) in &catalog.runtimes {
            let implies = if entry.implies.is_empty() {
                String::new()
            } else {
                let names: Vec<&str> = entry.implies.iter().map(CapabilityName::as_str).collect();
                format!("  implies {}", names.join(", "))
            };
            println!(
                "  {:<14} {}:{} ({}){implies}",
                name.as_str(),
                entry.group_id,
                entry.artifact_id,
                entry.packaging
            );
            for library in &entry.libraries {
                println!("  {:<14}   + {library}", "");
            }
        }
    }

    if catalog.components.is_empty() {
        println!("no components.");
    } else {
        println!("components:");
        for (name, entry) in &catalog.components {
            println!(
                "  {:<14} {}:{}",
                name.as_str(),
                catalog.bom_group_id,
                entry.artifact_id
            );
            for dependency in &entry.dependencies {
                println!("  {:<14}   + {dependency}", "");
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
