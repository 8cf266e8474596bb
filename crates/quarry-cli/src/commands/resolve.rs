use super::{json_pretty, EXIT_SUCCESS};
use quarry_core::{CoreError, Resolver};
use quarry_schema::{CapabilityName, Catalog, RUNTIME_PREFIX};

pub fn run(
    catalog: &Catalog,
    capability: &str,
    runtime_version: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let name = capability.strip_prefix(RUNTIME_PREFIX).unwrap_or(capability);
    let resolver = Resolver::new(catalog, runtime_version);
    let expansion = resolver
        .expand(name)
        .map_err(|e| CoreError::from(e).to_string())?;

    if json {
        println!("{}", json_pretty(&expansion)?);
        return Ok(EXIT_SUCCESS);
    }

    let visited: Vec<&str> = expansion.capabilities.iter().map(CapabilityName::as_str).collect();
    println!("{name} -> {}", visited.join(", "));
    for coordinate in &expansion.coordinates {
        println!("  {coordinate}");
    }
    Ok(EXIT_SUCCESS)
}
