use super::{json_pretty, EXIT_SUCCESS};
use quarry_core::CoreError;
use quarry_schema::{RepositoryEntry, RepositoryPolicy};

pub fn run(spec: &str, json: bool) -> Result<u8, String> {
    let entry = RepositoryEntry::parse(spec).map_err(|e| CoreError::from(e).to_string())?;

    if json {
        println!("{}", json_pretty(&entry)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("id:        {}", entry.id);
    if let Some(name) = &entry.name {
        println!("name:      {name}");
    }
    println!("url:       {}", entry.url);
    println!("releases:  {}", describe(entry.releases));
    println!("snapshots: {}", describe(entry.snapshots));
    Ok(EXIT_SUCCESS)
}

fn describe(policy: RepositoryPolicy) -> String {
    let state = if policy.enabled { "enabled" } else { "disabled" };
    match policy.checksum_policy {
        Some(checksum) => format!("{state} (checksum {checksum})"),
        None => state.to_owned(),
    }
}
