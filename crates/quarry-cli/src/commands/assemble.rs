use super::{json_pretty, EXIT_SUCCESS};
use quarry_core::{Assembler, CoreError, DescriptorFormat};
use quarry_schema::{parse_request_file, BuildRequest, Catalog};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default)]
pub struct AssembleOptions {
    pub request: Option<PathBuf>,
    pub runtime_version: Option<String>,
    pub catalog_version: Option<String>,
    pub dependencies: Vec<String>,
    pub repositories: Vec<String>,
    pub format: Option<DescriptorFormat>,
    pub output: Option<PathBuf>,
}

impl AssembleOptions {
    /// The request file (if any) with command-line overrides applied on top.
    fn build_request(&self) -> Result<BuildRequest, String> {
        let mut request = match &self.request {
            Some(path) => parse_request_file(path).map_err(|e| CoreError::from(e).to_string())?,
            None => BuildRequest::new(),
        };
        if let Some(v) = &self.runtime_version {
            request.runtime_version = Some(v.clone());
        }
        if let Some(v) = &self.catalog_version {
            request.catalog_version = Some(v.clone());
        }
        request.dependencies.extend(self.dependencies.iter().cloned());
        request.repositories.extend(self.repositories.iter().cloned());
        Ok(request)
    }
}

pub fn run(catalog: &Catalog, options: &AssembleOptions, json: bool) -> Result<u8, String> {
    let request = options.build_request()?;
    let descriptor = Assembler::new(catalog)
        .assemble(&request)
        .map_err(|e| CoreError::from(e).to_string())?;

    let Some(path) = &options.output else {
        let format = options.format.unwrap_or_default();
        print!(
            "{}",
            ensure_newline(descriptor.render(format).map_err(|e| e.to_string())?)
        );
        return Ok(EXIT_SUCCESS);
    };

    let format = options
        .format
        .unwrap_or_else(|| DescriptorFormat::from_path(path));
    descriptor
        .write_to_file(path, format)
        .map_err(|e| format!("failed to write descriptor: {e}"))?;
    info!("wrote {format} descriptor to {}", path.display());
    let digest = descriptor.digest().map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "output": path,
            "format": format.to_string(),
            "digest": digest,
            "dependencies": descriptor.dependencies.len(),
            "repositories": descriptor.repositories.len(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote descriptor to {}", path.display());
        println!(
            "{} dependencies, {} repositories",
            descriptor.dependencies.len(),
            descriptor.repositories.len()
        );
        println!("digest: {}", digest.short());
    }
    Ok(EXIT_SUCCESS)
}

fn ensure_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}
