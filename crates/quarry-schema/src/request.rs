use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse request: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported request_version: {0}, expected 1")]
    UnsupportedVersion(u32),
}

/// A single build request: what to depend on and where to fetch it from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildRequest {
    #[serde(default = "default_request_version")]
    pub request_version: u32,
    /// Version pinned on runtime artifacts expanded from `runtime:` tokens.
    #[serde(default)]
    pub runtime_version: Option<String>,
    /// Overrides the catalog version used for the BOM import.
    #[serde(default)]
    pub catalog_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub project: ProjectIdentity,
}

/// Coordinates of the generated project itself.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectIdentity {
    #[serde(default = "default_project_group")]
    pub group_id: String,
    #[serde(default = "default_project_artifact")]
    pub artifact_id: String,
    #[serde(default = "default_project_version")]
    pub version: String,
}

impl Default for ProjectIdentity {
    fn default() -> Self {
        Self {
            group_id: default_project_group(),
            artifact_id: default_project_artifact(),
            version: default_project_version(),
        }
    }
}

fn default_request_version() -> u32 {
    1
}

fn default_project_group() -> String {
    "org.apache.camel.k.integration".to_owned()
}

fn default_project_artifact() -> String {
    "camel-k-integration".to_owned()
}

fn default_project_version() -> String {
    "1.0.0".to_owned()
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            request_version: default_request_version(),
            runtime_version: None,
            catalog_version: None,
            dependencies: Vec::new(),
            repositories: Vec::new(),
            project: ProjectIdentity::default(),
        }
    }
}

impl BuildRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_catalog_version(mut self, version: impl Into<String>) -> Self {
        self.catalog_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, token: impl Into<String>) -> Self {
        self.dependencies.push(token.into());
        self
    }

    #[must_use]
    pub fn with_repository(mut self, spec: impl Into<String>) -> Self {
        self.repositories.push(spec.into());
        self
    }
}

pub fn parse_request_str(input: &str) -> Result<BuildRequest, RequestError> {
    let request: BuildRequest = toml::from_str(input)?;
    if request.request_version != 1 {
        return Err(RequestError::UnsupportedVersion(request.request_version));
    }
    Ok(request)
}

pub fn parse_request_file(path: impl AsRef<Path>) -> Result<BuildRequest, RequestError> {
    let content = fs::read_to_string(path)?;
    parse_request_str(&content)
}
