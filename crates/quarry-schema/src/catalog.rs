use crate::coordinate::{Coordinate, TokenError};
use crate::types::{CapabilityName, ComponentName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported catalog_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{0} table contains an empty name")]
    EmptyName(&'static str),
    #[error("{table} table defines '{name}' more than once")]
    DuplicateName { table: &'static str, name: String },
    #[error("runtime '{runtime}' implies unknown runtime '{implied}'")]
    UnknownImplied { runtime: String, implied: String },
    #[error("invalid coordinate in '{owner}': {source}")]
    InvalidLibrary {
        owner: String,
        #[source]
        source: TokenError,
    },
}

/// On-disk catalog document, version 1.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogV1 {
    pub catalog_version: u32,
    pub version: String,
    pub bom: BomSection,
    #[serde(default)]
    pub runtime_defaults: RuntimeDefaults,
    #[serde(default)]
    pub runtimes: BTreeMap<String, RuntimeSection>,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentSection>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BomSection {
    pub group_id: String,
    pub product: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeDefaults {
    #[serde(default = "default_runtime_group")]
    pub group_id: String,
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,
    #[serde(rename = "type", default = "default_packaging")]
    pub packaging: String,
    /// Runtime version used when a request does not pin one.
    #[serde(default)]
    pub version: Option<String>,
}

impl Default for RuntimeDefaults {
    fn default() -> Self {
        Self {
            group_id: default_runtime_group(),
            artifact_prefix: default_artifact_prefix(),
            packaging: default_packaging(),
            version: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(rename = "type", default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub implies: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ComponentSection {
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_runtime_group() -> String {
    "org.apache.camel.k".to_owned()
}

fn default_artifact_prefix() -> String {
    "camel-k-runtime-".to_owned()
}

fn default_packaging() -> String {
    "jar".to_owned()
}

/// Validated, immutable capability catalog.
///
/// Runtime and component tables are keyed by name in sorted order, so
/// iteration is deterministic. Resolution borrows the catalog; it is never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    /// Catalog version, also the version of the BOM import.
    pub version: String,
    pub bom_group_id: String,
    /// Product name; the BOM artifact is `<product>-bom`.
    pub product: String,
    #[serde(default)]
    pub default_runtime_version: Option<String>,
    pub runtimes: BTreeMap<CapabilityName, RuntimeEntry>,
    pub components: BTreeMap<ComponentName, ComponentEntry>,
}

/// How a single runtime capability expands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeEntry {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(rename = "type")]
    pub packaging: String,
    /// Capabilities that must be resolved alongside this one, in order.
    pub implies: Vec<CapabilityName>,
    /// Version-less libraries the capability always requires.
    pub libraries: Vec<Coordinate>,
}

impl RuntimeEntry {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        packaging: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            packaging: packaging.into(),
            implies: Vec::new(),
            libraries: Vec::new(),
        }
    }

    #[must_use]
    pub fn implying(mut self, capability: impl Into<CapabilityName>) -> Self {
        self.implies.push(capability.into());
        self
    }

    #[must_use]
    pub fn with_library(mut self, library: Coordinate) -> Self {
        self.libraries.push(library);
        self
    }

    /// The primary runtime artifact pinned to `runtime_version`.
    pub fn primary(&self, runtime_version: &str) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id)
            .with_version(runtime_version)
            .with_type(&self.packaging)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentEntry {
    pub artifact_id: String,
    pub dependencies: Vec<Coordinate>,
}

impl Catalog {
    pub fn new(
        version: impl Into<String>,
        bom_group_id: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            bom_group_id: bom_group_id.into(),
            product: product.into(),
            default_runtime_version: None,
            runtimes: BTreeMap::new(),
            components: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_runtime(mut self, name: impl Into<CapabilityName>, entry: RuntimeEntry) -> Self {
        self.runtimes.insert(name.into(), entry);
        self
    }

    #[must_use]
    pub fn with_component(mut self, name: impl Into<ComponentName>, entry: ComponentEntry) -> Self {
        self.components.insert(name.into(), entry);
        self
    }

    pub fn runtime(&self, name: &str) -> Option<&RuntimeEntry> {
        self.runtimes.get(name)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentEntry> {
        self.components.get(name)
    }

    /// The `<product>-bom` import, at `version` or the catalog's own version.
    pub fn bom(&self, version: Option<&str>) -> Coordinate {
        Coordinate::new(&self.bom_group_id, format!("{}-bom", self.product))
            .with_version(version.unwrap_or(&self.version))
            .with_type("pom")
            .with_scope("import")
    }
}

impl CatalogV1 {
    /// Validate the document and resolve per-entry defaults.
    pub fn normalize(&self) -> Result<Catalog, CatalogError> {
        if self.catalog_version != 1 {
            return Err(CatalogError::UnsupportedVersion(self.catalog_version));
        }

        let version = required(&self.version, "version")?;
        let bom_group_id = required(&self.bom.group_id, "bom.group_id")?;
        let product = required(&self.bom.product, "bom.product")?;
        let defaults = &self.runtime_defaults;
        let default_runtime_version = defaults
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        let mut runtimes = BTreeMap::new();
        for (raw_name, section) in &self.runtimes {
            let name = raw_name.trim();
            if name.is_empty() {
                return Err(CatalogError::EmptyName("runtimes"));
            }
            let entry = RuntimeEntry {
                group_id: override_or(section.group_id.as_deref(), &defaults.group_id),
                artifact_id: section
                    .artifact_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map_or_else(|| format!("{}{name}", defaults.artifact_prefix), str::to_owned),
                packaging: override_or(section.packaging.as_deref(), &defaults.packaging),
                implies: section
                    .implies
                    .iter()
                    .map(|i| CapabilityName::new(i.trim()))
                    .collect(),
                libraries: parse_coordinates(name, &section.libraries)?,
            };
            if runtimes.insert(CapabilityName::new(name), entry).is_some() {
                return Err(CatalogError::DuplicateName {
                    table: "runtimes",
                    name: name.to_owned(),
                });
            }
        }

        for (name, entry) in &runtimes {
            if let Some(missing) = entry.implies.iter().find(|i| !runtimes.contains_key(*i)) {
                return Err(CatalogError::UnknownImplied {
                    runtime: name.to_string(),
                    implied: missing.to_string(),
                });
            }
        }

        let mut components = BTreeMap::new();
        for (raw_name, section) in &self.components {
            let name = raw_name.trim();
            if name.is_empty() {
                return Err(CatalogError::EmptyName("components"));
            }
            let entry = ComponentEntry {
                artifact_id: section
                    .artifact_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map_or_else(|| format!("{product}-{name}"), str::to_owned),
                dependencies: parse_coordinates(name, &section.dependencies)?,
            };
            if components.insert(ComponentName::new(name), entry).is_some() {
                return Err(CatalogError::DuplicateName {
                    table: "components",
                    name: name.to_owned(),
                });
            }
        }

        Ok(Catalog {
            version,
            bom_group_id,
            product,
            default_runtime_version,
            runtimes,
            components,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

fn override_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

fn parse_coordinates(owner: &str, tokens: &[String]) -> Result<Vec<Coordinate>, CatalogError> {
    tokens
        .iter()
        .map(|t| {
            Coordinate::parse(t).map_err(|source| CatalogError::InvalidLibrary {
                owner: owner.to_owned(),
                source,
            })
        })
        .collect()
}

pub fn parse_catalog_str(input: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogV1 = toml::from_str(input)?;
    document.normalize()
}

pub fn parse_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    parse_catalog_str(&content)
}
