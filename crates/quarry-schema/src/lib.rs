//! Input schema for Quarry: dependency tokens, repository specs, catalogs, and requests.
//!
//! This crate defines everything the assembly core reads: literal and
//! capability dependency tokens (`DependencyToken`, `Coordinate`), compact
//! repository specs (`RepositoryEntry`), the validated capability catalog
//! (`Catalog`, loaded from TOML via `CatalogV1`), build requests
//! (`BuildRequest`), and the built-in default catalog.

pub mod builtin;
pub mod catalog;
pub mod coordinate;
pub mod repository;
pub mod request;
pub mod types;

pub use builtin::{default_catalog, DEFAULT_CATALOG};
pub use catalog::{
    parse_catalog_file, parse_catalog_str, BomSection, Catalog, CatalogError, CatalogV1,
    ComponentEntry, ComponentSection, RuntimeDefaults, RuntimeEntry, RuntimeSection,
};
pub use coordinate::{
    Coordinate, DependencyToken, TokenError, COMPONENT_PREFIX, MAVEN_PREFIX, RUNTIME_PREFIX,
};
pub use repository::{ChecksumPolicy, RepositoryEntry, RepositoryPolicy, SEGMENT_DELIMITER};
pub use request::{parse_request_file, parse_request_str, BuildRequest, ProjectIdentity, RequestError};
pub use types::{CapabilityName, ComponentName, DescriptorDigest};
