//! Capability resolution and build-descriptor assembly for Quarry.
//!
//! Given an immutable [`Catalog`](quarry_schema::Catalog) and a
//! [`BuildRequest`](quarry_schema::BuildRequest), the `Assembler` expands
//! `runtime:` and `camel:` tokens through the `Resolver`, merges them with
//! literal coordinates into an insertion-ordered set, parses repository specs,
//! and emits a `ProjectDescriptor` carrying exactly one BOM import. Assembly
//! is a pure function of its inputs; the descriptor module handles rendering,
//! digesting, and writing the result.

pub mod assemble;
pub mod descriptor;
pub mod resolve;

pub use assemble::{assemble, Assembler};
pub use descriptor::{DescriptorFormat, ProjectDescriptor};
pub use resolve::{Expansion, Resolver};

use quarry_schema::TokenError;
use thiserror::Error;

/// Failure of a single assembly. The first offending token is reported and
/// no partial descriptor is produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("malformed dependency '{token}': {reason}")]
    MalformedDependency { token: String, reason: String },
    #[error("malformed repository '{spec}': {reason}")]
    MalformedRepository { spec: String, reason: String },
    #[error("unknown capability '{name}' requested by '{token}'")]
    UnknownCapability { token: String, name: String },
    #[error("unknown component '{name}' requested by '{token}'")]
    UnknownComponent { token: String, name: String },
    #[error("'{token}' requires a runtime version but none is pinned")]
    MissingRuntimeVersion { token: String },
}

impl From<TokenError> for AssemblyError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MalformedDependency { token, reason } => {
                Self::MalformedDependency { token, reason }
            }
            TokenError::MalformedRepository { spec, reason } => {
                Self::MalformedRepository { spec, reason }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("catalog error: {0}")]
    Catalog(#[from] quarry_schema::CatalogError),
    #[error("request error: {0}")]
    Request(#[from] quarry_schema::RequestError),
    #[error("request error: {0}")]
    Repository(#[from] TokenError),
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_schema::{parse_catalog_str, RepositoryEntry};

    #[test]
    fn core_error_prefixes_identify_the_stage() {
        let catalog = parse_catalog_str("catalog_version = 7").unwrap_err();
        assert!(CoreError::from(catalog).to_string().starts_with("catalog error: "));

        let repository = RepositoryEntry::parse("@id=x").unwrap_err();
        assert!(CoreError::from(repository).to_string().starts_with("request error: "));

        let assembly = AssemblyError::MissingRuntimeVersion {
            token: "runtime:jvm".to_owned(),
        };
        assert_eq!(
            CoreError::from(assembly).to_string(),
            "assembly error: 'runtime:jvm' requires a runtime version but none is pinned"
        );
    }
}
