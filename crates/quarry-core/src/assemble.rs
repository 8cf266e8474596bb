use crate::descriptor::{DependencySet, ProjectDescriptor};
use crate::resolve::Resolver;
use crate::AssemblyError;
use quarry_schema::{BuildRequest, Catalog, DependencyToken, RepositoryEntry};
use tracing::debug;

/// Turns build requests into project descriptors against one catalog.
///
/// Holds only a shared borrow of the catalog, so a single assembler (or many)
/// can serve independent requests from multiple threads.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    catalog: &'a Catalog,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn assemble(&self, request: &BuildRequest) -> Result<ProjectDescriptor, AssemblyError> {
        let resolver = Resolver::new(self.catalog, request.runtime_version.as_deref());
        let catalog_version = request
            .catalog_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let bom = self.catalog.bom(catalog_version);

        let mut dependencies = DependencySet::default();
        for token in &request.dependencies {
            let coordinates = match DependencyToken::parse(token)? {
                DependencyToken::Capability(name) => {
                    resolver.expand_token(&name, token)?.coordinates
                }
                DependencyToken::Component(name) => resolver.component_token(&name, token)?,
                DependencyToken::Literal(coordinate) => vec![coordinate],
            };
            let resolved = coordinates.len();
            let added = dependencies.extend(coordinates);
            debug!(token = token.as_str(), resolved, added, "dependency token resolved");
        }

        let repositories = request
            .repositories
            .iter()
            .map(String::as_str)
            .map(RepositoryEntry::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let descriptor = ProjectDescriptor {
            project: request.project.clone(),
            dependency_management: vec![bom],
            dependencies: dependencies.into_vec(),
            repositories,
        };
        debug!(
            dependencies = descriptor.dependencies.len(),
            repositories = descriptor.repositories.len(),
            "descriptor assembled"
        );
        Ok(descriptor)
    }
}

/// Assemble `request` against `catalog`; the first failing token aborts.
pub fn assemble(
    catalog: &Catalog,
    request: &BuildRequest,
) -> Result<ProjectDescriptor, AssemblyError> {
    Assembler::new(catalog).assemble(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_schema::{Coordinate, RuntimeEntry};

    fn catalog() -> Catalog {
        Catalog::new("2.23.0", "org.apache.camel", "camel")
            .with_runtime(
                "jvm",
                RuntimeEntry::new("org.apache.camel.k", "camel-k-runtime-jvm", "jar")
                    .with_library(Coordinate::new("org.apache.camel", "camel-core")),
            )
            .with_runtime(
                "groovy",
                RuntimeEntry::new("org.apache.camel.k", "camel-k-runtime-groovy", "jar")
                    .implying("jvm")
                    .with_library(Coordinate::new("org.apache.camel", "camel-groovy")),
            )
    }

    #[test]
    fn direct_and_implied_capability_collapse() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_runtime_version("0.2.1")
            .with_dependency("runtime:jvm")
            .with_dependency("runtime:groovy");
        let descriptor = assemble(&catalog, &request).unwrap();
        let artifacts: Vec<&str> = descriptor
            .dependencies
            .iter()
            .map(|c| c.artifact_id.as_str())
            .collect();
        assert_eq!(
            artifacts,
            vec![
                "camel-k-runtime-jvm",
                "camel-core",
                "camel-k-runtime-groovy",
                "camel-groovy"
            ]
        );
    }

    #[test]
    fn literal_equal_to_expansion_is_not_duplicated() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_runtime_version("0.2.1")
            .with_dependency("org.apache.camel:camel-core")
            .with_dependency("runtime:jvm")
            .with_dependency("mvn:org.apache.camel:camel-core");
        let descriptor = assemble(&catalog, &request).unwrap();
        assert_eq!(descriptor.dependencies.len(), 2);
        assert_eq!(descriptor.dependencies[0].artifact_id, "camel-core");
    }

    #[test]
    fn versioned_literal_is_distinct_from_bare_one() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_dependency("org.acme:lib")
            .with_dependency("org.acme:lib:1.0");
        let descriptor = assemble(&catalog, &request).unwrap();
        assert_eq!(descriptor.dependencies.len(), 2);
    }

    #[test]
    fn catalog_version_override_applies_to_bom_only() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_runtime_version("0.2.1")
            .with_catalog_version("2.24.0")
            .with_dependency("runtime:jvm");
        let descriptor = assemble(&catalog, &request).unwrap();
        assert_eq!(
            descriptor.dependency_management[0].version.as_deref(),
            Some("2.24.0")
        );
        assert_eq!(descriptor.dependencies[0].version.as_deref(), Some("0.2.1"));
    }

    #[test]
    fn first_error_wins() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_runtime_version("0.2.1")
            .with_dependency("runtime:jvm")
            .with_dependency("justastring")
            .with_dependency("runtime:nonexistent")
            .with_repository("https://r@bogus");
        assert!(matches!(
            assemble(&catalog, &request).unwrap_err(),
            AssemblyError::MalformedDependency { ref token, .. } if token == "justastring"
        ));
    }

    #[test]
    fn malformed_repository_aborts() {
        let catalog = catalog();
        let request = BuildRequest::new()
            .with_repository("https://ok@id=ok")
            .with_repository("https://bad@frobnicate");
        assert!(matches!(
            assemble(&catalog, &request).unwrap_err(),
            AssemblyError::MalformedRepository { ref spec, .. } if spec == "https://bad@frobnicate"
        ));
    }

    #[test]
    fn empty_request_still_carries_bom() {
        let catalog = catalog();
        let descriptor = assemble(&catalog, &BuildRequest::new()).unwrap();
        assert_eq!(descriptor.dependency_management, vec![catalog.bom(None)]);
        assert!(descriptor.dependencies.is_empty());
        assert!(descriptor.repositories.is_empty());
    }
}
