use crate::AssemblyError;
use quarry_schema::{CapabilityName, Catalog, Coordinate, COMPONENT_PREFIX, RUNTIME_PREFIX};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// The result of expanding one capability.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Expansion {
    /// Capabilities in the order they were first visited.
    pub capabilities: Vec<CapabilityName>,
    /// Distinct coordinates in first-insertion order.
    pub coordinates: Vec<Coordinate>,
}

enum Step<'a> {
    Expand(&'a CapabilityName),
    Emit(&'a [Coordinate]),
}

/// Looks capability and component names up in a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    runtime_version: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    /// `runtime_version` pins runtime artifacts; when unset (or blank) the
    /// catalog's default runtime version applies.
    pub fn new(catalog: &'a Catalog, runtime_version: Option<&'a str>) -> Self {
        let runtime_version = runtime_version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or(catalog.default_runtime_version.as_deref());
        Self {
            catalog,
            runtime_version,
        }
    }

    pub fn runtime_version(&self) -> Option<&'a str> {
        self.runtime_version
    }

    /// Expand `capability` into its ordered coordinate set.
    pub fn resolve(&self, capability: &str) -> Result<Vec<Coordinate>, AssemblyError> {
        self.expand(capability).map(|e| e.coordinates)
    }

    pub fn expand(&self, capability: &str) -> Result<Expansion, AssemblyError> {
        self.expand_token(capability, &format!("{RUNTIME_PREFIX}{capability}"))
    }

    /// Expansion is depth-first over an explicit stack: the capability's
    /// primary artifact, then each implied capability in declared order, then
    /// its fixed libraries. A capability already in the visited set is skipped.
    pub(crate) fn expand_token(
        &self,
        capability: &str,
        token: &str,
    ) -> Result<Expansion, AssemblyError> {
        let unknown = |name: &str| AssemblyError::UnknownCapability {
            token: token.to_owned(),
            name: name.to_owned(),
        };
        let (root, _) = self
            .catalog
            .runtimes
            .get_key_value(capability)
            .ok_or_else(|| unknown(capability))?;
        let version = self
            .runtime_version
            .ok_or_else(|| AssemblyError::MissingRuntimeVersion {
                token: token.to_owned(),
            })?;

        let mut visited: HashSet<&CapabilityName> = HashSet::new();
        let mut expansion = Expansion {
            capabilities: Vec::new(),
            coordinates: Vec::new(),
        };
        let mut stack = vec![Step::Expand(root)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Expand(name) => {
                    if !visited.insert(name) {
                        trace!("capability '{name}' already expanded, skipping");
                        continue;
                    }
                    let entry = self
                        .catalog
                        .runtime(name)
                        .ok_or_else(|| unknown(name.as_str()))?;
                    trace!("expanding capability '{name}'");
                    expansion.capabilities.push(name.clone());
                    push_unique(&mut expansion.coordinates, entry.primary(version));
                    stack.push(Step::Emit(&entry.libraries));
                    stack.extend(entry.implies.iter().rev().map(Step::Expand));
                }
                Step::Emit(libraries) => {
                    for library in libraries {
                        push_unique(&mut expansion.coordinates, library.clone());
                    }
                }
            }
        }

        Ok(expansion)
    }

    /// Expand a catalog component: its artifact in the BOM group, then its
    /// declared dependencies.
    pub fn resolve_component(&self, component: &str) -> Result<Vec<Coordinate>, AssemblyError> {
        self.component_token(component, &format!("{COMPONENT_PREFIX}{component}"))
    }

    pub(crate) fn component_token(
        &self,
        component: &str,
        token: &str,
    ) -> Result<Vec<Coordinate>, AssemblyError> {
        let entry =
            self.catalog
                .component(component)
                .ok_or_else(|| AssemblyError::UnknownComponent {
                    token: token.to_owned(),
                    name: component.to_owned(),
                })?;
        let mut coordinates = vec![Coordinate::new(
            &self.catalog.bom_group_id,
            &entry.artifact_id,
        )];
        for dependency in &entry.dependencies {
            push_unique(&mut coordinates, dependency.clone());
        }
        Ok(coordinates)
    }
}

fn push_unique(coordinates: &mut Vec<Coordinate>, coordinate: Coordinate) {
    if !coordinates.contains(&coordinate) {
        coordinates.push(coordinate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_schema::{ComponentEntry, RuntimeEntry};

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
            .with_runtime(
                "kotlin",
                RuntimeEntry::new("org.apache.camel.k", "camel-k-runtime-kotlin", "jar")
                    .implying("jvm")
                    .implying("groovy"),
            )
            .with_component(
                "http",
                ComponentEntry {
                    artifact_id: "camel-http".to_owned(),
                    dependencies: vec![Coordinate::new("org.apache.httpcomponents", "httpclient")],
                },
            )
    }

    fn runtime(artifact: &str) -> Coordinate {
        Coordinate::new("org.apache.camel.k", artifact)
            .with_version("0.2.1")
            .with_type("jar")
    }

    #[test]
    fn jvm_expands_to_primary_then_library() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, Some("0.2.1"));
        assert_eq!(
            resolver.resolve("jvm").unwrap(),
            vec![
                runtime("camel-k-runtime-jvm"),
                Coordinate::new("org.apache.camel", "camel-core"),
            ]
        );
    }

    #[test]
    fn groovy_expands_implied_before_own_libraries() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, Some("0.2.1"));
        assert_eq!(
            resolver.resolve("groovy").unwrap(),
            vec![
                runtime("camel-k-runtime-groovy"),
                runtime("camel-k-runtime-jvm"),
                Coordinate::new("org.apache.camel", "camel-core"),
                Coordinate::new("org.apache.camel", "camel-groovy"),
            ]
        );
    }

    #[test]
    fn shared_implication_is_visited_once() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, Some("0.2.1"));
        let expansion = resolver.expand("kotlin").unwrap();
        assert_eq!(expansion.capabilities, vec!["kotlin", "jvm", "groovy"]);
        assert_eq!(expansion.coordinates.len(), 5);
    }

    #[test]
    fn cyclic_implications_terminate() {
        let catalog = Catalog::new("1", "g", "p")
            .with_runtime("a", RuntimeEntry::new("g", "a", "jar").implying("b"))
            .with_runtime("b", RuntimeEntry::new("g", "b", "jar").implying("a"));
        let resolver = Resolver::new(&catalog, Some("1.0"));
        let expansion = resolver.expand("a").unwrap();
        assert_eq!(expansion.capabilities, vec!["a", "b"]);
        assert_eq!(expansion.coordinates.len(), 2);
    }

    #[test]
    fn unknown_capability_fails() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, Some("0.2.1"));
        assert_eq!(
            resolver.resolve("nonexistent").unwrap_err(),
            AssemblyError::UnknownCapability {
                token: "runtime:nonexistent".to_owned(),
                name: "nonexistent".to_owned(),
            }
        );
    }

    #[test]
    fn dangling_implication_reports_missing_name() {
        let catalog = Catalog::new("1", "g", "p")
            .with_runtime("a", RuntimeEntry::new("g", "a", "jar").implying("ghost"));
        let err = Resolver::new(&catalog, Some("1.0")).resolve("a").unwrap_err();
        assert!(
            matches!(err, AssemblyError::UnknownCapability { ref name, .. } if name == "ghost"),
            "{err}"
        );
    }

    #[test]
    fn missing_runtime_version_falls_back_to_catalog_default() {
        let mut catalog = catalog();
        let err = Resolver::new(&catalog, None).resolve("jvm").unwrap_err();
        assert!(matches!(err, AssemblyError::MissingRuntimeVersion { .. }));

        catalog.default_runtime_version = Some("0.2.1".to_owned());
        let resolver = Resolver::new(&catalog, Some("  "));
        assert_eq!(resolver.runtime_version(), Some("0.2.1"));
        assert_eq!(resolver.resolve("jvm").unwrap()[0], runtime("camel-k-runtime-jvm"));
    }

    #[test]
    fn component_resolves_in_bom_group() {
        let catalog = catalog();
        let resolver = Resolver::new(&catalog, None);
        assert_eq!(
            resolver.resolve_component("http").unwrap(),
            vec![
                Coordinate::new("org.apache.camel", "camel-http"),
                Coordinate::new("org.apache.httpcomponents", "httpclient"),
            ]
        );
        assert!(matches!(
            resolver.resolve_component("ftp").unwrap_err(),
            AssemblyError::UnknownComponent { .. }
        ));
    }
}
