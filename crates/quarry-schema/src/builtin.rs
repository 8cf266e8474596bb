use crate::catalog::{parse_catalog_str, Catalog, CatalogError};

/// Catalog bundled with the binary, used when no catalog file is configured.
pub const DEFAULT_CATALOG: &str = r#"catalog_version = 1
version = "2.23.2"

[bom]
group_id = "org.apache.camel"
product = "camel"

[runtime_defaults]
group_id = "org.apache.camel.k"
artifact_prefix = "camel-k-runtime-"
type = "jar"
version = "0.2.1"

[runtimes.jvm]
libraries = ["org.apache.camel:camel-core"]

[runtimes.groovy]
implies = ["jvm"]
libraries = ["org.apache.camel:camel-groovy"]

[runtimes.kotlin]
implies = ["jvm"]

[runtimes.js]
implies = ["jvm"]

[runtimes.xml]
implies = ["jvm"]
libraries = ["org.apache.camel:camel-spring"]

[runtimes.java]
implies = ["jvm"]

[runtimes.spring-boot]
implies = ["jvm"]
libraries = ["org.apache.camel:camel-spring-boot"]

[components.http]
dependencies = ["org.apache.httpcomponents:httpclient"]

[components.jackson]

[components.kafka]

[components.netty-http]

[components.telegram]

[components.timer]
artifact_id = "camel-core"

[components.log]
artifact_id = "camel-core"
"#;

pub fn default_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog_str(DEFAULT_CATALOG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_parses() {
        let result = default_catalog();
        assert!(result.is_ok(), "default catalog failed: {:?}", result.err());
    }

    #[test]
    fn every_runtime_but_jvm_implies_jvm() {
        let catalog = default_catalog().unwrap();
        for (name, entry) in &catalog.runtimes {
            if name == "jvm" {
                assert!(entry.implies.is_empty());
            } else {
                assert!(
                    entry.implies.iter().any(|i| i == "jvm"),
                    "runtime '{name}' does not imply jvm"
                );
            }
        }
    }

    #[test]
    fn core_components_share_camel_core() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.component("timer").unwrap().artifact_id, "camel-core");
        assert_eq!(catalog.component("kafka").unwrap().artifact_id, "camel-kafka");
    }
}
