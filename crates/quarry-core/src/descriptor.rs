use crate::CoreError;
use quarry_schema::{Coordinate, DescriptorDigest, ProjectIdentity, RepositoryEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// The assembled build project, ready for a packaging tool.
///
/// `dependency_management` always holds exactly one BOM import.
/// `dependencies` keeps first-insertion order with no duplicates;
/// `repositories` keeps request order and is not de-duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub project: ProjectIdentity,
    pub dependency_management: Vec<Coordinate>,
    pub dependencies: Vec<Coordinate>,
    pub repositories: Vec<RepositoryEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptorFormat {
    #[default]
    Json,
    Toml,
}

impl DescriptorFormat {
    /// Pick a format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl FromStr for DescriptorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(format!("unknown descriptor format '{other}', expected json or toml")),
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Toml => "toml",
        })
    }
}

impl ProjectDescriptor {
    /// Compact JSON in field declaration order; the input to [`Self::digest`].
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn render(&self, format: DescriptorFormat) -> Result<String, CoreError> {
        match format {
            DescriptorFormat::Json => self.to_json_pretty(),
            DescriptorFormat::Toml => self.to_toml(),
        }
    }

    /// Blake3 digest of the canonical JSON form.
    ///
    /// Equal descriptors always produce equal digests, so a caller can reuse
    /// a project already built for the same digest.
    pub fn digest(&self) -> Result<DescriptorDigest, CoreError> {
        let json = self.canonical_json()?;
        Ok(DescriptorDigest::new(
            blake3::hash(json.as_bytes()).to_hex().to_string(),
        ))
    }

    /// Atomically write the rendered descriptor to `path`.
    pub fn write_to_file(
        &self,
        path: impl AsRef<Path>,
        format: DescriptorFormat,
    ) -> Result<(), CoreError> {
        let path = path.as_ref();
        let content = self.render(format)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match DescriptorFormat::from_path(path) {
            DescriptorFormat::Json => Ok(serde_json::from_str(&content)?),
            DescriptorFormat::Toml => Ok(toml::from_str(&content)?),
        }
    }
}

/// Insertion-ordered coordinate set.
#[derive(Debug, Default)]
pub(crate) struct DependencySet {
    order: Vec<Coordinate>,
    seen: HashSet<Coordinate>,
}

impl DependencySet {
    /// Returns `false` when an equal coordinate is already present.
    pub(crate) fn insert(&mut self, coordinate: Coordinate) -> bool {
        if self.seen.contains(&coordinate) {
            return false;
        }
        self.seen.insert(coordinate.clone());
        self.order.push(coordinate);
        true
    }

    /// Returns how many coordinates were new.
    pub(crate) fn extend(&mut self, coordinates: impl IntoIterator<Item = Coordinate>) -> usize {
        coordinates
            .into_iter()
            .map(|c| self.insert(c))
            .filter(|inserted| *inserted)
            .count()
    }

    pub(crate) fn into_vec(self) -> Vec<Coordinate> {
        self.order
    }
}
