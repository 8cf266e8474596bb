use crate::types::{CapabilityName, ComponentName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of a capability reference (`runtime:groovy`).
pub const RUNTIME_PREFIX: &str = "runtime:";
/// Prefix of a catalog component reference (`camel:http`).
pub const COMPONENT_PREFIX: &str = "camel:";
/// Optional prefix of a literal Maven coordinate (`mvn:org.acme:lib:1.0`).
pub const MAVEN_PREFIX: &str = "mvn:";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed dependency '{token}': {reason}")]
    MalformedDependency { token: String, reason: String },
    #[error("malformed repository '{spec}': {reason}")]
    MalformedRepository { spec: String, reason: String },
}

impl TokenError {
    pub(crate) fn dependency(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDependency {
            token: token.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn repository(spec: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRepository {
            spec: spec.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A structured artifact reference.
///
/// Equality and hashing cover every field, so `org.acme:lib` and
/// `org.acme:lib:1.0` are distinct coordinates. Unset `version`, `packaging`
/// and `scope` are left for the dependency-management import to supply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            packaging: None,
            scope: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Parse a literal `<group>:<artifact>[:<version>]` coordinate.
    ///
    /// A leading `mvn:` prefix is accepted and stripped.
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let trimmed = token.trim();
        let body = trimmed.strip_prefix(MAVEN_PREFIX).unwrap_or(trimmed);
        parse_literal(token, body)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        match (&self.packaging, &self.scope) {
            (Some(t), Some(s)) => write!(f, " ({t}, {s})"),
            (Some(t), None) => write!(f, " ({t})"),
            (None, Some(s)) => write!(f, " ({s})"),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for Coordinate {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A classified dependency token from a build request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyToken {
    /// `runtime:<name>`, expanded through the catalog runtime table.
    Capability(CapabilityName),
    /// `camel:<name>`, expanded through the catalog component table.
    Component(ComponentName),
    /// `[mvn:]<group>:<artifact>[:<version>]`, passed through unchanged.
    Literal(Coordinate),
}

impl DependencyToken {
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let trimmed = token.trim();
        if let Some(name) = trimmed.strip_prefix(RUNTIME_PREFIX) {
            let name = parse_name(token, name)?;
            return Ok(Self::Capability(CapabilityName::new(name)));
        }
        if let Some(name) = trimmed.strip_prefix(COMPONENT_PREFIX) {
            let name = parse_name(token, name)?;
            return Ok(Self::Component(ComponentName::new(name)));
        }
        Coordinate::parse(token).map(Self::Literal)
    }
}

impl FromStr for DependencyToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_name<'a>(token: &str, name: &'a str) -> Result<&'a str, TokenError> {
    if name.is_empty() {
        return Err(TokenError::dependency(token, "missing name after prefix"));
    }
    if name.contains(':') || name.chars().any(char::is_whitespace) {
        return Err(TokenError::dependency(
            token,
            "name must not contain ':' or whitespace",
        ));
    }
    Ok(name)
}

fn parse_literal(token: &str, body: &str) -> Result<Coordinate, TokenError> {
    let segments: Vec<&str> = body.split(':').collect();
    if segments.len() < 2 {
        return Err(TokenError::dependency(
            token,
            "expected <group>:<artifact>[:<version>]",
        ));
    }
    if segments.len() > 3 {
        return Err(TokenError::dependency(
            token,
            "too many ':' separated segments",
        ));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::dependency(token, "empty coordinate segment"));
    }
    if segments.iter().any(|s| s.chars().any(char::is_whitespace)) {
        return Err(TokenError::dependency(
            token,
            "whitespace inside coordinate segment",
        ));
    }

    let mut coordinate = Coordinate::new(segments[0], segments[1]);
    if let Some(version) = segments.get(2) {
        coordinate = coordinate.with_version(*version);
    }
    Ok(coordinate)
}
