use crate::coordinate::TokenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separates the base URL from the flag segments of a repository spec.
pub const SEGMENT_DELIMITER: char = '@';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    Fail,
    Warn,
    Ignore,
}

impl FromStr for ChecksumPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "unknown checksum policy '{other}', expected fail, warn or ignore"
            )),
        }
    }
}

impl fmt::Display for ChecksumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPolicy {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_policy: Option<ChecksumPolicy>,
}

impl RepositoryPolicy {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            checksum_policy: None,
        }
    }
}

/// A remote artifact repository, parsed from `<url>[@segment]*`.
///
/// Recognized segments: `id=<id>`, `name=<name>`, `checksumpolicy=<policy>`,
/// `snapshots`, `nosnapshots`, `releases`, `noreleases`. Releases default to
/// enabled and snapshots to disabled. Without an `id=` segment the id is the
/// URL itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    pub releases: RepositoryPolicy,
    pub snapshots: RepositoryPolicy,
}

impl RepositoryEntry {
    /// Build an entry with default policies (releases on, snapshots off).
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            name: None,
            url,
            releases: RepositoryPolicy::new(true),
            snapshots: RepositoryPolicy::new(false),
        }
    }

    /// Parse a compact repository spec.
    ///
    /// The first `@` ends the URL; later segments are applied left to right,
    /// so a repeated flag takes its last value.
    pub fn parse(spec: &str) -> Result<Self, TokenError> {
        let mut segments = spec.trim().split(SEGMENT_DELIMITER);
        let url = segments.next().unwrap_or_default().trim();
        if url.is_empty() {
            return Err(TokenError::repository(spec, "missing repository URL"));
        }

        let mut entry = Self::new(url);
        for segment in segments {
            apply_segment(&mut entry, spec, segment.trim())?;
        }
        Ok(entry)
    }
}

impl FromStr for RepositoryEntry {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn apply_segment(entry: &mut RepositoryEntry, spec: &str, segment: &str) -> Result<(), TokenError> {
    match segment {
        "" => return Err(TokenError::repository(spec, "empty segment")),
        "snapshots" => entry.snapshots.enabled = true,
        "nosnapshots" => entry.snapshots.enabled = false,
        "releases" => entry.releases.enabled = true,
        "noreleases" => entry.releases.enabled = false,
        _ => {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(TokenError::repository(
                    spec,
                    format!("unknown segment '{segment}'"),
                ));
            };
            let value = value.trim();
            if value.is_empty() {
                return Err(TokenError::repository(
                    spec,
                    format!("segment '{segment}' has an empty value"),
                ));
            }
            match key.trim() {
                "id" => entry.id = value.to_owned(),
                "name" => entry.name = Some(value.to_owned()),
                "checksumpolicy" => {
                    let policy: ChecksumPolicy = value
                        .parse()
                        .map_err(|e: String| TokenError::repository(spec, e))?;
                    entry.releases.checksum_policy = Some(policy);
                    entry.snapshots.checksum_policy = Some(policy);
                }
                other => {
                    return Err(TokenError::repository(
                        spec,
                        format!("unknown segment key '{other}'"),
                    ))
                }
            }
        }
    }
    Ok(())
}
