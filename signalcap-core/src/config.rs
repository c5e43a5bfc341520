use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Version of this crate, offered to callers that want to stamp results
/// with it. The engine never reads it on its own.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Semantic version string (`MAJOR.MINOR.PATCH[-pre][+build]`) stamped on
/// every result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EngineVersion(String);

impl EngineVersion {
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `version` is not a semantic version.
    pub fn parse(version: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            Error::invalid_input("engine_version", format!("'{version}' {reason}"))
        };

        let without_build = match version.split_once('+') {
            Some((head, build)) => {
                if !valid_identifiers(build, false) {
                    return Err(invalid("has malformed build metadata"));
                }
                head
            }
            None => version,
        };
        let core = match without_build.split_once('-') {
            Some((head, pre)) => {
                if !valid_identifiers(pre, true) {
                    return Err(invalid("has a malformed pre-release"));
                }
                head
            }
            None => without_build,
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 || !parts.iter().all(|part| numeric_identifier(part)) {
            return Err(invalid("is not MAJOR.MINOR.PATCH"));
        }
        Ok(Self(version.to_owned()))
    }

    /// The version of this crate.
    pub fn current() -> Self {
        Self(ENGINE_VERSION.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn numeric_identifier(part: &str) -> bool {
    !part.is_empty()
        && part.bytes().all(|b| b.is_ascii_digit())
        && (part == "0" || !part.starts_with('0'))
}

fn valid_identifiers(identifiers: &str, numeric_leading_zero_forbidden: bool) -> bool {
    identifiers.split('.').all(|id| {
        !id.is_empty()
            && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && (!numeric_leading_zero_forbidden
                || !id.bytes().all(|b| b.is_ascii_digit())
                || numeric_identifier(id))
    })
}

impl FromStr for EngineVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EngineVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EngineVersion> for String {
    fn from(version: EngineVersion) -> Self {
        version.0
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings for one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub engine_version: EngineVersion,
    /// Evaluate lane groups on the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl EngineConfig {
    pub fn new(engine_version: EngineVersion) -> Self {
        Self {
            engine_version,
            parallel: true,
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `engine_version` is not a semantic version.
    pub fn with_version(engine_version: &str) -> Result<Self, Error> {
        EngineVersion::parse(engine_version).map(Self::new)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(EngineVersion::current())
    }
}
