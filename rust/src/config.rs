//! Configuration types for the CPM engine.

use pyo3::prelude::*;
use std::fmt;
use std::str::FromStr;

use crate::logging::VERBOSITY_SILENT;

/// How repeated task codes in one input set are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Abort evaluation on the first repeated code.
    #[default]
    Reject,
    /// Keep the first record with a code and drop every later one.
    KeepFirst,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "keep_first" => Ok(Self::KeepFirst),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::KeepFirst => write!(f, "keep_first"),
        }
    }
}

/// Configuration for a single `evaluate` call.
#[pyclass]
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Duplicate task code handling: "reject" or "keep_first"
    #[pyo3(get, set)]
    pub duplicate_policy: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbosity: VERBOSITY_SILENT,
            duplicate_policy: DuplicatePolicy::default().to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse the configured duplicate policy.
    ///
    /// Returns the unrecognized value on failure.
    pub fn duplicate_policy(&self) -> Result<DuplicatePolicy, String> {
        self.duplicate_policy.parse()
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy.to_string();
        self
    }
}

#[pymethods]
impl EngineConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, duplicate_policy=None))]
    fn new(verbosity: Option<u8>, duplicate_policy: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            duplicate_policy: duplicate_policy.unwrap_or(defaults.duplicate_policy),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig(verbosity={}, duplicate_policy={:?})",
            self.verbosity, self.duplicate_policy
        )
    }
}
