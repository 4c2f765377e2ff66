//! Merge and diff configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How two arrays are combined when both sides of a merge hold one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ArrayStrategy {
    /// The overlay's array replaces the base array wholesale.
    #[default]
    Replace,

    /// The overlay's items are appended after the base items.
    Concat,
}

/// How arrays are compared when computing a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DiffArrayStrategy {
    /// A differing array is recorded wholesale.
    #[default]
    Replace,

    /// Accepted for compatibility. Arrays are still recorded wholesale.
    Elements,
}

/// Options for [`merge`](crate::merge) and the provenance merge engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    pub array_strategy: ArrayStrategy,
}

/// Options for [`diff`](crate::diff).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    pub array_strategy: DiffArrayStrategy,
}

impl MergeOptions {
    pub fn with_array_strategy(mut self, array_strategy: ArrayStrategy) -> Self {
        self.array_strategy = array_strategy;
        self
    }
}

impl DiffOptions {
    pub fn with_array_strategy(mut self, array_strategy: DiffArrayStrategy) -> Self {
        self.array_strategy = array_strategy;
        self
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An option received a value outside its accepted set.
    #[error("Invalid value '{value}' for {option} (expected one of: {})", expected.join(", "))]
    InvalidConfiguration {
        /// Name of the option
        option: &'static str,
        /// The rejected value
        value: String,
        /// Accepted values
        expected: &'static [&'static str],
    },
}

impl ArrayStrategy {
    const NAMES: &'static [&'static str] = &["replace", "concat"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayStrategy::Replace => "replace",
            ArrayStrategy::Concat => "concat",
        }
    }
}

impl DiffArrayStrategy {
    const NAMES: &'static [&'static str] = &["replace", "elements"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffArrayStrategy::Replace => "replace",
            DiffArrayStrategy::Elements => "elements",
        }
    }
}

impl FromStr for ArrayStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(ArrayStrategy::Replace),
            "concat" => Ok(ArrayStrategy::Concat),
            other => Err(ConfigError::InvalidConfiguration {
                option: "arrayStrategy",
                value: other.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl FromStr for DiffArrayStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(DiffArrayStrategy::Replace),
            "elements" => Ok(DiffArrayStrategy::Elements),
            other => Err(ConfigError::InvalidConfiguration {
                option: "arrayStrategy",
                value: other.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl TryFrom<String> for ArrayStrategy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for DiffArrayStrategy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ArrayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DiffArrayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
