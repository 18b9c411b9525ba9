//! Validated value types shared by the ResQ crates.
//!
//! These types enforce their invariants at construction and on deserialisation, so core and API
//! code can accept them without re-checking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Errors that can occur when constructing validated values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace.
    #[error("text cannot be empty")]
    EmptyText,
    /// Severity outside the 1-10 clinical acuity scale.
    #[error("severity {0} is outside the range 1-10")]
    SeverityOutOfRange(i64),
    /// Ward label other than `ICU` or `OP`.
    #[error("unknown ward type: {0:?}")]
    UnknownWard(String),
}

/// Bed category a patient needs on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum WardType {
    /// Intensive care.
    #[serde(rename = "ICU")]
    Icu,
    /// General ward / outpatient.
    #[serde(rename = "OP")]
    Op,
}

impl WardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WardType::Icu => "ICU",
            WardType::Op => "OP",
        }
    }
}

impl fmt::Display for WardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WardType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ICU" => Ok(WardType::Icu),
            "OP" => Ok(WardType::Op),
            other => Err(TypeError::UnknownWard(other.to_owned())),
        }
    }
}

/// Clinical acuity score on the 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a severity, rejecting values outside 1-10.
    pub fn new(value: i64) -> Result<Self, TypeError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypeError::SeverityOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Ward the triage protocol assigns to this score: ICU above 7, general otherwise.
    pub fn indicated_ward(&self) -> WardType {
        if self.0 > 7 {
            WardType::Icu
        } else {
            WardType::Op
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Severity::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A string type that guarantees non-empty content.
///
/// Input is trimmed during construction; whitespace-only input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(s).map_err(serde::de::Error::custom)
    }
}
