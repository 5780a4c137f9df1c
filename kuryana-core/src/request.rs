//! Inbound request types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::kind::ResourceKind;

/// A single option value. Route layers usually hand everything over as
/// strings; integer options accept either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Str(String),
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Caller options such as `page`, `limit`, `sort`, `after`, `year`, `quarter`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryOptions(BTreeMap<String, OptionValue>);

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Integer option; `Invalid` when present but not an integer.
    pub fn int(&self, key: &str) -> Result<Option<i64>, ResolveError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(OptionValue::Int(v)) => Ok(Some(*v)),
            Some(OptionValue::Str(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
                ResolveError::Invalid(format!("option '{key}' must be an integer, got '{s}'"))
            }),
        }
    }

    /// Integer option constrained to `min..=max`, with a default.
    pub fn int_in_range(
        &self,
        key: &str,
        min: i64,
        max: i64,
        default: i64,
    ) -> Result<i64, ResolveError> {
        let value = self.int(key)?.unwrap_or(default);
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(ResolveError::Invalid(format!(
                "option '{key}' must be between {min} and {max}, got {value}"
            )))
        }
    }

    /// String option; integers are rendered in decimal.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|value| match value {
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Str(s) => s.clone(),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for QueryOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One inbound call. Built per request, consumed by a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub identifier: String,
    pub options: QueryOptions,
}

impl ResourceRequest {
    /// Rejects an empty identifier up front.
    pub fn new(
        kind: ResourceKind,
        identifier: impl Into<String>,
        options: QueryOptions,
    ) -> Result<Self, ResolveError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ResolveError::Invalid("identifier must not be empty".to_string()));
        }
        Ok(Self {
            kind,
            identifier,
            options,
        })
    }
}
