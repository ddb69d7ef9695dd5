//! Upstream credential lookup

use std::collections::HashMap;

use crate::proxy::error::ProxyError;

pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const DEEPL_API_KEY: &str = "DEEPL_API_KEY";

/// Every key the proxy can ask for
pub const ALL_KEYS: [&str; 2] = [OPENROUTER_API_KEY, DEEPL_API_KEY];

/// Where handlers get their upstream API keys from.
///
/// Empty values are treated the same as unset ones.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the process environment on every lookup.
    Environment,
    /// Fixed values captured up front.
    Static(HashMap<String, String>),
}

impl CredentialSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Static(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn resolve(&self, key: &str) -> Result<String, ProxyError> {
        let value = match self {
            CredentialSource::Environment => std::env::var(key).ok(),
            CredentialSource::Static(values) => values.get(key).cloned(),
        };

        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ProxyError::MissingCredential(key.to_string())),
        }
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.resolve(key).is_ok()
    }

    /// Keys from `keys` that currently resolve to nothing
    pub fn missing<'a>(&self, keys: &[&'a str]) -> Vec<&'a str> {
        keys.iter().copied().filter(|k| !self.is_set(k)).collect()
    }
}
