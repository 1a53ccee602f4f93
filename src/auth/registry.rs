//! # Key Registry
//!
//! Static mapping from API key to the one table that key may touch.
//!
//! Built once at startup and shared read-only with every request handler.
//!
//! ## Invariants
//! - Every registered table name is a plain SQL identifier
//! - SQLite folds identifier case, so two spellings of one name that differ
//!   only in case are refused; they would address the same table
//! - A [`TableName`] can only be obtained from the registry, so storage
//!   code never sees a name that is not on the allow-list
//! - Keys are compared in constant time

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::{ConfigError, ConfigResult};

/// One `{ key, table }` pair from the API key file
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    pub key: String,
    pub table: String,
}

impl ApiKeyEntry {
    pub fn new(key: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            table: table.into(),
        }
    }
}

// Keys are secrets; keep them out of debug logs.
impl fmt::Debug for ApiKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyEntry")
            .field("key", &mask_key(&self.key))
            .field("table", &self.table)
            .finish()
    }
}

/// A table name that passed the registry allow-list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    fn parse(name: &str) -> Option<Self> {
        static IDENT: OnceLock<Regex> = OnceLock::new();
        let ident = IDENT.get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").expect("identifier pattern is valid")
        });

        // sqlite_* names belong to SQLite itself
        let reserved = name
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sqlite_"));
        (ident.is_match(name) && !reserved).then(|| Self(name.to_string()))
    }

    /// Same table as far as SQLite is concerned
    fn same_table(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for interpolation into statement text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable key → table registry
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    entries: Vec<(String, TableName)>,
}

impl KeyRegistry {
    /// Build a registry from raw entries, validating every one.
    ///
    /// Duplicate keys are kept; lookups return the first matching entry.
    pub fn from_entries(entries: Vec<ApiKeyEntry>) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        let mut validated: Vec<(String, TableName)> = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            if entry.key.is_empty() {
                return Err(ConfigError::EmptyKey { index });
            }

            let table = TableName::parse(&entry.table).ok_or_else(|| {
                ConfigError::InvalidTableName {
                    index,
                    table: entry.table.clone(),
                }
            })?;

            if let Some((_, existing)) = validated
                .iter()
                .find(|(_, t)| t.same_table(table.as_str()) && t.as_str() != table.as_str())
            {
                return Err(ConfigError::TableNameCollision {
                    index,
                    table: entry.table.clone(),
                    existing: existing.to_string(),
                });
            }

            if !seen.insert(entry.key.clone()) {
                tracing::warn!(
                    index,
                    key = %mask_key(&entry.key),
                    "duplicate API key in registry, first entry wins"
                );
            }

            validated.push((entry.key, table));
        }

        Ok(Self { entries: validated })
    }

    /// Resolve a presented token to its bound table
    pub fn lookup(&self, token: &str) -> Option<&TableName> {
        let mut found = None;
        // Visit every entry so timing does not reveal the match position.
        for (key, table) in &self.entries {
            let matches: bool = key.as_bytes().ct_eq(token.as_bytes()).into();
            if matches && found.is_none() {
                found = Some(table);
            }
        }
        found
    }

    /// Distinct bound table names, in registry order
    pub fn tables(&self) -> Vec<&TableName> {
        let mut seen = HashSet::new();
        let mut tables = Vec::new();
        for (_, table) in &self.entries {
            if seen.insert(table.as_str()) {
                tables.push(table);
            }
        }
        tables
    }

    /// `(masked key, table)` pairs for display
    pub fn masked_entries(&self) -> Vec<(String, &TableName)> {
        self.entries
            .iter()
            .map(|(key, table)| (mask_key(key), table))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First four characters followed by an ellipsis
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}…", prefix)
}
