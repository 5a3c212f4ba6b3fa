// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! sled-backed partition cache.
//!
//! # Layout
//!
//! Each namespace gets its own tree, `partition.<namespace>`, opened on
//! first use. An entry is stored as one row per group:
//!
//! ```text
//! key   = <signature text> 0x00 <row index, u32 big-endian>
//! value = <group text>
//! ```
//!
//! The `0x00` separator cannot appear in an event name, so a prefix scan
//! over `<signature> 0x00` returns exactly the rows of one entry, in row
//! order.

use crate::{CacheError, Signature};
use event_catalog::Namespace;
use std::path::Path;

const ROW_SEPARATOR: u8 = 0;

/// A cached signature and its groups.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheEntry {
    pub signature: String,
    pub groups: Vec<String>,
}

/// Persistent map from [`Signature`] to the best known partition.
pub struct PartitionCache {
    db: sled::Db,
}

impl PartitionCache {
    /// Opens (or creates) a cache database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = sled::open(path.as_ref())?;
        tracing::debug!("opened partition cache at {}", path.as_ref().display());
        Ok(Self { db })
    }

    /// Opens a cache that is deleted when dropped.
    pub fn temporary() -> Result<Self, CacheError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn tree(&self, namespace: Namespace) -> Result<sled::Tree, CacheError> {
        Ok(self.db.open_tree(format!("partition.{namespace}"))?)
    }

    /// Returns the cached groups for `signature`, or an empty list.
    pub fn lookup(&self, signature: &Signature) -> Result<Vec<String>, CacheError> {
        let tree = self.tree(signature.namespace())?;
        let mut groups = Vec::new();
        for row in tree.scan_prefix(row_prefix(signature.as_str())) {
            let (_, value) = row?;
            groups.push(decode(signature.as_str(), &value)?);
        }
        Ok(groups)
    }

    /// Atomically replaces the entry for `signature` with `groups`.
    pub fn replace(&self, signature: &Signature, groups: &[String]) -> Result<(), CacheError> {
        let tree = self.tree(signature.namespace())?;
        let prefix = row_prefix(signature.as_str());

        let mut batch = sled::Batch::default();
        for key in tree.scan_prefix(&prefix).keys() {
            batch.remove(key?);
        }
        for (row, group) in groups.iter().enumerate() {
            let mut key = prefix.clone();
            key.extend_from_slice(&(row as u32).to_be_bytes());
            batch.insert(key, group.as_bytes());
        }

        tree.apply_batch(batch)?;
        tree.flush()?;
        tracing::debug!("cache: {signature} → {} group(s)", groups.len());
        Ok(())
    }

    /// Lists every entry in `namespace`, ordered by signature.
    pub fn entries(&self, namespace: Namespace) -> Result<Vec<CacheEntry>, CacheError> {
        let tree = self.tree(namespace)?;
        let mut entries: Vec<CacheEntry> = Vec::new();

        for row in tree.iter() {
            let (key, value) = row?;
            // The last five bytes are the separator and the row index.
            let split = key
                .len()
                .checked_sub(5)
                .filter(|&i| key[i] == ROW_SEPARATOR)
                .ok_or_else(|| CacheError::CorruptRow {
                    signature: String::from_utf8_lossy(&key).into_owned(),
                    detail: "row key has no index suffix".into(),
                })?;
            let signature = String::from_utf8(key[..split].to_vec()).map_err(|e| {
                CacheError::CorruptRow {
                    signature: String::from_utf8_lossy(&key[..split]).into_owned(),
                    detail: e.to_string(),
                }
            })?;
            let group = decode(&signature, &value)?;

            match entries.last_mut() {
                Some(entry) if entry.signature == signature => entry.groups.push(group),
                _ => entries.push(CacheEntry {
                    signature,
                    groups: vec![group],
                }),
            }
        }

        Ok(entries)
    }

    /// Number of cached signatures in `namespace`.
    pub fn len(&self, namespace: Namespace) -> Result<usize, CacheError> {
        Ok(self.entries(namespace)?.len())
    }

    /// Returns `true` if `namespace` has no cached entries.
    pub fn is_empty(&self, namespace: Namespace) -> Result<bool, CacheError> {
        Ok(self.tree(namespace)?.is_empty())
    }

    /// Flushes pending writes to disk.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for PartitionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionCache")
            .field("trees", &self.db.tree_names().len())
            .finish()
    }
}

fn row_prefix(signature: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(signature.len() + 1);
    prefix.extend_from_slice(signature.as_bytes());
    prefix.push(ROW_SEPARATOR);
    prefix
}

fn decode(signature: &str, value: &[u8]) -> Result<String, CacheError> {
    String::from_utf8(value.to_vec()).map_err(|e| CacheError::CorruptRow {
        signature: signature.to_string(),
        detail: e.to_string(),
    })
}
