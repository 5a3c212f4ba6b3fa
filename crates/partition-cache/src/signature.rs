// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Canonical event-set signatures.

use event_catalog::{Namespace, EVENT_DELIMITER};
use std::fmt;

/// Canonical identity of an input event set.
///
/// The events are sorted and joined with `:`. Duplicates are kept, so
/// `[A, A]` and `[A]` are different sets. Reordering the input never
/// changes the signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    namespace: Namespace,
    text: String,
}

impl Signature {
    /// Builds the signature of `events` within `namespace`.
    pub fn new<I, S>(namespace: Namespace, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = events.into_iter().map(|e| e.as_ref().to_string()).collect();
        sorted.sort_unstable();
        let mut text = String::new();
        for (i, event) in sorted.iter().enumerate() {
            if i > 0 {
                text.push(EVENT_DELIMITER);
            }
            text.push_str(event);
        }
        Self { namespace, text }
    }

    /// The namespace this signature belongs to.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` for the signature of an empty event set.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.text)
    }
}
