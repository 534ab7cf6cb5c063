//
// Copyright (c) 2023 ZettaScale Technology
//
// This program and the accompanying materials are made available under the
// terms of the Eclipse Public License 2.0 which is available at
// http://www.eclipse.org/legal/epl-2.0, or the Apache License, Version 2.0
// which is available at https://www.apache.org/licenses/LICENSE-2.0.
//
// SPDX-License-Identifier: EPL-2.0 OR Apache-2.0
//
// Contributors:
//   ZettaScale Zenoh Team, <zenoh@zettascale.tech>
//
use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::key_expr::{keyexpr, MalformedKeyExpr, OwnedKeyExpr};

/// Values addressed by key expressions, such as the subscriptions a node routes to.
///
/// Entries are kept in insertion order and every lookup is a linear scan: the table is meant for
/// the few dozen declarations a constrained node holds, not for a router's resource tree.
/// Mutating through `&mut self` leaves synchronization to the caller.
///
/// ```
/// # use zpico_keyexpr::{keyexpr, KeTable};
/// let mut subscriptions = KeTable::new();
/// subscriptions.insert_str("demo/**", 1).unwrap();
/// subscriptions.insert_str("demo/$*/temp", 2).unwrap();
/// subscriptions.insert_str("other", 3).unwrap();
/// let publication = keyexpr::new("demo/room/temp").unwrap();
/// let mut hits: Vec<i32> = subscriptions.intersecting(publication).map(|(_, v)| *v).collect();
/// hits.sort();
/// assert_eq!(hits, [1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct KeTable<V> {
    entries: Vec<(OwnedKeyExpr, V)>,
}

impl<V> Default for KeTable<V> {
    fn default() -> Self {
        KeTable {
            entries: Vec::new(),
        }
    }
}

impl<V> KeTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, ke: &keyexpr) -> Option<usize> {
        self.entries.iter().position(|(k, _)| **k == *ke)
    }

    /// Inserts `value` at `ke`, returning the value previously held by the same expression.
    ///
    /// Expressions are compared as written: `a/**/**` and `a/**` are two distinct entries.
    pub fn insert(&mut self, ke: OwnedKeyExpr, value: V) -> Option<V> {
        match self.position(&ke) {
            Some(i) => {
                tracing::debug!("Replacing value at {}", ke);
                Some(core::mem::replace(&mut self.entries[i].1, value))
            }
            None => {
                tracing::debug!("Inserting value at {}", ke);
                self.entries.push((ke, value));
                None
            }
        }
    }

    /// Validates `ke` before [inserting](KeTable::insert) `value` at it.
    pub fn insert_str(&mut self, ke: &str, value: V) -> Result<Option<V>, MalformedKeyExpr> {
        match OwnedKeyExpr::try_from(ke) {
            Ok(ke) => Ok(self.insert(ke, value)),
            Err(e) => {
                tracing::warn!("Rejecting insertion: {}", e);
                Err(e)
            }
        }
    }

    pub fn remove(&mut self, ke: &keyexpr) -> Option<V> {
        let i = self.position(ke)?;
        tracing::debug!("Removing value at {}", ke);
        Some(self.entries.remove(i).1)
    }

    /// The value stored at exactly `ke`.
    pub fn get(&self, ke: &keyexpr) -> Option<&V> {
        tracing::trace!("Looking up {}", ke);
        self.position(ke).map(|i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&keyexpr, &V)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Entries whose expression shares at least one key with `ke`.
    pub fn intersecting<'a>(&'a self, ke: &'a keyexpr) -> impl Iterator<Item = (&'a keyexpr, &'a V)> {
        tracing::trace!("Looking up entries intersecting {}", ke);
        self.iter().filter(move |(k, _)| k.intersects(ke))
    }

    /// Entries whose expression only matches keys that `ke` also matches.
    pub fn included_by<'a>(&'a self, ke: &'a keyexpr) -> impl Iterator<Item = (&'a keyexpr, &'a V)> {
        tracing::trace!("Looking up entries included by {}", ke);
        self.iter().filter(move |(k, _)| ke.includes(k))
    }

    /// Entries whose expression matches every key that `ke` matches.
    pub fn including<'a>(&'a self, ke: &'a keyexpr) -> impl Iterator<Item = (&'a keyexpr, &'a V)> {
        tracing::trace!("Looking up entries including {}", ke);
        self.iter().filter(move |(k, _)| k.includes(ke))
    }
}

impl<V> FromIterator<(OwnedKeyExpr, V)> for KeTable<V> {
    fn from_iter<I: IntoIterator<Item = (OwnedKeyExpr, V)>>(iter: I) -> Self {
        let mut table = KeTable::new();
        for (ke, value) in iter {
            table.insert(ke, value);
        }
        table
    }
}

#[cfg(test)]
use crate::MalformedKind;

#[cfg(test)]
fn ke(s: &str) -> &keyexpr {
    keyexpr::new(s).unwrap()
}

#[cfg(test)]
fn table() -> KeTable<usize> {
    ["a/**", "a/b", "a/$*c", "*/b", "x/y/z"]
        .iter()
        .enumerate()
        .map(|(i, s)| (ke(s).to_owned(), i))
        .collect()
}

#[cfg(test)]
fn sorted<'a>(it: impl Iterator<Item = (&'a keyexpr, &'a usize)>) -> Vec<usize> {
    let mut values: Vec<usize> = it.map(|(_, v)| *v).collect();
    values.sort_unstable();
    values
}

#[test]
fn insert_replace_remove() {
    let mut table = table();
    assert_eq!(table.len(), 5);
    assert_eq!(table.insert_str("a/b", 10), Ok(Some(1)));
    assert_eq!(table.get(ke("a/b")), Some(&10));
    assert_eq!(table.len(), 5);
    assert_eq!(
        table.insert_str("a//b", 11).unwrap_err().kind(),
        MalformedKind::EmptyChunk
    );
    assert_eq!(table.remove(ke("x/y/z")), Some(4));
    assert_eq!(table.remove(ke("x/y/z")), None);
    assert_eq!(table.get(ke("x/y/z")), None);
    assert_eq!(table.len(), 4);
    assert_eq!(table.iter().next().map(|(k, _)| k.as_str()), Some("a/**"));
    let mut empty = KeTable::new();
    assert!(empty.is_empty());
    assert_eq!(empty.insert(ke("q").to_owned(), ()), None);
    assert!(!empty.is_empty());
}

#[test]
fn lookups() {
    let table = table();
    assert_eq!(sorted(table.intersecting(ke("a/b"))), [0, 1, 3]);
    assert_eq!(sorted(table.intersecting(ke("a/xc"))), [0, 2]);
    assert_eq!(sorted(table.intersecting(ke("**"))), [0, 1, 2, 3, 4]);
    assert_eq!(sorted(table.including(ke("a/b"))), [0, 1, 3]);
    assert_eq!(sorted(table.including(ke("a/*"))), [0]);
    assert_eq!(sorted(table.included_by(ke("a/**"))), [0, 1, 2]);
    assert_eq!(sorted(table.included_by(ke("*/*"))), [1, 2, 3]);
    assert!(table.intersecting(ke("b/c")).next().is_none());
}
