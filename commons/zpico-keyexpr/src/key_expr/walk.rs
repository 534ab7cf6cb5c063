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

//! The pattern walk shared by chunk sequences (where `**` is the star) and literal chunks (where
//! `$*` is).
//!
//! A cursor `(i, j)` means the first `i` items on the left and the first `j` on the right can be
//! matched against each other. Cursors advance one left item at a time, so only one row of `j`s is
//! kept, as a bitset. Nothing backtracks: the walk is `O(left * right)` whatever the stars.

use alloc::{vec, vec::Vec};

use super::INLINE_STATES;

/// An item that may be a star, i.e. stand for any number of items of the other side.
pub(crate) trait Step {
    fn is_star(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Stars on both sides may absorb items of the other side.
    Intersect,
    /// Only left stars absorb. A right star is only ever absorbed by a left star.
    Include,
}

const INLINE_WORDS: usize = INLINE_STATES / 64;

/// A fixed-width bitset, kept inline unless wider than [`INLINE_STATES`].
pub(crate) struct Row {
    inline: [u64; INLINE_WORDS],
    heap: Vec<u64>,
}

impl Row {
    pub(crate) fn new(width: usize) -> Self {
        let heap = if width > INLINE_STATES {
            vec![0; (width + 63) / 64]
        } else {
            Vec::new()
        };
        Row {
            inline: [0; INLINE_WORDS],
            heap,
        }
    }

    fn words(&self) -> &[u64] {
        if self.heap.is_empty() {
            &self.inline
        } else {
            &self.heap
        }
    }

    fn words_mut(&mut self) -> &mut [u64] {
        if self.heap.is_empty() {
            &mut self.inline
        } else {
            &mut self.heap
        }
    }

    pub(crate) fn get(&self, j: usize) -> bool {
        (self.words()[j / 64] >> (j % 64)) & 1 == 1
    }

    pub(crate) fn set(&mut self, j: usize) {
        self.words_mut()[j / 64] |= 1 << (j % 64);
    }

    pub(crate) fn clear(&mut self) {
        self.words_mut().fill(0)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.words().iter().all(|&w| w == 0)
    }

    /// The lowest set position.
    pub(crate) fn first(&self) -> Option<usize> {
        let (i, word) = self.words().iter().enumerate().find(|(_, w)| **w != 0)?;
        Some(i * 64 + word.trailing_zeros() as usize)
    }
}

/// Returns `true` if `left` and `right` can be walked to their ends together.
///
/// `pair` decides whether two non-star items match; it is never called when either is a star.
pub(crate) fn reaches_end<L, R, P>(left: L, right: R, mode: Mode, mut pair: P) -> bool
where
    L: Iterator,
    L::Item: Step,
    R: Iterator + Clone,
    R::Item: Step,
    P: FnMut(&L::Item, &R::Item) -> bool,
{
    let width = right.clone().count() + 1;
    let end = width - 1;
    let mut current = Row::new(width);
    let mut next = Row::new(width);
    current.set(0);
    for l in left {
        let star = l.is_star();
        // Ascending `j`, so that a cursor spread to `j + 1` is handled in the same pass.
        for (j, r) in right.clone().enumerate() {
            if !current.get(j) {
                continue;
            }
            let r_star = r.is_star();
            if star || (mode == Mode::Intersect && r_star) {
                current.set(j + 1);
                next.set(j);
            } else if !r_star && pair(&l, &r) {
                next.set(j + 1);
            }
        }
        if star && current.get(end) {
            next.set(end);
        }
        if next.is_empty() {
            return false;
        }
        core::mem::swap(&mut current, &mut next);
        next.clear();
    }
    if mode == Mode::Intersect {
        for (j, r) in right.enumerate() {
            if current.get(j) && r.is_star() {
                current.set(j + 1);
            }
        }
    }
    current.get(end)
}

#[cfg(test)]
impl Step for u8 {
    fn is_star(&self) -> bool {
        *self == b'*'
    }
}

#[cfg(test)]
fn walk(left: &str, right: &str, mode: Mode) -> bool {
    reaches_end(
        left.bytes(),
        right.bytes(),
        mode,
        |l: &u8, r: &u8| l == r || *l == b'?' || *r == b'?',
    )
}

#[test]
fn intersect_walk() {
    use Mode::Intersect;
    assert!(walk("abc", "abc", Intersect));
    assert!(!walk("abc", "abd", Intersect));
    assert!(walk("a*", "*c", Intersect));
    assert!(walk("*b*", "*a*", Intersect));
    assert!(!walk("ab*cd", "abxxcxxd", Intersect));
    assert!(walk("a?c", "*", Intersect));
    assert!(walk("*", "", Intersect));
    assert!(walk("", "**", Intersect));
    assert!(!walk("", "a", Intersect));
    assert!(!walk("ab", "a", Intersect));
}

#[test]
fn include_walk() {
    use Mode::Include;
    assert!(walk("*", "a*b", Include));
    assert!(walk("a*", "ab*", Include));
    assert!(!walk("ab*", "a*", Include));
    assert!(!walk("a?", "a*", Include));
    assert!(walk("*b", "*b", Include));
    assert!(!walk("", "*", Include));
    assert!(walk("", "", Include));
}

#[test]
fn wide_rows_spill() {
    let long = "x".repeat(INLINE_STATES * 2);
    let glob = alloc::format!("*{}*", "x".repeat(INLINE_STATES));
    assert!(walk(&glob, &long, Mode::Intersect));
    assert!(walk(&glob, &long, Mode::Include));
    assert!(!walk(&long, &glob, Mode::Include));
    let mut row = Row::new(INLINE_STATES + 1);
    assert!(row.is_empty());
    assert_eq!(row.first(), None);
    row.set(INLINE_STATES);
    assert!(row.get(INLINE_STATES) && !row.get(0));
    assert_eq!(row.first(), Some(INLINE_STATES));
    row.set(70);
    assert_eq!(row.first(), Some(70));
    row.clear();
    assert!(row.is_empty());
}
