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
use core::iter::Peekable;

use super::{
    chunks::{Canonical, Chunk},
    intersect::matches,
    keyexpr,
    walk::{reaches_end, Mode, Row},
};

pub const DEFAULT_INCLUDER: SequenceIncluder = SequenceIncluder;

/// The trait used to implement key expression includers.
///
/// Note that `Includer<&keyexpr, &keyexpr>` is auto-implemented with quickchecks (`streq->true`, `left_nowild&strne->false`)
/// for any `Includer<Canonical, Canonical>`.
pub trait Includer<Left, Right> {
    /// Returns `true` if the set defined by `left` includes the one defined by `right`.
    fn includes(&self, left: Left, right: Right) -> bool;
}

impl<T: for<'a> Includer<Canonical<'a>, Canonical<'a>>> Includer<&keyexpr, &keyexpr> for T {
    fn includes(&self, left: &keyexpr, right: &keyexpr) -> bool {
        if left == right {
            return true;
        }
        // A single key only includes itself, and any wild expression matches more than one key.
        if !left.is_wild() {
            return false;
        }
        self.includes(left.chunks().canonical(), right.chunks().canonical())
    }
}

/// Walks the includee's chunks against the includer's, where consecutive `*` and `**` of the
/// includer are taken together as one wildcard run.
///
/// - A literal covers one includee chunk that isn't `**`, through [`chunk_includes`].
/// - A run of `n` `*` covers exactly `n` includee chunks, none of them `**`.
/// - A run of `n` `*` and a `**` covers any stretch of the includee holding at least `n` chunks
///   that aren't `**`, along with any `**` in it.
///
/// Keys are never empty, so an includee made only of `**` is walked as `*/**`.
///
/// This never reports an inclusion that doesn't hold. Each includer item covers one fixed stretch
/// of the includee, so an inclusion that needs different stretches for different keys is missed.
pub struct SequenceIncluder;

impl Includer<Canonical<'_>, Canonical<'_>> for SequenceIncluder {
    fn includes(&self, left: Canonical, right: Canonical) -> bool {
        let left = Covers(left.peekable());
        if right.clone().all(|chunk| chunk.is_multi_wild()) {
            covers_to_end(left, [Chunk::SingleWild, Chunk::MultiWild].into_iter())
        } else {
            covers_to_end(left, right)
        }
    }
}

/// An item of the includer: a chunk that isn't a wildcard, or a wildcard run.
#[derive(Debug, Clone, Copy)]
enum Cover<'a> {
    Chunk(Chunk<'a>),
    Run { singles: usize, double: bool },
}

/// Groups a canonical view into [`Cover`]s. A canonical run yields its `*` before its `**`.
struct Covers<'a>(Peekable<Canonical<'a>>);

impl<'a> Iterator for Covers<'a> {
    type Item = Cover<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let mut singles = 0;
        while self.0.next_if(|chunk| matches!(chunk, Chunk::SingleWild)).is_some() {
            singles += 1;
        }
        if self.0.next_if(|chunk| chunk.is_multi_wild()).is_some() {
            return Some(Cover::Run {
                singles,
                double: true,
            });
        }
        if singles > 0 {
            return Some(Cover::Run {
                singles,
                double: false,
            });
        }
        self.0.next().map(Cover::Chunk)
    }
}

/// Returns `true` if `left` covers the whole of `right`.
///
/// Like [`reaches_end`], only one row of reachable includee positions is kept per includer item.
fn covers_to_end<'b, R>(left: Covers, right: R) -> bool
where
    R: Iterator<Item = Chunk<'b>> + Clone,
{
    let width = right.clone().count() + 1;
    let mut current = Row::new(width);
    let mut next = Row::new(width);
    current.set(0);
    for cover in left {
        match cover {
            Cover::Chunk(l) => {
                for (j, r) in right.clone().enumerate() {
                    if current.get(j) && !r.is_multi_wild() && chunk_includes(&l, &r) {
                        next.set(j + 1);
                    }
                }
            }
            Cover::Run {
                singles,
                double: false,
            } => {
                // Number of chunks other than `**` right before position `j + 1`.
                let mut streak = 0;
                for (j, r) in right.clone().enumerate() {
                    streak = if r.is_multi_wild() { 0 } else { streak + 1 };
                    if streak >= singles && current.get(j + 1 - singles) {
                        next.set(j + 1);
                    }
                }
            }
            Cover::Run {
                singles,
                double: true,
            } => {
                // Every stretch starting further right ends where one starting here may end.
                if let Some(start) = current.first() {
                    if singles == 0 {
                        next.set(start);
                    }
                    let mut count = 0;
                    for (j, r) in right.clone().enumerate().skip(start) {
                        if !r.is_multi_wild() {
                            count += 1;
                        }
                        if count >= singles {
                            next.set(j + 1);
                        }
                    }
                }
            }
        }
        if next.is_empty() {
            return false;
        }
        core::mem::swap(&mut current, &mut next);
        next.clear();
    }
    current.get(width - 1)
}

/// Returns `true` if every concrete chunk matched by `right` is matched by `left`.
pub fn chunk_includes(left: &Chunk, right: &Chunk) -> bool {
    match (left, right) {
        (Chunk::MultiWild, _) => true,
        (_, Chunk::MultiWild) => false,
        (Chunk::SingleWild, _) => true,
        (Chunk::Literal(l), Chunk::SingleWild) => l.is_all_gaps(),
        (Chunk::Literal(l), Chunk::Literal(r)) => match (l.is_verbatim(), r.is_verbatim()) {
            (true, true) => l.as_bytes() == r.as_bytes(),
            (false, true) => matches(*l, r.as_bytes()),
            (true, false) => false,
            (false, false) => reaches_end(l.tokens(), r.tokens(), Mode::Include, |a, b| a == b),
        },
    }
}

#[cfg(test)]
fn lit(s: &'static str) -> Chunk<'static> {
    Chunk::Literal(super::fragments::LiteralChunk::new(s.as_bytes()))
}

#[test]
fn chunk_inclusion() {
    assert!(chunk_includes(&Chunk::SingleWild, &lit("a$*")));
    assert!(chunk_includes(&lit("$*$*"), &Chunk::SingleWild));
    assert!(!chunk_includes(&lit("a$*"), &Chunk::SingleWild));
    assert!(chunk_includes(&lit("b$*"), &lit("bc")));
    assert!(!chunk_includes(&lit("$*b"), &lit("cbc")));
    assert!(!chunk_includes(&lit("b"), &lit("b$*")));
    assert!(chunk_includes(&lit("a$*"), &lit("ab$*")));
    assert!(!chunk_includes(&lit("ab$*"), &lit("a$*")));
    assert!(chunk_includes(&lit("$*b$*"), &lit("a$*b$*c")));
    assert!(!chunk_includes(&Chunk::SingleWild, &Chunk::MultiWild));
}

#[test]
fn wildcard_runs() {
    let ke = |s: &'static str| keyexpr::new(s).unwrap();
    let runs = |s: &'static str| {
        Covers(ke(s).chunks().canonical().peekable())
            .map(|cover| match cover {
                Cover::Chunk(chunk) => (0, false, chunk.as_bytes()),
                Cover::Run { singles, double } => (singles, double, &b""[..]),
            })
            .collect::<alloc::vec::Vec<_>>()
    };
    let none = &b""[..];
    assert_eq!(
        runs("a/**/*/b"),
        [(0, false, &b"a"[..]), (1, true, none), (0, false, &b"b"[..])]
    );
    assert_eq!(
        runs("*/$*/x/**"),
        [(2, false, none), (0, false, &b"x"[..]), (0, true, none)]
    );
    assert_eq!(runs("**/**"), [(0, true, none)]);
}

#[test]
fn sequence_inclusion() {
    let ke = |s: &'static str| keyexpr::new(s).unwrap();
    let includes = |l: &'static str, r: &'static str| DEFAULT_INCLUDER.includes(ke(l), ke(r));
    assert!(includes("**", "*/**"));
    assert!(includes("*/**", "*/**"));
    assert!(includes("**/*", "*/**"));
    assert!(includes("*/**", "**"));
    assert!(includes("**/*", "**"));
    assert!(!includes("*/*/**", "**"));
    assert!(!includes("a/a/a/a", "**"));
    assert!(!includes("a/b", "a/b$*"));
    assert!(includes("a/b$*", "a/bc"));
    assert!(!includes("a/$*b", "a/cbc"));
    assert!(includes("a/**", "a"));
    assert!(includes("a/**/c", "a/b/**/c"));
    assert!(!includes("a/*/c", "a/**/c"));
    assert!(includes("**/*", "**/a"));
    assert!(includes("a/**/*", "a/**/b"));
    assert!(includes("**/*/*", "**/a/b"));
    assert!(includes("*/**", "**/x"));
    assert!(!includes("*/*/**", "**/x"));
    assert!(includes("*/*/**", "**/x/**/y"));
    assert!(!includes("a/**/*", "a/**"));
    assert!(!includes("*/a/**", "**/a/a"));
}
