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
use core::fmt;

use super::{
    fragments::LiteralChunk,
    keyexpr,
    utils::{split, Splitter},
    MalformedKind, DELIMITER, DOUBLE_WILD, SINGLE_WILD,
};

/// One `/`-separated segment of a key expression.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chunk<'a> {
    /// A literal chunk, possibly containing `$*` tokens.
    Literal(LiteralChunk<'a>),
    /// `*`: exactly one non-empty chunk.
    SingleWild,
    /// `**`: zero or more chunks.
    MultiWild,
}

impl<'a> Chunk<'a> {
    /// Classifies a chunk of a valid key expression.
    pub(crate) fn classify(chunk: &'a [u8]) -> Self {
        match chunk {
            [SINGLE_WILD] => Chunk::SingleWild,
            DOUBLE_WILD => Chunk::MultiWild,
            _ => Chunk::Literal(LiteralChunk::new(chunk)),
        }
    }

    /// A literal chunk made only of `$*` tokens matches any chunk, just like `*`.
    fn normalized(self) -> Self {
        match self {
            Chunk::Literal(literal) if literal.is_all_gaps() => Chunk::SingleWild,
            chunk => chunk,
        }
    }

    pub fn is_multi_wild(&self) -> bool {
        matches!(self, Chunk::MultiWild)
    }

    /// Returns `true` if the chunk may match more than one concrete chunk.
    pub fn is_wild(&self) -> bool {
        match self {
            Chunk::Literal(literal) => !literal.is_verbatim(),
            Chunk::SingleWild | Chunk::MultiWild => true,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            Chunk::Literal(literal) => literal.as_bytes(),
            Chunk::SingleWild => b"*",
            Chunk::MultiWild => DOUBLE_WILD,
        }
    }
}

impl fmt::Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Literal(literal) => match core::str::from_utf8(literal.as_bytes()) {
                Ok(text) => write!(f, "Literal({:?})", text),
                Err(_) => write!(f, "Literal({:?})", literal.as_bytes()),
            },
            Chunk::SingleWild => f.write_str("SingleWild"),
            Chunk::MultiWild => f.write_str("MultiWild"),
        }
    }
}

/// Checks the chunk grammar on a whole expression.
pub(crate) fn validate(ke: &str) -> Result<(), MalformedKind> {
    if ke.is_empty() {
        return Err(MalformedKind::Empty);
    }
    for chunk in split(ke.as_bytes(), DELIMITER) {
        match chunk {
            [] => return Err(MalformedKind::EmptyChunk),
            [SINGLE_WILD] | DOUBLE_WILD => {}
            _ => {
                // Any other star must close a `$*` token.
                let mut previous = DELIMITER;
                for &c in chunk {
                    if c == SINGLE_WILD && previous != b'$' {
                        return Err(MalformedKind::StarsInChunk);
                    }
                    previous = c;
                }
            }
        }
    }
    Ok(())
}

/// The chunks of a key expression, in order.
///
/// Cloning a `Chunks` is cheap and restarts iteration from the clone's current position.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    inner: Splitter<'a, u8>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(ke: &'a keyexpr) -> Self {
        Chunks {
            inner: split(ke.as_bytes(), DELIMITER),
        }
    }

    /// Turns this sequence into its canonical view, see [`Canonical`].
    pub fn canonical(self) -> Canonical<'a> {
        Canonical {
            inner: self,
            singles: 0,
            double: false,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Chunk::classify)
    }
}

impl DoubleEndedIterator for Chunks<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Chunk::classify)
    }
}

/// A chunk sequence with equivalent spellings folded together, computed on the fly:
/// - a literal made only of `$*` tokens is yielded as [`Chunk::SingleWild`],
/// - in any run of `*` and `**` chunks containing at least one `**`, all the `*` are yielded
///   first, then a single `**` (`**/**` becomes `**`, `**/*/**` becomes `*/**`).
///
/// Two expressions denoting the same set through these rules yield the same sequence.
#[derive(Clone, Debug)]
pub struct Canonical<'a> {
    inner: Chunks<'a>,
    singles: usize,
    double: bool,
}

impl<'a> Iterator for Canonical<'a> {
    type Item = Chunk<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.singles > 0 {
            self.singles -= 1;
            return Some(Chunk::SingleWild);
        }
        if self.double {
            self.double = false;
            return Some(Chunk::MultiWild);
        }
        let chunk = self.inner.next()?.normalized();
        if let Chunk::Literal(_) = chunk {
            return Some(chunk);
        }
        self.push_wild(chunk);
        loop {
            let mut ahead = self.inner.clone();
            match ahead.next().map(Chunk::normalized) {
                Some(wild @ (Chunk::SingleWild | Chunk::MultiWild)) => {
                    self.push_wild(wild);
                    self.inner = ahead;
                }
                _ => break,
            }
        }
        self.next()
    }
}

impl Canonical<'_> {
    fn push_wild(&mut self, wild: Chunk) {
        match wild {
            Chunk::MultiWild => self.double = true,
            _ => self.singles += 1,
        }
    }
}

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
fn canon(s: &str) -> Vec<&[u8]> {
    keyexpr::new(s)
        .unwrap()
        .chunks()
        .canonical()
        .map(|c| c.as_bytes())
        .collect()
}

#[test]
fn validation() {
    assert_eq!(validate(""), Err(MalformedKind::Empty));
    for ke in ["/a", "a/", "a//b", "/", "//"] {
        assert_eq!(validate(ke), Err(MalformedKind::EmptyChunk), "{ke}");
    }
    for ke in ["a*", "*a", "***", "$**", "**$*", "a/b*c", "*$*"] {
        assert_eq!(validate(ke), Err(MalformedKind::StarsInChunk), "{ke}");
    }
    for ke in ["a", "*", "**", "$*", "$*$*", "a$*b", "a/**/b$*", "$", "a$b", "$$*"] {
        assert_eq!(validate(ke), Ok(()), "{ke}");
    }
}

#[test]
fn classification() {
    let ke = keyexpr::new("a/*/**/b$*").unwrap();
    let mut chunks = ke.chunks();
    assert!(matches!(chunks.next(), Some(Chunk::Literal(l)) if l.as_bytes() == b"a"));
    assert_eq!(chunks.next(), Some(Chunk::SingleWild));
    assert_eq!(chunks.next(), Some(Chunk::MultiWild));
    let last = chunks.next().unwrap();
    assert!(last.is_wild() && !last.is_multi_wild());
    assert_eq!(chunks.next(), None);
    assert_eq!(ke.chunks().rev().count(), 4);
}

#[test]
fn canonical_view() {
    assert_eq!(canon("a/**/**/b"), [&b"a"[..], b"**", b"b"]);
    assert_eq!(canon("**/*"), [&b"*"[..], b"**"]);
    assert_eq!(canon("a/**/*/**/*/c"), [&b"a"[..], b"*", b"*", b"**", b"c"]);
    assert_eq!(canon("$*/$*$*/x"), [&b"*"[..], b"*", b"x"]);
    assert_eq!(canon("*/*"), [&b"*"[..], b"*"]);
    assert_eq!(canon("**"), [&b"**"[..]]);
}

#[test]
fn canonical_is_restartable() {
    let ke = keyexpr::new("**/*/x").unwrap();
    let mut view = ke.chunks().canonical();
    assert_eq!(view.next(), Some(Chunk::SingleWild));
    let restarted = view.clone();
    assert_eq!(view.count(), 2);
    assert_eq!(restarted.count(), 2);
}
