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
use core::iter::Filter;

use super::{
    utils::{find, split, Splitter},
    walk::Step,
    STAR_DSL,
};

/// A literal chunk: text in which every `$*` token matches any substring, including the empty one.
///
/// Seen through [`fragments`](LiteralChunk::fragments), `ab$*c$*$*d` is the fragments `ab`, `c` and
/// `d`, with both edges closed: a match must start with `ab` and end with `d`. `$*b` has a single
/// fragment `b` and an open start.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiteralChunk<'a>(&'a [u8]);

impl<'a> LiteralChunk<'a> {
    pub(crate) fn new(chunk: &'a [u8]) -> Self {
        LiteralChunk(chunk)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// `true` if the chunk starts with `$*`, i.e. matches may have arbitrary leading text.
    pub fn open_start(&self) -> bool {
        self.0.starts_with(STAR_DSL)
    }

    /// `true` if the chunk ends with `$*`, i.e. matches may have arbitrary trailing text.
    pub fn open_end(&self) -> bool {
        self.0.ends_with(STAR_DSL)
    }

    /// `true` if the chunk contains no `$*`, and thus only matches itself.
    pub fn is_verbatim(&self) -> bool {
        find(self.0, STAR_DSL).is_none()
    }

    /// `true` if the chunk is only made of `$*` tokens.
    pub fn is_all_gaps(&self) -> bool {
        self.fragments().next().is_none()
    }

    /// The non-empty literal fragments found between `$*` tokens, in order.
    pub fn fragments(&self) -> Fragments<'a> {
        Fragments(split(self.0, STAR_DSL).filter(non_empty as fn(&&[u8]) -> bool))
    }

    /// The chunk as a stream of bytes and gaps, consecutive `$*` collapsed into one gap.
    pub(crate) fn tokens(&self) -> Tokens<'a> {
        Tokens(self.0)
    }
}

fn non_empty(fragment: &&[u8]) -> bool {
    !fragment.is_empty()
}

/// Iterator over the fragments of a [`LiteralChunk`], from either end.
#[derive(Clone)]
pub struct Fragments<'a>(Filter<Splitter<'a, &'static [u8; 2]>, fn(&&[u8]) -> bool>);

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a [u8];
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl DoubleEndedIterator for Fragments<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// Any run of characters, possibly empty.
    Gap,
    Byte(u8),
}

impl Step for Token {
    fn is_star(&self) -> bool {
        matches!(self, Token::Gap)
    }
}

#[derive(Clone)]
pub(crate) struct Tokens<'a>(&'a [u8]);

impl Iterator for Tokens<'_> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0.starts_with(STAR_DSL) {
            let mut rest = &self.0[STAR_DSL.len()..];
            while let Some(after) = rest.strip_prefix(STAR_DSL.as_slice()) {
                rest = after;
            }
            self.0 = rest;
            return Some(Token::Gap);
        }
        let (&byte, rest) = self.0.split_first()?;
        self.0 = rest;
        Some(Token::Byte(byte))
    }
}

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
fn frags(chunk: &str) -> (bool, Vec<&[u8]>, bool) {
    let literal = LiteralChunk::new(chunk.as_bytes());
    (
        literal.open_start(),
        literal.fragments().collect(),
        literal.open_end(),
    )
}

#[test]
fn decomposition() {
    assert_eq!(frags("abc"), (false, [&b"abc"[..]].to_vec(), false));
    assert_eq!(frags("ab$*cd"), (false, [&b"ab"[..], b"cd"].to_vec(), false));
    assert_eq!(frags("$*b$*"), (true, [&b"b"[..]].to_vec(), true));
    assert_eq!(frags("a$*$*$*d"), (false, [&b"a"[..], b"d"].to_vec(), false));
    assert_eq!(frags("$*$*"), (true, Vec::new(), true));
    assert_eq!(frags("$$*"), (false, [&b"$"[..]].to_vec(), true));
    assert!(LiteralChunk::new(b"$*").is_all_gaps());
    assert!(!LiteralChunk::new(b"a$*").is_all_gaps());
    assert!(LiteralChunk::new(b"a$b").is_verbatim());
}

#[test]
fn fragments_from_both_ends() {
    let literal = LiteralChunk::new(b"x$*y$*z");
    let mut fragments = literal.fragments();
    assert_eq!(fragments.next_back(), Some(&b"z"[..]));
    assert_eq!(fragments.next(), Some(&b"x"[..]));
    assert_eq!(fragments.next_back(), Some(&b"y"[..]));
    assert_eq!(fragments.next(), None);
}

#[test]
fn tokenization() {
    use Token::*;
    let tokens: Vec<Token> = LiteralChunk::new(b"a$*$*b$*").tokens().collect();
    assert_eq!(tokens, [Byte(b'a'), Gap, Byte(b'b'), Gap]);
    let tokens: Vec<Token> = LiteralChunk::new(b"$$*").tokens().collect();
    assert_eq!(tokens, [Byte(b'$'), Gap]);
}
