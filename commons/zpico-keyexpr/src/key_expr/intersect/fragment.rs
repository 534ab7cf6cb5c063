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
use crate::key_expr::{
    fragments::LiteralChunk,
    utils::find,
    walk::{reaches_end, Mode},
};

/// Returns `true` if some concrete chunk is matched by both literal chunks.
pub fn fragments_intersect(left: LiteralChunk, right: LiteralChunk) -> bool {
    match (left.is_verbatim(), right.is_verbatim()) {
        (true, true) => left.as_bytes() == right.as_bytes(),
        (true, false) => matches(right, left.as_bytes()),
        (false, true) => matches(left, right.as_bytes()),
        (false, false) => {
            edges_agree(left, right)
                && reaches_end(left.tokens(), right.tokens(), Mode::Intersect, |l, r| l == r)
        }
    }
}

/// Returns `true` if `glob` matches the concrete chunk `text`.
///
/// Edge fragments are pinned to the edges they touch; middle fragments are matched at their first
/// occurrence, which never rules out a match since gaps can stretch.
pub(crate) fn matches(glob: LiteralChunk, mut text: &[u8]) -> bool {
    let mut fragments = glob.fragments();
    if !glob.open_start() {
        match fragments.next() {
            Some(first) => match text.strip_prefix(first) {
                Some(rest) => text = rest,
                None => return false,
            },
            None => return text.is_empty(),
        }
    }
    if !glob.open_end() {
        match fragments.next_back() {
            Some(last) => match text.strip_suffix(last) {
                Some(rest) => text = rest,
                None => return false,
            },
            None => return text.is_empty(),
        }
    }
    for fragment in fragments {
        match find(text, fragment) {
            Some(i) => text = &text[i + fragment.len()..],
            None => return false,
        }
    }
    true
}

/// Closed edges must agree on their common length: `ab$*` can't meet `ac$*`.
///
/// A fast path only: the token walk rejects every pair rejected here, just later.
fn edges_agree(left: LiteralChunk, right: LiteralChunk) -> bool {
    if !left.open_start() && !right.open_start() {
        if let (Some(l), Some(r)) = (left.fragments().next(), right.fragments().next()) {
            let n = l.len().min(r.len());
            if l[..n] != r[..n] {
                return false;
            }
        }
    }
    if !left.open_end() && !right.open_end() {
        if let (Some(l), Some(r)) = (left.fragments().next_back(), right.fragments().next_back()) {
            let n = l.len().min(r.len());
            if l[l.len() - n..] != r[r.len() - n..] {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
fn literal(s: &str) -> LiteralChunk {
    LiteralChunk::new(s.as_bytes())
}

#[test]
fn glob_against_text() {
    let glob_matches = |glob: &str, text: &str| matches(literal(glob), text.as_bytes());
    assert!(glob_matches("ab$*cd", "abcd"));
    assert!(glob_matches("ab$*cd", "abxxcd"));
    assert!(!glob_matches("ab$*cd", "abxxcxxd"));
    assert!(!glob_matches("ab$*b", "ab"));
    assert!(glob_matches("$*b", "b"));
    assert!(!glob_matches("$*b", "cbc"));
    assert!(glob_matches("$*b$*", "cbc"));
    assert!(glob_matches("a$*b$*c", "abbbc"));
    assert!(glob_matches("a$*b$*c", "acbc"));
    assert!(!glob_matches("a$*b$*c", "accc"));
    assert!(glob_matches("$*", ""));
    assert!(glob_matches("$$*", "$x"));
}

#[test]
fn glob_against_glob() {
    let meet = |l: &str, r: &str| fragments_intersect(literal(l), literal(r));
    assert!(meet("ab$*", "$*cd"));
    assert!(!meet("ab$*", "ac$*"));
    assert!(!meet("$*ab", "$*cb"));
    assert!(meet("$*d", "$*ed"));
    assert!(!meet("$*d", "$*e"));
    assert!(meet("xyz$*xyz", "xyz$*xyz$*"));
    assert!(meet("b$*", "$*bc"));
    assert!(meet("$*b$*", "$*a$*"));
    assert!(!meet("a$*b", "c$*"));
    assert!(meet("abc", "abc"));
    assert!(!meet("abc", "abd"));
}

#[test]
fn edge_mismatches_fail_the_walk_too() {
    for (l, r) in [("ab$*", "ac$*"), ("$*ab", "$*cb"), ("a$*b", "c$*"), ("x$*yz", "x$*z$*wz")] {
        let (l, r) = (literal(l), literal(r));
        assert!(!edges_agree(l, r));
        assert!(!reaches_end(l.tokens(), r.tokens(), Mode::Intersect, |a, b| a == b));
    }
    assert!(edges_agree(literal("ab$*"), literal("a$*")));
}
