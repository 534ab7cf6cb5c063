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

use std::{convert::TryInto, fmt::Debug};

use rand::SeedableRng;

use crate::key_expr::{
    chunks::{Canonical, Chunk},
    fragments::Token,
    fuzzer,
    include::{Includer, DEFAULT_INCLUDER},
    intersect::*,
    keyexpr, MalformedKind, OwnedKeyExpr,
};

/// Tries every way `**` and `$*` could expand. Exponential, but obviously right.
struct RecursiveIntersector;

fn tokens_meet(l: &[Token], r: &[Token]) -> bool {
    match (l.first(), r.first()) {
        (None, None) => true,
        (Some(Token::Gap), _) => tokens_meet(&l[1..], r) || (!r.is_empty() && tokens_meet(l, &r[1..])),
        (_, Some(Token::Gap)) => tokens_meet(l, &r[1..]) || (!l.is_empty() && tokens_meet(&l[1..], r)),
        (Some(a), Some(b)) => a == b && tokens_meet(&l[1..], &r[1..]),
        _ => false,
    }
}

fn chunks_meet(l: &[Chunk], r: &[Chunk]) -> bool {
    match (l.first(), r.first()) {
        (None, None) => true,
        (Some(Chunk::MultiWild), _) => {
            chunks_meet(&l[1..], r) || (!r.is_empty() && chunks_meet(l, &r[1..]))
        }
        (_, Some(Chunk::MultiWild)) => {
            chunks_meet(l, &r[1..]) || (!l.is_empty() && chunks_meet(&l[1..], r))
        }
        (Some(a), Some(b)) => {
            let pair = match (a, b) {
                (Chunk::Literal(a), Chunk::Literal(b)) => tokens_meet(
                    &a.tokens().collect::<Vec<_>>(),
                    &b.tokens().collect::<Vec<_>>(),
                ),
                _ => true,
            };
            pair && chunks_meet(&l[1..], &r[1..])
        }
        _ => false,
    }
}

impl Intersector<Canonical<'_>, Canonical<'_>> for RecursiveIntersector {
    fn intersect(&self, left: Canonical, right: Canonical) -> bool {
        chunks_meet(&left.collect::<Vec<_>>(), &right.collect::<Vec<_>>())
    }
}

type BoxedIntersectors = Vec<Box<dyn for<'a> Intersector<&'a keyexpr, &'a keyexpr> + Send + Sync>>;

lazy_static::lazy_static! {
    static ref INTERSECTORS: BoxedIntersectors =
    vec![
        Box::new(SequenceIntersector),
        Box::new(RecursiveIntersector),
    ];
}

fn intersect<'a, A: TryInto<&'a keyexpr>, B: TryInto<&'a keyexpr>>(l: A, r: B) -> bool
where
    <A as TryInto<&'a keyexpr>>::Error: Debug,
    <B as TryInto<&'a keyexpr>>::Error: Debug,
{
    let left = l.try_into().unwrap();
    let right = r.try_into().unwrap();
    let response = DEFAULT_INTERSECTOR.intersect(left, right);
    for intersector in INTERSECTORS.iter() {
        if intersector.intersect(left, right) != response {
            panic!("DEFAULT_INTERSECTOR ({}) and INTERSECTORS[{:?}] disagreed on intersection between `{}` and `{}`", response, INTERSECTORS.iter().map(|i| i.intersect(left, right)).collect::<Vec<_>>(), left, right)
        }
    }
    let reverse = DEFAULT_INTERSECTOR.intersect(right, left);
    assert_eq!(response, reverse, "intersection of `{left}` and `{right}` isn't symmetric");
    response
}

fn includes<'a, A: TryInto<&'a keyexpr>, B: TryInto<&'a keyexpr>>(l: A, r: B) -> bool
where
    <A as TryInto<&'a keyexpr>>::Error: Debug,
    <B as TryInto<&'a keyexpr>>::Error: Debug,
{
    let left = l.try_into().unwrap();
    let right = r.try_into().unwrap();
    let response = DEFAULT_INCLUDER.includes(left, right);
    if response {
        assert!(
            intersect(left, right),
            "`{left}` includes `{right}` without intersecting it"
        );
    }
    response
}

#[test]
fn intersections() {
    assert!(intersect("a", "a"));
    assert!(intersect("a/b", "a/b"));
    assert!(intersect("*", "abc"));
    assert!(intersect("*", "xxx"));
    assert!(intersect("ab$*", "abcd"));
    assert!(intersect("ab$*d", "abcd"));
    assert!(intersect("ab$*", "ab"));
    assert!(!intersect("ab/*", "ab"));
    assert!(intersect("a/*/c/*/e", "a/b/c/d/e"));
    assert!(intersect("a/**/d/**/l", "a/b/c/d/e/f/g/h/i/l"));
    assert!(intersect("a/**/d/**/l", "a/d/foo/l"));
    assert!(intersect("a/$*b/c/$*d/e", "a/xb/c/xd/e"));
    assert!(!intersect("a/*/c/*/e", "a/c/e"));
    assert!(!intersect("a/*/c/*/e", "a/b/c/d/x/e"));
    assert!(!intersect("ab$*cd", "abxxcxxd"));
    assert!(intersect("ab$*cd", "abxxcxxcd"));
    assert!(!intersect("ab$*cd", "abxxcxxcdx"));
    assert!(intersect("**", "abc"));
    assert!(intersect("**", "a/b/c"));
    assert!(intersect("ab/**", "ab"));
    assert!(intersect("**/xyz", "a/b/xyz/d/e/f/xyz"));
    assert!(!intersect("**/xyz$*xyz", "a/b/xyz/d/e/f/xyz"));
    assert!(intersect("**/xyz$*xyz", "a/b/xyzdefxyz"));
    assert!(intersect("a/**/c/**/e", "a/b/b/b/c/d/d/d/e"));
    assert!(intersect("a/**/c/**/e", "a/c/e"));
    assert!(intersect("a/**/c/*/e/*", "a/b/b/b/c/d/d/c/d/e/f"));
    assert!(!intersect("a/**/c/*/e/*", "a/b/b/b/c/d/d/c/d/d/e/f"));
    assert!(intersect("x/abc", "x/abc"));
    assert!(!intersect("x/abc", "abc"));
    assert!(intersect("x/*", "x/abc"));
    assert!(!intersect("x/*", "abc"));
    assert!(!intersect("*", "x/abc"));
    assert!(intersect("x/*", "x/abc$*"));
    assert!(intersect("x/$*abc", "x/abc$*"));
    assert!(intersect("x/a$*", "x/abc$*"));
    assert!(intersect("x/a$*de", "x/abc$*de"));
    assert!(intersect("x/a$*d$*e", "x/a$*e"));
    assert!(intersect("x/a$*d$*e", "x/a$*c$*e"));
    assert!(intersect("x/a$*d$*e", "x/ade"));
    assert!(!intersect("x/c$*", "x/abc$*"));
    assert!(!intersect("x/$*d", "x/$*e"));

    assert!(intersect("*", "a"));
    assert!(intersect("a", "*"));
    assert!(intersect("*", "aaaaa"));
    assert!(intersect("**", "a"));
    assert!(intersect("a", "**"));
    assert!(intersect("a/a/a/a", "**"));
    assert!(intersect("a/*", "a/b"));
    assert!(!intersect("a/*/b", "a/b"));
    assert!(intersect("a/**/b", "a/b"));
    assert!(intersect("a/b$*", "a/b"));
    assert!(intersect("a/$*b$*", "a/b"));
    assert!(intersect("a/$*b", "a/b"));
    assert!(intersect("a/b$*", "a/bc"));
    assert!(intersect("a/$*b$*", "a/ebc"));
    assert!(intersect("a/$*b", "a/cb"));
    assert!(!intersect("a/b$*", "a/ebc"));
    assert!(!intersect("a/$*b", "a/cbc"));
    assert!(intersect("a/**/b$*", "a/b"));
    assert!(intersect("a/**/$*b$*", "a/b"));
    assert!(intersect("a/**/$*b", "a/b"));
    assert!(intersect("a/**/b$*", "a/bc"));
    assert!(intersect("a/**/$*b$*", "a/ebc"));
    assert!(intersect("a/**/$*b", "a/cb"));
    assert!(!intersect("a/**/b$*", "a/ebc"));
    assert!(!intersect("a/**/$*b", "a/cbc"));
}

#[test]
fn equivalent_spellings() {
    assert!(intersect("**/*", "*/**"));
    assert!(intersect("**/**/**", "a"));
    assert!(!intersect("*/*", "**/x/**/y/**/z"));
    assert!(intersect("$*$*", "abc"));
    assert!(!intersect("$*", "a/b"));
    assert!(intersect("a/$*/c", "a/*/c"));
    assert!(!intersect("a/**/*/*/b", "a/b"));
    assert!(!intersect("a/**/*/*/b", "a/x/b"));
    assert!(intersect("a/**/*/*/b", "a/x/y/b"));
    // `$` only opens a wildcard when followed by `*`.
    assert!(intersect("$", "$"));
    assert!(!intersect("a$b", "ab"));
    assert!(intersect("$$*", "$x"));
}

#[test]
fn inclusions() {
    assert!(includes("a", "a"));
    assert!(includes("a/b", "a/b"));
    assert!(includes("*", "a"));
    assert!(!includes("a", "*"));
    assert!(includes("*", "aaaaa"));
    assert!(includes("**", "a"));
    assert!(!includes("a", "**"));
    assert!(includes("**", "a/a/a/a"));
    assert!(includes("**", "*/**"));
    assert!(includes("*/**", "*/**"));
    // Keys are never empty.
    assert!(includes("*/**", "**"));
    assert!(includes("**/*", "**"));
    assert!(!includes("*/*/**", "**"));
    assert!(!includes("a/a/a/a", "**"));
    assert!(includes("a/*", "a/b"));
    assert!(!includes("a/*/b", "a/b"));
    assert!(includes("a/**/b", "a/b"));
    assert!(includes("a/b$*", "a/b"));
    assert!(!includes("a/b", "a/b$*"));
    assert!(includes("a/$*b$*", "a/b"));
    assert!(includes("a/$*b", "a/b"));
    assert!(includes("a/b$*", "a/bc"));
    assert!(includes("a/$*b$*", "a/ebc"));
    assert!(includes("a/$*b", "a/cb"));
    assert!(!includes("a/b$*", "a/ebc"));
    assert!(!includes("a/$*b", "a/cbc"));
    assert!(includes("a/**/b$*", "a/b"));
    assert!(includes("a/**/$*b$*", "a/b"));
    assert!(includes("a/**/$*b", "a/b"));
    assert!(includes("a/**/b$*", "a/bc"));
    assert!(includes("a/**/$*b$*", "a/ebc"));
    assert!(includes("a/**/$*b", "a/cb"));
    assert!(!includes("a/**/b$*", "a/ebc"));
    assert!(!includes("a/**/$*b", "a/cbc"));

    assert!(includes("ab$*", "abcd"));
    assert!(includes("ab$*d", "abcd"));
    assert!(includes("ab$*", "ab"));
    assert!(!includes("ab/*", "ab"));
    assert!(includes("a/*/c/*/e", "a/b/c/d/e"));
    assert!(includes("a/$*b/c/$*d/e", "a/xb/c/xd/e"));
    assert!(!includes("a/*/c/*/e", "a/c/e"));
    assert!(!includes("a/*/c/*/e", "a/b/c/d/x/e"));
    assert!(!includes("ab$*cd", "abxxcxxd"));
    assert!(includes("ab$*c$*d", "abxxcxxd"));
    assert!(includes("ab$*cd", "abxxcxxcd"));
    assert!(!includes("ab$*cd", "abxxcxxcdx"));
    assert!(includes("**/xyz", "a/b/xyz/d/e/f/xyz"));
    assert!(!includes("**/xyz$*xyz", "a/b/xyz/d/e/f/xyz"));
    assert!(includes("**/xyz$*xyz", "a/b/xyzdefxyz"));
    assert!(includes("a/**/c/**/e", "a/c/e"));
    assert!(includes("a/**/c/*/e/*", "a/b/b/b/c/d/d/c/d/e/f"));
    assert!(!includes("a/**/c/*/e/*", "a/b/b/b/c/d/d/c/d/d/e/f"));
    assert!(!includes("x/abc", "abc"));
    assert!(includes("x/*", "x/abc$*"));
    assert!(!includes("x/$*abc", "x/abc$*"));
    assert!(includes("x/a$*", "x/abc$*"));
    assert!(!includes("x/abc$*", "x/a$*"));
    assert!(includes("x/a$*de", "x/abc$*de"));
    assert!(includes("x/a$*e", "x/a$*d$*e"));
    assert!(!includes("x/a$*d$*e", "x/a$*e"));
    assert!(!includes("x/a$*d$*e", "x/a$*c$*e"));
    assert!(includes("x/a$*d$*e", "x/ade"));
    assert!(!includes("x/c$*", "x/abc$*"));
    assert!(includes("x/$*c$*", "x/abc$*"));
    assert!(!includes("x/$*d", "x/$*e"));
    assert!(includes("**/*", "*/**/**"));

    // An includee `**` may share a wildcard run with the `*` around it.
    assert!(includes("**/*", "**/a"));
    assert!(includes("a/**/*", "a/**/b"));
    assert!(includes("**/*/*", "**/a/b"));
    assert!(includes("*/**", "**/x"));
    assert!(includes("$*/**", "**/x/**"));
    assert!(!includes("$*/**/$*", "**/x/**"));
    assert!(!includes("a/**/*", "a/**"));
    assert!(!includes("*/*/**", "**/x"));
    assert!(!includes("**/*/a", "**/a"));
    assert_eq!(
        keyexpr::new("**/*").unwrap().relation_to(keyexpr::new("**/a").unwrap()),
        crate::SetIntersectionLevel::Includes
    );
}

#[test]
fn malformed() {
    use crate::key_expr::{includes, intersects};

    assert_eq!(intersects("", "a").unwrap_err().kind(), MalformedKind::Empty);
    assert_eq!(
        intersects("a", "a//b").unwrap_err().kind(),
        MalformedKind::EmptyChunk
    );
    assert_eq!(
        intersects("a/", "**").unwrap_err().kind(),
        MalformedKind::EmptyChunk
    );
    // The left side is checked first.
    let e = includes("a*", "/b").unwrap_err();
    assert_eq!(e.kind(), MalformedKind::StarsInChunk);
    assert_eq!(e.expr(), "a*");
    assert!(intersects("***", "a").is_err());
    assert_eq!(intersects("a/**", "a"), Ok(true));
    assert_eq!(includes("a/**", "a/b$*/c"), Ok(true));
}

/// The concrete key obtained by expanding every `**` to `dw`, every `*` to `sw` and every `$*` to
/// `gap`. An empty `dw` removes `**` chunks altogether.
fn instantiate(ke: &keyexpr, dw: &str, sw: &str, gap: &str) -> Option<OwnedKeyExpr> {
    let chunks: Vec<String> = ke
        .chunks()
        .filter_map(|chunk| match chunk {
            Chunk::MultiWild => (!dw.is_empty()).then(|| dw.to_owned()),
            Chunk::SingleWild => Some(sw.to_owned()),
            Chunk::Literal(literal) => {
                let text = std::str::from_utf8(literal.as_bytes()).unwrap();
                let text = text.replace("$*", gap);
                Some(if text.is_empty() { sw.to_owned() } else { text })
            }
        })
        .collect();
    OwnedKeyExpr::try_from(chunks.join("/")).ok()
}

#[test]
fn fuzz() {
    const FUZZ_ROUNDS: usize = 20_000;
    let rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    let mut fuzzer = fuzzer::KeyExprFuzzer(rng);
    let mut ke1 = fuzzer.next().unwrap();
    for ke2 in fuzzer.take(FUZZ_ROUNDS) {
        assert!(intersect(&*ke1, &*ke1));
        assert!(includes(&*ke1, &*ke1));
        assert!(intersect("**", &*ke2));
        assert!(includes("**", &*ke2));
        let level = ke1.relation_to(&ke2);
        assert_eq!(level >= crate::SetIntersectionLevel::Intersects, intersect(&*ke1, &*ke2));
        if includes(&*ke1, &*ke2) {
            for (dw, sw, gap) in [("", "a", ""), ("q/q", "qq", "q")] {
                if let Some(key) = instantiate(&ke2, dw, sw, gap) {
                    assert!(
                        intersect(&*ke1, &*key),
                        "`{ke1}` claims to include `{ke2}` but misses `{key}`"
                    );
                }
            }
        }
        ke1 = ke2;
    }
}

/// Whether the concrete chunk `text` is matched by `pattern`, trying every expansion of each `$*`.
fn glob_matches(pattern: &[u8], text: &[u8]) -> bool {
    match pattern {
        [] => text.is_empty(),
        [b'$', b'*', rest @ ..] => (0..=text.len()).any(|i| glob_matches(rest, &text[i..])),
        [c, rest @ ..] => text.first() == Some(c) && glob_matches(rest, &text[1..]),
    }
}

/// Whether the concrete key `key` is matched by the chunks of `ke`, trying every expansion of each
/// `**`.
fn chunks_match(ke: &[&[u8]], key: &[&[u8]]) -> bool {
    let Some((&chunk, ke_rest)) = ke.split_first() else {
        return key.is_empty();
    };
    match chunk {
        [b'*', b'*'] => (0..=key.len()).any(|i| chunks_match(ke_rest, &key[i..])),
        [b'*'] => !key.is_empty() && chunks_match(ke_rest, &key[1..]),
        _ => {
            !key.is_empty() && glob_matches(chunk, key[0]) && chunks_match(ke_rest, &key[1..])
        }
    }
}

fn key_matches(ke: &keyexpr, key: &keyexpr) -> bool {
    fn split(ke: &keyexpr) -> Vec<&[u8]> {
        ke.as_bytes().split(|&c| c == b'/').collect()
    }
    chunks_match(&split(ke), &split(key))
}

#[test]
fn brute_force_matching() {
    assert!(glob_matches(b"a$*b$*c", b"acbc"));
    assert!(!glob_matches(b"ab$*cd", b"abxxcxxd"));
    assert!(glob_matches(b"$$*", b"$x"));
    let matches = |l: &str, r: &str| key_matches(keyexpr::new(l).unwrap(), keyexpr::new(r).unwrap());
    assert!(matches("a/**/d/**/l", "a/d/foo/l"));
    assert!(matches("**", "a/b"));
    assert!(!matches("a/*/c/*/e", "a/c/e"));
    assert!(!matches("a/**/$*b", "a/cbc"));
}

/// Fuzzed pairs, checked against every expansion of the includee that [`instantiate`] produces.
///
/// The fuzzer never writes `c`, so expanding `*` and `$*` to `c` yields a key that any includer
/// missing some of the includee's keys also misses, as long as the includee has no `**`: on those
/// pairs the answer must be exact.
#[test]
fn inclusions_against_brute_force() {
    let rng = rand::rngs::StdRng::seed_from_u64(0x1c1);
    let samples: Vec<OwnedKeyExpr> = fuzzer::KeyExprFuzzer(rng).take(200).collect();
    let expansions = [
        ("", "c", "c"),
        ("c", "c", ""),
        ("c/c", "ab", "ba"),
        ("a", "b", "ab"),
    ];
    for includer in &samples {
        for includee in &samples {
            let keys: Vec<OwnedKeyExpr> = expansions
                .iter()
                .filter_map(|&(dw, sw, gap)| instantiate(includee, dw, sw, gap))
                .collect();
            let covered = keys.iter().all(|key| key_matches(includer, key));
            let response = includes(&**includer, &**includee);
            if includee.chunks().any(|chunk| chunk.is_multi_wild()) {
                assert!(
                    !response || covered,
                    "`{includer}` claims to include `{includee}` but misses one of {keys:?}"
                );
            } else {
                assert_eq!(
                    response, covered,
                    "inclusion of `{includee}` by `{includer}` over {keys:?}"
                );
            }
        }
    }
}

#[test]
fn stays_bounded() {
    // A backtracking matcher would explore exponentially many ways to split `right` here.
    let left = OwnedKeyExpr::try_from("a/**/".repeat(40) + "c").unwrap();
    let right = OwnedKeyExpr::try_from("a/".repeat(400) + "b").unwrap();
    assert!(!DEFAULT_INTERSECTOR.intersect(&*left, &*right));
    assert!(DEFAULT_INCLUDER.includes(&*left, &*(right.join("c").unwrap())));

    // Rows wider than the inline state buffer.
    let glob = "$*a".repeat(100) + "$*c";
    let long = "a".repeat(1000) + "$*c";
    assert!(crate::intersects(&glob, &long).unwrap());
    assert!(crate::includes(&glob, &long).unwrap());
    assert!(!crate::includes(&long, &glob).unwrap());
}
