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
use super::fragments_intersect;
use crate::key_expr::{chunks::Chunk, walk::Step};

impl Step for Chunk<'_> {
    fn is_star(&self) -> bool {
        self.is_multi_wild()
    }
}

/// Returns `true` if some concrete chunk is matched by both chunks.
///
/// `*` and `**` match any chunk, so only a pair of literals can fail.
pub fn chunks_intersect(left: &Chunk, right: &Chunk) -> bool {
    match (left, right) {
        (Chunk::Literal(l), Chunk::Literal(r)) => fragments_intersect(*l, *r),
        _ => true,
    }
}

#[test]
fn chunk_pairs() {
    use crate::key_expr::fragments::LiteralChunk;

    let lit = |s: &'static str| Chunk::Literal(LiteralChunk::new(s.as_bytes()));
    assert!(chunks_intersect(&Chunk::SingleWild, &lit("abc")));
    assert!(chunks_intersect(&lit("a$*"), &Chunk::SingleWild));
    assert!(chunks_intersect(&Chunk::MultiWild, &Chunk::SingleWild));
    assert!(chunks_intersect(&lit("a$*"), &lit("$*c")));
    assert!(!chunks_intersect(&lit("ab"), &lit("b")));
}
