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
use rand::distributions::Uniform;

use super::OwnedKeyExpr;

/// Appends a literal chunk of 1 to 3 parts, each either `a`, `b` or `$*`.
fn random_literal(ke: &mut Vec<u8>, rng: &mut impl rand::Rng) {
    let parts = rng.gen_range(1..=3);
    for _ in 0..parts {
        if rng.gen_bool(0.25) {
            ke.extend(b"$*")
        } else {
            ke.push(rng.sample(Uniform::from(b'a'..b'c')))
        }
    }
}

fn make(ke: &mut Vec<u8>, rng: &mut impl rand::Rng) {
    let mut iters = 0;
    loop {
        if !ke.is_empty() {
            ke.push(b'/');
        }
        let n = rng.sample(Uniform::<u8>::from(0..=255));
        match n {
            0..=31 => ke.extend(b"**"),
            32..=63 => ke.push(b'*'),
            64.. => random_literal(ke, rng),
        }
        if n % (8 - iters) == 0 {
            return;
        }
        iters += 1;
    }
}

/// An endless source of random, valid key expressions made of up to 8 chunks.
///
/// Literal chunks only use `a`, `b` and `$*`, so that generated expressions often intersect.
pub struct KeyExprFuzzer<Rng: rand::Rng>(pub Rng);

impl<Rng: rand::Rng> Iterator for KeyExprFuzzer<Rng> {
    type Item = OwnedKeyExpr;
    fn next(&mut self) -> Option<Self::Item> {
        let mut next = Vec::new();
        make(&mut next, &mut self.0);
        // Only ASCII was pushed, and every chunk is valid by construction.
        let next = unsafe { String::from_utf8_unchecked(next) };
        Some(unsafe { OwnedKeyExpr::from_string_unchecked(next) })
    }
}

#[test]
fn fuzzed_expressions_are_valid() {
    use rand::SeedableRng;

    for ke in KeyExprFuzzer(rand::rngs::StdRng::seed_from_u64(7)).take(1000) {
        assert!(
            super::keyexpr::new(ke.as_str()).is_ok(),
            "fuzzer produced {ke}"
        );
    }
}
