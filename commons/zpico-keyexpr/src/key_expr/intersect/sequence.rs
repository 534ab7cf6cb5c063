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
use super::{chunks_intersect, Intersector};
use crate::key_expr::{
    chunks::Canonical,
    walk::{reaches_end, Mode},
};

/// Walks both chunk sequences together, letting `**` on either side absorb any number of chunks.
///
/// Runs in `O(left_chunks * right_chunks)` chunk comparisons at most, whatever the number of `**`.
pub struct SequenceIntersector;

impl Intersector<Canonical<'_>, Canonical<'_>> for SequenceIntersector {
    fn intersect(&self, left: Canonical, right: Canonical) -> bool {
        reaches_end(left, right, Mode::Intersect, chunks_intersect)
    }
}
