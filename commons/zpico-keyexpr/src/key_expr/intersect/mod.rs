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

use super::{chunks::Canonical, keyexpr};

mod chunk;
mod fragment;
mod sequence;
pub use chunk::chunks_intersect;
pub use fragment::fragments_intersect;
pub(crate) use fragment::matches;
pub use sequence::SequenceIntersector;

pub const DEFAULT_INTERSECTOR: SequenceIntersector = SequenceIntersector;

/// The trait used to implement key expression intersectors.
///
/// Note that `Intersector<&keyexpr, &keyexpr>` is auto-implemented with quickchecks (`streq->true`, `nowild->false`)
/// for any `Intersector<Canonical, Canonical>`. Implementing `Intersector<Canonical, Canonical>` is the recommended way to implement intersectors.
pub trait Intersector<Left, Right> {
    fn intersect(&self, left: Left, right: Right) -> bool;
}

impl<T: for<'a> Intersector<Canonical<'a>, Canonical<'a>>> Intersector<&keyexpr, &keyexpr> for T {
    fn intersect(&self, left: &keyexpr, right: &keyexpr) -> bool {
        if left == right {
            return true;
        }
        if !left.is_wild() && !right.is_wild() {
            return false;
        }
        self.intersect(left.chunks().canonical(), right.chunks().canonical())
    }
}
