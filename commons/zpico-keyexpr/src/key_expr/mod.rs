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

//! This module implements the Key Expression Language, as explained in details in [`keyexpr`]'s documentation.

pub(crate) const DELIMITER: u8 = b'/';
pub(crate) const SINGLE_WILD: u8 = b'*';
pub(crate) const DOUBLE_WILD: &[u8] = b"**";
pub(crate) const STAR_DSL: &[u8; 2] = b"$*";

/// Number of matcher cursor positions kept inline before a state row spills to the heap.
///
/// Any key expression with fewer chunks than this, and any chunk with fewer bytes, is matched
/// without allocating.
pub const INLINE_STATES: usize = 256;

pub(crate) mod borrowed;
pub use borrowed::*;

pub(crate) mod owned;
pub use owned::OwnedKeyExpr;

mod error;
pub use error::{MalformedKeyExpr, MalformedKind};

/// Lazy, allocation-free views over the chunks of a key expression.
pub mod chunks;
/// Decomposition of literal chunks into the fragments found between `$*` tokens.
pub mod fragments;

/// Used to implement and expose the tools to implement algorithms to detect Key Expression intersection.
/// The average user doesn't need to bother with it.
pub mod intersect;
/// Used to implement and expose the tools to implement algorithms to detect Key Expression inclusivity.
/// The average user doesn't need to bother with it.
pub mod include;

pub(crate) mod utils;
mod walk;

/// Exposes a random Key Expression generator to help with testing.
#[cfg(feature = "std")]
pub mod fuzzer;

#[cfg(all(test, feature = "std"))]
mod tests;

/// Returns `true` if there exists at least one key matched by both `left` and `right`.
///
/// Both expressions are validated first; the first malformed one (`left` before `right`) is reported.
pub fn intersects(left: &str, right: &str) -> Result<bool, MalformedKeyExpr> {
    let left = keyexpr::new(left)?;
    let right = keyexpr::new(right)?;
    Ok(left.intersects(right))
}

/// Returns `true` if every key matched by `right` is also matched by `left`.
///
/// Both expressions are validated first; the first malformed one (`left` before `right`) is reported.
pub fn includes(left: &str, right: &str) -> Result<bool, MalformedKeyExpr> {
    let left = keyexpr::new(left)?;
    let right = keyexpr::new(right)?;
    Ok(left.includes(right))
}
