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

//! [Key expression](https://github.com/eclipse-zenoh/roadmap/blob/main/rfcs/ALL/Key%20Expressions.md) matching for zenoh-pico.
//!
//! Key expressions are `/`-separated lists of chunks. Besides literal chunks, a chunk may be:
//! - `*`, which matches exactly one non-empty chunk,
//! - `**`, which matches any number of chunks, including none,
//! - a literal containing `$*` tokens, each of which matches any substring of a chunk.
//!
//! The two questions routing asks about a pair of key expressions are answered here without
//! ever enumerating the keys they stand for:
//! - do they [intersect](intersects), i.e. is there at least one key both match?
//! - does one [include](includes) the other, i.e. does it match every key the other matches?
//!
//! ```
//! assert!(zpico_keyexpr::intersects("a/**/d/**/l", "a/d/foo/l").unwrap());
//! assert!(!zpico_keyexpr::intersects("ab$*cd", "abxxcxxd").unwrap());
//! assert!(zpico_keyexpr::includes("a/**", "a/b$*/c").unwrap());
//! assert!(zpico_keyexpr::intersects("a//b", "a/b").is_err());
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod key_expr;
pub use key_expr::*;

/// A minimal table of values addressed by key expressions, answering the lookups routing needs.
pub mod keyexpr_table;
pub use keyexpr_table::KeTable;
