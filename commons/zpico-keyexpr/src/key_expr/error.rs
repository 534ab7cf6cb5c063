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
use alloc::string::{String, ToString};
use core::fmt;

use zpico_result::{zerror, ZError};

/// Why a string was rejected as a key expression.
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedKind {
    /// The empty string is not a key expression.
    Empty = -1,
    /// Empty chunks are forbidden, as well as leading and trailing slashes.
    EmptyChunk = -2,
    /// `*` may only appear as a whole `*` or `**` chunk, or as part of a `$*` token.
    StarsInChunk = -3,
}

impl MalformedKind {
    pub const fn errno(self) -> i8 {
        self as i8
    }

    const fn reason(self) -> &'static str {
        match self {
            MalformedKind::Empty => "key expressions may not be empty",
            MalformedKind::EmptyChunk => {
                "empty chunks are forbidden, as well as leading and trailing slashes"
            }
            MalformedKind::StarsInChunk => {
                "`*` and `**` may only be preceded and followed by `/`, other stars must be part of `$*`"
            }
        }
    }
}

/// The error returned when a string is not a valid key expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedKeyExpr {
    expr: String,
    kind: MalformedKind,
}

impl MalformedKeyExpr {
    pub(crate) fn new(expr: &str, kind: MalformedKind) -> Self {
        MalformedKeyExpr {
            expr: expr.to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> MalformedKind {
        self.kind
    }

    /// The rejected string.
    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl fmt::Display for MalformedKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid Key Expr `{}`: {}",
            self.expr,
            self.kind.reason()
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MalformedKeyExpr {}

#[cfg(not(feature = "std"))]
impl zpico_result::IError for MalformedKeyExpr {}

impl From<MalformedKeyExpr> for ZError {
    fn from(e: MalformedKeyExpr) -> Self {
        zerror!((e.kind.errno()) "{}", e)
    }
}

#[test]
fn errno_survives_conversion() {
    use zpico_result::{ErrNo, ErrorCode};

    let e = MalformedKeyExpr::new("a//b", MalformedKind::EmptyChunk);
    assert_eq!(
        e.to_string(),
        "Invalid Key Expr `a//b`: empty chunks are forbidden, as well as leading and trailing slashes"
    );
    let z = ZError::from(e);
    assert_eq!(z.errno(), ErrorCode::new(-2));
}
