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
use alloc::{string::String, sync::Arc};
use core::{
    convert::TryFrom,
    fmt,
    ops::{Deref, Div},
    str::FromStr,
};

use super::{chunks, keyexpr, MalformedKeyExpr};

/// A [`Arc<str>`] newtype that is statically known to be a valid key expression.
///
/// See [`keyexpr`](super::borrowed::keyexpr).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnedKeyExpr(pub(crate) Arc<str>);

impl OwnedKeyExpr {
    /// Equivalent to `OwnedKeyExpr::try_from(t)`.
    ///
    /// Will return an Err if `t` isn't a valid key expression.
    pub fn new<T, E>(t: T) -> Result<Self, E>
    where
        Self: TryFrom<T, Error = E>,
    {
        Self::try_from(t)
    }

    /// # Safety
    /// Key Expressions must follow some rules to be accepted by a Zenoh network.
    /// Messing with these rules breaks matching, so be very careful with this method.
    pub unsafe fn from_string_unchecked(s: String) -> Self {
        OwnedKeyExpr(s.into())
    }
}

impl Deref for OwnedKeyExpr {
    type Target = keyexpr;
    fn deref(&self) -> &Self::Target {
        unsafe { keyexpr::from_str_unchecked(&self.0) }
    }
}

impl AsRef<str> for OwnedKeyExpr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Div<&keyexpr> for &OwnedKeyExpr {
    type Output = OwnedKeyExpr;
    fn div(self, rhs: &keyexpr) -> Self::Output {
        // Both sides are valid, so their concatenation around a `/` is too.
        unsafe { OwnedKeyExpr::from_string_unchecked(alloc::format!("{}/{}", self, rhs)) }
    }
}

impl fmt::Debug for OwnedKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl fmt::Display for OwnedKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for OwnedKeyExpr {
    type Error = MalformedKeyExpr;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        chunks::validate(&value).map_err(|kind| MalformedKeyExpr::new(&value, kind))?;
        Ok(OwnedKeyExpr(value.into()))
    }
}

impl<'a> TryFrom<&'a str> for OwnedKeyExpr {
    type Error = MalformedKeyExpr;
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let ke = <&keyexpr>::try_from(value)?;
        Ok(ke.into())
    }
}

impl FromStr for OwnedKeyExpr {
    type Err = MalformedKeyExpr;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl From<&keyexpr> for OwnedKeyExpr {
    fn from(val: &keyexpr) -> Self {
        OwnedKeyExpr(Arc::from(val.as_str()))
    }
}

impl From<OwnedKeyExpr> for Arc<str> {
    fn from(ke: OwnedKeyExpr) -> Self {
        ke.0
    }
}

impl From<OwnedKeyExpr> for String {
    fn from(ke: OwnedKeyExpr) -> Self {
        ke.as_str().into()
    }
}

impl PartialEq<keyexpr> for OwnedKeyExpr {
    fn eq(&self, other: &keyexpr) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<OwnedKeyExpr> for keyexpr {
    fn eq(&self, other: &OwnedKeyExpr) -> bool {
        self.as_str() == other.as_str()
    }
}

#[test]
fn owned_roundtrips() {
    use alloc::string::ToString;

    use super::MalformedKind;

    let owned: OwnedKeyExpr = "demo/**".parse().unwrap();
    assert_eq!(owned.to_string(), "demo/**");
    assert!(owned.includes(keyexpr::new("demo/a/b").unwrap()));
    let joined = &owned / keyexpr::new("x$*").unwrap();
    assert_eq!(joined.as_str(), "demo/**/x$*");
    assert_eq!(
        OwnedKeyExpr::new(String::from("a/")).unwrap_err().kind(),
        MalformedKind::EmptyChunk
    );
    let borrowed: &keyexpr = &owned;
    assert_eq!(borrowed.to_owned(), owned);
    assert_eq!(String::from(owned), "demo/**");
}
