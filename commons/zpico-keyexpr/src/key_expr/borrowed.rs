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
use alloc::{
    borrow::{Borrow, ToOwned},
    format,
    string::String,
};
use core::{
    convert::{TryFrom, TryInto},
    fmt,
    ops::Deref,
};

use zpico_result::{ZError, ZResult};

use super::{
    chunks::{self, Chunks},
    include::{Includer, DEFAULT_INCLUDER},
    intersect::{Intersector, DEFAULT_INTERSECTOR},
    MalformedKeyExpr, OwnedKeyExpr, SINGLE_WILD,
};

/// A [`str`] newtype that is statically known to be a valid key expression.
///
/// * Key expressions are `/`-separated lists of chunks. Chunks are never empty: a key expression
///   may not be empty, start or end with `/`, nor contain `//`.
/// * A chunk is either `*` (exactly one chunk), `**` (any number of chunks, including none), or a
///   literal in which each `$*` token stands for any substring, including the empty one.
/// * `*` may not appear anywhere else: `a*`, `***` or `$**` are rejected.
///
/// Unlike canon-form key expressions, equivalent spellings such as `**/**` and `**`, or `**/*` and
/// `*/**`, are all accepted; matching treats them as equal.
///
/// Each key expression stands for the set of concrete keys it matches. `a/*` and `*/a`
/// [intersect](keyexpr::intersects()) since both match `a/a`, while `a/*/**`
/// [includes](keyexpr::includes()) `a/b/**` since it matches every key the latter does.
#[allow(non_camel_case_types)]
#[repr(transparent)]
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct keyexpr(str);

impl keyexpr {
    /// Validates `t` and views it as a key expression, without copying.
    pub fn new<'a, T, E>(t: &'a T) -> Result<&'a Self, E>
    where
        &'a Self: TryFrom<&'a T, Error = E>,
        T: ?Sized,
    {
        t.try_into()
    }

    /// Returns `true` if at least one concrete key is matched by both `self` and `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        DEFAULT_INTERSECTOR.intersect(self, other)
    }

    /// Returns `true` if every concrete key matched by `other` is also matched by `self`.
    ///
    /// The check never claims an inclusion that does not hold, but a `**` in `other` is only
    /// ever covered by a `**` in `self`: `*/**` is thus not reported to include `**/x`.
    pub fn includes(&self, other: &Self) -> bool {
        DEFAULT_INCLUDER.includes(self, other)
    }

    /// How `self` relates to `other`: [`SetIntersectionLevel::Includes`] means `self` includes `other`.
    ///
    /// Up to three matching passes are run, so prefer [`keyexpr::intersects`] or
    /// [`keyexpr::includes`] when only one answer is needed.
    pub fn relation_to(&self, other: &Self) -> SetIntersectionLevel {
        if !self.intersects(other) {
            return SetIntersectionLevel::Disjoint;
        }
        match (self.includes(other), other.includes(self)) {
            (true, true) => SetIntersectionLevel::Equals,
            (true, false) => SetIntersectionLevel::Includes,
            _ => SetIntersectionLevel::Intersects,
        }
    }

    /// Appends `other` after a `/`, validating the result.
    ///
    /// ```rust
    /// # use zpico_keyexpr::keyexpr;
    /// let workspace = keyexpr::new("some/workspace").unwrap();
    /// assert_eq!(workspace.join("some/topic").unwrap().as_str(), "some/workspace/some/topic");
    /// assert!(workspace.join("/absolute").is_err());
    /// ```
    pub fn join<S: AsRef<str> + ?Sized>(&self, other: &S) -> ZResult<OwnedKeyExpr> {
        let joined: String = format!("{}/{}", self, other.as_ref());
        OwnedKeyExpr::try_from(joined).map_err(|e| ZError::from(e).into())
    }

    /// Returns `true` if `self` contains any wildcard (`*`, `**` or `$*`).
    pub fn is_wild(&self) -> bool {
        self.0.contains(SINGLE_WILD as char)
    }

    /// Returns the longest prefix of `self` made of chunks that don't contain any wildcard.
    ///
    /// # Examples:
    /// ```
    /// # use zpico_keyexpr::keyexpr;
    /// assert_eq!(
    ///     Some(keyexpr::new("demo/example").unwrap()),
    ///     keyexpr::new("demo/example/**").unwrap().get_nonwild_prefix());
    /// assert_eq!(
    ///     Some(keyexpr::new("demo").unwrap()),
    ///     keyexpr::new("demo/ex$*/**").unwrap().get_nonwild_prefix());
    /// assert_eq!(
    ///     None,
    ///     keyexpr::new("dem$*").unwrap().get_nonwild_prefix());
    /// ```
    pub fn get_nonwild_prefix(&self) -> Option<&keyexpr> {
        match self.0.find(SINGLE_WILD as char) {
            Some(i) => self.0[..i]
                .rfind('/')
                // A prefix cut on a delimiter before any star is made of valid literal chunks.
                .map(|j| unsafe { keyexpr::from_str_unchecked(&self.0[..j]) }),
            None => Some(self),
        }
    }

    /// Iterates over the chunks of `self`, lazily and without copying.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// # Safety
    /// `s` must be a valid key expression. Breaking this is memory-safe, but matching results on
    /// such a `keyexpr` are meaningless.
    pub unsafe fn from_str_unchecked(s: &str) -> &Self {
        // `keyexpr` is a `repr(transparent)` wrapper around `str`.
        &*(s as *const str as *const keyexpr)
    }
}

/// How two key expressions relate, as sets of keys.
///
/// Levels are ordered so that each implies the ones below it: `level >= Includes` checks for
/// inclusion, `level >= Intersects` for intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetIntersectionLevel {
    Disjoint,
    Intersects,
    Includes,
    Equals,
}

impl fmt::Debug for keyexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ke`{}`", self.as_str())
    }
}

impl fmt::Display for keyexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl<'a> TryFrom<&'a str> for &'a keyexpr {
    type Error = MalformedKeyExpr;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        chunks::validate(value).map_err(|kind| MalformedKeyExpr::new(value, kind))?;
        Ok(unsafe { keyexpr::from_str_unchecked(value) })
    }
}

impl<'a> TryFrom<&'a String> for &'a keyexpr {
    type Error = MalformedKeyExpr;
    fn try_from(value: &'a String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl Deref for keyexpr {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for keyexpr {
    fn as_ref(&self) -> &str {
        self
    }
}

impl PartialEq<str> for keyexpr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<keyexpr> for str {
    fn eq(&self, other: &keyexpr) -> bool {
        self == other.as_str()
    }
}

impl Borrow<keyexpr> for OwnedKeyExpr {
    fn borrow(&self) -> &keyexpr {
        self
    }
}

impl ToOwned for keyexpr {
    type Owned = OwnedKeyExpr;
    fn to_owned(&self) -> Self::Owned {
        OwnedKeyExpr::from(self)
    }
}

#[test]
fn relations() {
    use SetIntersectionLevel::*;
    let ke = |s: &'static str| keyexpr::new(s).unwrap();
    assert!(Disjoint < Intersects && Intersects < Includes && Includes < Equals);
    assert_eq!(ke("a/**").relation_to(ke("b/**")), Disjoint);
    assert_eq!(ke("a/*").relation_to(ke("*/a")), Intersects);
    assert_eq!(ke("a/*/**").relation_to(ke("a/b/**")), Includes);
    assert_eq!(ke("a/b/**").relation_to(ke("a/*/**")), Intersects);
    assert_eq!(ke("a/**/**").relation_to(ke("a/**")), Equals);
    assert_eq!(ke("**/*").relation_to(ke("*/**")), Equals);
}

#[test]
fn wildness() {
    let ke = |s: &'static str| keyexpr::new(s).unwrap();
    assert!(!ke("a/b").is_wild());
    assert!(ke("a/*").is_wild());
    assert!(ke("a$*").is_wild());
    assert_eq!(ke("**").get_nonwild_prefix(), None);
    assert_eq!(
        ke("demo/example/test").get_nonwild_prefix(),
        Some(ke("demo/example/test"))
    );
    assert_eq!(format!("{:?}", ke("a/$*b")), "ke`a/$*b`");
}
