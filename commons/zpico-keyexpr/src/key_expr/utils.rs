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

/// A byte pattern that byte strings are split on.
pub(crate) trait Delimiter: Copy {
    fn width(self) -> usize;
    fn find_in(self, haystack: &[u8]) -> Option<usize>;
    fn rfind_in(self, haystack: &[u8]) -> Option<usize>;
}

impl Delimiter for u8 {
    fn width(self) -> usize {
        1
    }
    fn find_in(self, haystack: &[u8]) -> Option<usize> {
        haystack.iter().position(|&c| c == self)
    }
    fn rfind_in(self, haystack: &[u8]) -> Option<usize> {
        haystack.iter().rposition(|&c| c == self)
    }
}

impl<const N: usize> Delimiter for &'static [u8; N] {
    fn width(self) -> usize {
        N
    }
    fn find_in(self, haystack: &[u8]) -> Option<usize> {
        find(haystack, self)
    }
    fn rfind_in(self, haystack: &[u8]) -> Option<usize> {
        haystack.windows(N).rposition(|w| w == self)
    }
}

/// The parts of a byte string found between occurrences of a delimiter, from either end.
///
/// Like [`slice::split`], `n` delimiters always yield `n + 1` parts, some possibly empty. Cloning
/// is cheap and the clone resumes from the same position.
#[derive(Debug, Clone)]
pub(crate) struct Splitter<'a, D> {
    rest: Option<&'a [u8]>,
    delimiter: D,
}

pub(crate) fn split<D: Delimiter>(s: &[u8], delimiter: D) -> Splitter<'_, D> {
    Splitter {
        rest: Some(s),
        delimiter,
    }
}

impl<'a, D: Delimiter> Iterator for Splitter<'a, D> {
    type Item = &'a [u8];
    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match self.delimiter.find_in(rest) {
            Some(i) => {
                self.rest = Some(&rest[i + self.delimiter.width()..]);
                Some(&rest[..i])
            }
            None => self.rest.take(),
        }
    }
}

impl<D: Delimiter> DoubleEndedIterator for Splitter<'_, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match self.delimiter.rfind_in(rest) {
            Some(i) => {
                self.rest = Some(&rest[..i]);
                Some(&rest[i + self.delimiter.width()..])
            }
            None => self.rest.take(),
        }
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
///
/// The empty needle is found at `0`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn splits() {
    let parts: alloc::vec::Vec<&[u8]> = split(b"a$*$*b$*", b"$*").collect();
    assert_eq!(parts, [&b"a"[..], b"", b"b", b""]);
    let mut parts = split(b"a/b/c", b'/');
    assert_eq!(parts.next_back(), Some(&b"c"[..]));
    assert_eq!(parts.next(), Some(&b"a"[..]));
    assert_eq!(parts.next(), Some(&b"b"[..]));
    assert_eq!(parts.next(), None);
    assert_eq!(parts.next_back(), None);
    assert_eq!(split(b"", b'/').count(), 1);
    assert_eq!(find(b"abxxcxxcd", b"cd"), Some(7));
}
