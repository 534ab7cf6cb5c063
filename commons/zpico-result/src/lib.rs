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

//! ⚠️ WARNING ⚠️
//!
//! This crate is intended for zenoh-pico's internal use.
//!
//! Every failure raised by the workspace is a [`ZError`]: an [`anyhow`] message, the source
//! location that raised it and a strictly negative [`ErrorCode`], which is what C callers get to see.
//! [`zerror!`] builds one in place and [`bail!`] returns it.
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

#[cfg(feature = "std")]
pub use std::error::Error as IError;

/// The part of `std::error::Error` this workspace relies on, for builds without `std`.
#[cfg(not(feature = "std"))]
pub trait IError: fmt::Debug + fmt::Display + core::any::Any {}

#[cfg(not(feature = "std"))]
impl dyn IError + Send + Sync {
    pub fn downcast_ref<T: IError>(&self) -> Option<&T> {
        if core::any::Any::type_id(self) == core::any::TypeId::of::<T>() {
            // Same concrete type, so the data pointer is a valid `*const T`.
            Some(unsafe { &*(self as *const Self as *const T) })
        } else {
            None
        }
    }
}

pub type Error = Box<dyn IError + Send + Sync + 'static>;

pub type ZResult<T> = core::result::Result<T, Error>;

/// The code reported to C callers for an error. Always strictly negative.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i8);

impl ErrorCode {
    /// Used for errors raised without an explicit code.
    pub const GENERIC: ErrorCode = ErrorCode(i8::MIN);

    /// # Panics
    /// If `code` isn't strictly negative.
    pub const fn new(code: i8) -> Self {
        assert!(code < 0, "error codes must be negative");
        ErrorCode(code)
    }

    pub const fn get(self) -> i8 {
        self.0
    }
}

/// Where a [`ZError`] was raised, see [`here!`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

pub struct ZError {
    message: anyhow::Error,
    location: Location,
    code: ErrorCode,
    cause: Option<Error>,
}

impl ZError {
    pub fn new<M: Into<anyhow::Error>>(message: M, location: Location, code: ErrorCode) -> Self {
        ZError {
            message: message.into(),
            location,
            code,
            cause: None,
        }
    }

    /// Records the error that led to this one.
    pub fn caused_by<C: Into<Error>>(mut self, cause: C) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Display for ZError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}.", self.message, self.location)?;
        match &self.cause {
            Some(cause) => write!(f, " - Caused by {}", cause),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ZError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZError")
            .field("message", &format_args!("{}", self.message))
            .field("location", &format_args!("{}", self.location))
            .field("code", &self.code.get())
            .field("cause", &self.cause)
            .finish()
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(not(feature = "std"))]
impl IError for ZError {}

#[cfg(not(feature = "std"))]
impl From<ZError> for Error {
    fn from(e: ZError) -> Self {
        Box::new(e)
    }
}

/// Anything that can be reported to C callers as an [`ErrorCode`].
pub trait ErrNo {
    fn errno(&self) -> ErrorCode;
}

impl ErrNo for ZError {
    fn errno(&self) -> ErrorCode {
        self.code
    }
}

impl ErrNo for dyn IError + Send + Sync {
    fn errno(&self) -> ErrorCode {
        self.downcast_ref::<ZError>()
            .map_or(ErrorCode::GENERIC, ErrNo::errno)
    }
}

pub use anyhow::anyhow;

/// The [`Location`] this macro is expanded at.
#[macro_export]
macro_rules! here {
    () => {
        $crate::Location {
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a [`ZError`] raised at the call site from a format string.
///
/// `zerror!((code) "...", args)` sets the [`ErrorCode`], otherwise [`ErrorCode::GENERIC`] is used.
#[macro_export]
macro_rules! zerror {
    (($code:expr) $($msg:tt)+) => {
        $crate::ZError::new($crate::anyhow!($($msg)+), $crate::here!(), $crate::ErrorCode::new($code))
    };
    ($($msg:tt)+) => {
        $crate::ZError::new($crate::anyhow!($($msg)+), $crate::here!(), $crate::ErrorCode::GENERIC)
    };
}

/// Returns early with a [`zerror!`], converted into the function's error type.
#[macro_export]
macro_rules! bail {
    ($($t:tt)+) => {
        return Err($crate::zerror!($($t)+).into())
    };
}

#[cfg(test)]
fn failing(code: i8) -> ZResult<()> {
    bail!((code) "failed with {}", code)
}

#[test]
fn bail_keeps_code() {
    let e = failing(-4).unwrap_err();
    assert_eq!(e.errno(), ErrorCode::new(-4));
    assert!(e.to_string().starts_with("failed with -4 at "));
}

#[test]
fn foreign_errors_are_generic() {
    let e: Error = zerror!("plain").into();
    assert_eq!(e.errno(), ErrorCode::GENERIC);
    let e: Error = "not a ZError".into();
    assert_eq!(e.errno(), ErrorCode::GENERIC);
}

#[test]
fn cause_is_displayed() {
    let outer = zerror!((-3) "outer").caused_by(zerror!((-2) "inner"));
    assert!(outer.location().file.ends_with("lib.rs"));
    assert!(outer.to_string().contains("Caused by inner"));
    assert_eq!(outer.errno().get(), -3);
}

#[test]
#[should_panic]
fn non_negative_code_panics() {
    let _ = ErrorCode::new(0);
}
