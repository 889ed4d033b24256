//! Raw address type.
//!
//! This module provides [`RawAddress`], the untyped location every wrapper,
//! field and function handle is ultimately bound to. A raw address is never
//! owned: whether it points at live memory is entirely up to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RemodelError;

/// An untyped location in the target address space.
///
/// Pointer-sized and `Copy`. Arithmetic on raw addresses wraps, mirroring
/// plain integer address math; nothing here ever dereferences.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(try_from = "AddressLiteral", into = "usize")]
pub struct RawAddress(usize);

impl RawAddress {
    /// The null address.
    pub const NULL: RawAddress = RawAddress(0);

    /// Create a raw address from its numeric value.
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Create a raw address from a pointer.
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<u8>() as usize)
    }

    /// Create a raw address from a mutable pointer.
    pub fn from_mut_ptr<T: ?Sized>(ptr: *mut T) -> Self {
        Self(ptr.cast::<u8>() as usize)
    }

    /// The numeric value of the address.
    pub const fn value(self) -> usize {
        self.0
    }

    /// Returns `true` for the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Reinterpret the address as a typed const pointer.
    pub const fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    /// Reinterpret the address as a typed mutable pointer.
    pub const fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    /// Displace the address by a signed byte count (wrapping).
    pub const fn offset(self, delta: isize) -> Self {
        Self(self.0.wrapping_add_signed(delta))
    }

    /// Advance the address by `count` bytes (wrapping).
    pub const fn add(self, count: usize) -> Self {
        Self(self.0.wrapping_add(count))
    }

    /// Move the address back by `count` bytes (wrapping).
    pub const fn sub(self, count: usize) -> Self {
        Self(self.0.wrapping_sub(count))
    }

    /// Displace the address by a signed byte count.
    ///
    /// Returns `None` if the result would leave the address space.
    pub const fn checked_offset(self, delta: isize) -> Option<Self> {
        match self.0.checked_add_signed(delta) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Signed distance in bytes from `origin` to `self`.
    pub const fn distance_from(self, origin: RawAddress) -> isize {
        self.0.wrapping_sub(origin.0) as isize
    }
}

impl fmt::Display for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<usize> for RawAddress {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<RawAddress> for usize {
    fn from(address: RawAddress) -> Self {
        address.0
    }
}

impl<T> From<*const T> for RawAddress {
    fn from(ptr: *const T) -> Self {
        Self::from_ptr(ptr)
    }
}

impl<T> From<*mut T> for RawAddress {
    fn from(ptr: *mut T) -> Self {
        Self::from_mut_ptr(ptr)
    }
}

impl FromStr for RawAddress {
    type Err = RemodelError;

    /// Parses `0x`-prefixed hexadecimal or plain decimal text.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => usize::from_str_radix(&hex.replace('_', ""), 16),
            None => trimmed.replace('_', "").parse::<usize>(),
        };
        parsed
            .map(Self)
            .map_err(|_| RemodelError::InvalidAddress(text.to_string()))
    }
}

/// Accepted serialized forms of an address: a number or a text literal.
#[derive(Deserialize)]
#[serde(untagged)]
enum AddressLiteral {
    Number(usize),
    Text(String),
}

impl TryFrom<AddressLiteral> for RawAddress {
    type Error = RemodelError;

    fn try_from(literal: AddressLiteral) -> Result<Self, Self::Error> {
        match literal {
            AddressLiteral::Number(value) => Ok(Self(value)),
            AddressLiteral::Text(text) => text.parse(),
        }
    }
}
