//! Pointer getters: how a field or function finds its effective address.
//!
//! A [`PtrGetter`] maps the base address of a wrapped object to the address
//! of one of its members. Offsets and absolute addresses are pure integer
//! math; virtual-table slots read two pointers from target memory.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::address::RawAddress;
use crate::memory::{self, POINTER_SIZE};

/// Effective-address computation for a field or function.
///
/// Getters are plain data: they can be compared, hashed and described in
/// layout configuration (see [`crate::config`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PtrGetter {
    /// `base + delta`.
    Offset {
        /// Signed displacement from the object's base address.
        delta: isize,
    },
    /// A fixed address; the base is ignored.
    Absolute {
        /// The address returned for every base.
        address: RawAddress,
    },
    /// Slot `index` of the function table whose pointer lives at
    /// `base + vtable_offset`.
    #[serde(rename = "vtable_slot")]
    VTableSlot {
        /// Index of the function inside the table.
        index: usize,
        /// Offset of the table pointer inside the object.
        #[serde(default)]
        vtable_offset: usize,
    },
}

impl PtrGetter {
    /// Getter adding `delta` to the base address.
    pub const fn offset(delta: isize) -> Self {
        PtrGetter::Offset { delta }
    }

    /// Getter always returning `address`.
    pub fn absolute(address: impl Into<RawAddress>) -> Self {
        PtrGetter::Absolute {
            address: address.into(),
        }
    }

    /// Getter for virtual-table slot `index` with the table pointer at offset 0.
    pub const fn vtable(index: usize) -> Self {
        PtrGetter::VTableSlot {
            index,
            vtable_offset: 0,
        }
    }

    /// Getter for virtual-table slot `index` with the table pointer at `vtable_offset`.
    pub const fn vtable_at(index: usize, vtable_offset: usize) -> Self {
        PtrGetter::VTableSlot {
            index,
            vtable_offset,
        }
    }

    /// Returns `true` if applying the getter never touches target memory.
    pub const fn is_pure(&self) -> bool {
        !matches!(self, PtrGetter::VTableSlot { .. })
    }

    /// Compute the effective address for an object based at `base`.
    ///
    /// # Safety
    ///
    /// For [`PtrGetter::VTableSlot`], `base + vtable_offset` must hold a
    /// readable pointer to a table with at least `index + 1` readable
    /// pointer-sized slots. The other variants never dereference.
    #[inline]
    pub unsafe fn apply(&self, base: RawAddress) -> RawAddress {
        match *self {
            PtrGetter::Offset { delta } => base.offset(delta),
            PtrGetter::Absolute { address } => address,
            PtrGetter::VTableSlot {
                index,
                vtable_offset,
            } => {
                // SAFETY: guaranteed by the caller.
                let table = unsafe { memory::read_address(base.add(vtable_offset)) };
                // SAFETY: guaranteed by the caller.
                unsafe { memory::read_address(table.add(index.wrapping_mul(POINTER_SIZE))) }
            }
        }
    }

    /// Getter for a location `extra` bytes past what `self` yields for `base`.
    ///
    /// Offset getters stay lazy; anything else is resolved now and pinned as an
    /// absolute address.
    ///
    /// # Safety
    ///
    /// Same contract as [`PtrGetter::apply`].
    pub(crate) unsafe fn displaced(&self, base: RawAddress, extra: isize) -> Self {
        match *self {
            PtrGetter::Offset { delta } => PtrGetter::offset(delta.wrapping_add(extra)),
            // SAFETY: guaranteed by the caller.
            _ => PtrGetter::absolute(unsafe { self.apply(base) }.offset(extra)),
        }
    }
}

impl fmt::Display for PtrGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PtrGetter::Offset { delta } if *delta < 0 => write!(f, "base-{:#x}", delta.unsigned_abs()),
            PtrGetter::Offset { delta } => write!(f, "base+{:#x}", delta),
            PtrGetter::Absolute { address } => write!(f, "{}", address),
            PtrGetter::VTableSlot {
                index,
                vtable_offset,
            } => write!(f, "vtable@{:#x}[{}]", vtable_offset, index),
        }
    }
}
