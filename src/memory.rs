//! Raw target-memory primitives.
//!
//! Every typed view in the crate bottoms out in these functions. They read and
//! write `T`-shaped bytes at a [`RawAddress`] without any alignment
//! requirement, because wrapped structures are frequently packed (a `bool`
//! at offset 125 is perfectly ordinary).

use std::mem::size_of;
use std::ptr;

use crate::core::address::RawAddress;

/// Size of a pointer-sized slot in the target address space.
pub const POINTER_SIZE: usize = size_of::<usize>();

/// Read a `T` at `addr`.
///
/// # Safety
///
/// `addr` must be valid for reads of `size_of::<T>()` bytes and those bytes
/// must form a valid `T`.
#[inline]
pub unsafe fn read<T>(addr: RawAddress) -> T {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::read_unaligned(addr.as_ptr::<T>()) }
}

/// Write a `T` at `addr`.
///
/// The previous contents are overwritten without being dropped.
///
/// # Safety
///
/// `addr` must be valid for writes of `size_of::<T>()` bytes.
#[inline]
pub unsafe fn write<T>(addr: RawAddress, value: T) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::write_unaligned(addr.as_mut_ptr::<T>(), value) }
}

/// Read a pointer-sized address stored at `addr`.
///
/// # Safety
///
/// `addr` must be valid for reads of [`POINTER_SIZE`] bytes.
#[inline]
pub unsafe fn read_address(addr: RawAddress) -> RawAddress {
    // SAFETY: guaranteed by the caller.
    RawAddress::new(unsafe { read::<usize>(addr) })
}

/// Copy `len` bytes from `src` to `dst`. The regions may overlap.
///
/// # Safety
///
/// `src` must be valid for reads and `dst` valid for writes of `len` bytes.
#[inline]
pub unsafe fn copy(src: RawAddress, dst: RawAddress, len: usize) {
    // SAFETY: guaranteed by the caller; `ptr::copy` tolerates overlap.
    unsafe { ptr::copy(src.as_ptr::<u8>(), dst.as_mut_ptr::<u8>(), len) }
}

/// View `len` bytes at `addr` as a slice.
///
/// # Safety
///
/// `addr` must be valid for reads of `len` bytes for the lifetime `'a` and
/// the bytes must not be written through another path meanwhile.
#[inline]
pub unsafe fn bytes<'a>(addr: RawAddress, len: usize) -> &'a [u8] {
    // SAFETY: guaranteed by the caller.
    unsafe { std::slice::from_raw_parts(addr.as_ptr::<u8>(), len) }
}
