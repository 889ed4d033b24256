//! Wrapper identity and the unchecked cast.
//!
//! A wrapper is a typed handle around a [`RawAddress`]. Copying a wrapper
//! copies the address, never the wrapped bytes. Sized wrappers additionally
//! declare how many bytes the wrapped structure occupies, which is what
//! allows them to be embedded by value, strided over and instantiated.

use crate::core::address::RawAddress;

/// A typed view of an object living at some raw address.
///
/// Implementations are normally generated by [`crate::wrapper!`].
pub trait Wrapper: Sized {
    /// Bind a wrapper to `raw` without any validation.
    ///
    /// # Safety
    ///
    /// See [`wrapper_cast`].
    #[doc(hidden)]
    unsafe fn from_raw(raw: RawAddress) -> Self;

    /// Address of the wrapped object.
    fn address_of_obj(&self) -> RawAddress;

    /// Address of the wrapper value itself (not of the wrapped object).
    fn address_of_wrapper(&self) -> *const Self {
        self
    }
}

mod sealed {
    pub trait Sealed {}
    impl<const N: usize> Sealed for [u8; N] {}
}

/// Fixed-size byte storage backing sized wrappers.
///
/// Implemented for `[u8; N]` only.
pub trait Storage: sealed::Sealed + Copy + 'static {}

impl<const N: usize> Storage for [u8; N] {}

/// A wrapper whose wrapped structure has a declared byte size.
///
/// The declared size must match the real structure exactly whenever the
/// type is embedded by value, strided over through a pointer, or
/// instantiated. A mismatch is undefined behavior, not a detected error.
pub trait SizedWrapper: Wrapper + Copy {
    /// `[u8; SIZE]`.
    type Storage: Storage;

    /// Declared size of the wrapped structure, in bytes.
    const SIZE: usize = std::mem::size_of::<Self::Storage>();

    /// Hook run when an [`crate::Instantiable`] of this type is dropped.
    ///
    /// The hook must not keep a copy of the wrapper it is given; the buffer
    /// is freed right after it returns.
    const DESTRUCT: Option<fn(&Self)> = None;
}

/// Create a wrapper bound to `raw`.
///
/// This is the crate's unsafe boundary: no check is made that `raw` is
/// non-null, aligned, or shaped like `W`.
///
/// # Safety
///
/// For as long as the returned wrapper, or any field or function handle
/// derived from it, is used, `raw` must point to a live object whose layout
/// matches every field and function declared on `W`, and whose declared
/// size (for sized wrappers) is exact.
#[inline]
pub unsafe fn wrapper_cast<W: Wrapper>(raw: impl Into<RawAddress>) -> W {
    // SAFETY: guaranteed by the caller.
    unsafe { W::from_raw(raw.into()) }
}

/// Address of the object wrapped by `wrapper`.
pub fn address_of_obj<W: Wrapper>(wrapper: &W) -> RawAddress {
    wrapper.address_of_obj()
}

/// Address of the wrapper value (not of the wrapped object).
pub fn address_of_wrapper<W: Wrapper>(wrapper: &W) -> *const W {
    wrapper.address_of_wrapper()
}
