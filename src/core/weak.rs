//! Weak wrappers: by-value placeholders for sized wrappers.
//!
//! A normal wrapper stores the address of the object it wraps. A [`Weak`]
//! wrapper *is* the object: it occupies exactly the declared size of the
//! strong wrapper and its own address is the object's address. That makes it
//! the representation used wherever a wrapper type appears by value inside
//! another structure or behind a pointer (`*mut Weak<W>`), so a type can
//! refer to itself without needing its full definition at that point.

use std::fmt;
use std::marker::PhantomData;

use crate::core::address::RawAddress;
use crate::core::wrapper::{wrapper_cast, SizedWrapper};

/// Placeholder of exactly `W::SIZE` bytes standing in for a wrapped object.
///
/// Weak wrappers cannot be created by value in safe code; they are only
/// reached through references into memory that a strong wrapper already
/// attested, e.g. [`crate::Field::weak`].
#[repr(transparent)]
pub struct Weak<W: SizedWrapper> {
    _storage: W::Storage,
    _strong: PhantomData<W>,
}

impl<W: SizedWrapper> Weak<W> {
    /// Address of the represented object, which is the placeholder's own address.
    pub fn raw(&self) -> RawAddress {
        RawAddress::from_ptr(self as *const Self)
    }

    /// Promote to the strong wrapper by reinterpreting the placeholder's address.
    pub fn to_strong(&self) -> W {
        // SAFETY: a `Weak<W>` only exists as a view of memory already attested
        // to hold a `W`-shaped object.
        unsafe { wrapper_cast(self.raw()) }
    }

    /// Reinterpret the object at `raw` as its placeholder.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live `W`-shaped object for the lifetime `'a`.
    pub unsafe fn from_raw<'a>(raw: RawAddress) -> &'a Self {
        // SAFETY: guaranteed by the caller; `Weak<W>` has alignment 1.
        unsafe { &*raw.as_ptr::<Self>() }
    }

    /// The placeholder bytes, i.e. the object's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `Storage` is `[u8; N]`, so the placeholder is `SIZE` initialized bytes.
        unsafe { crate::memory::bytes(self.raw(), W::SIZE) }
    }
}

impl<W: SizedWrapper> fmt::Debug for Weak<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weak")
            .field("raw", &self.raw())
            .field("size", &W::SIZE)
            .finish()
    }
}
