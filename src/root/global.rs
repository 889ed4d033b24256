//! The global root: fields and functions at absolute addresses.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::core::address::RawAddress;
use crate::core::getter::PtrGetter;
use crate::core::wrapper::Wrapper;
use crate::field::{Field, FieldType};
use crate::function::{Function, Signature};

/// Process-wide root whose object address is null.
///
/// Everything declared on it uses absolute addresses, which makes it the
/// natural parent for global variables and free functions of the target.
#[derive(Debug)]
pub struct Global {
    _private: (),
}

static GLOBAL: Lazy<Global> = Lazy::new(|| {
    debug!("global root initialized");
    Global { _private: () }
});

impl Global {
    /// The singleton, created on first use.
    pub fn instance() -> &'static Global {
        &GLOBAL
    }

    /// Field of type `T` at the absolute `address`.
    ///
    /// # Safety
    ///
    /// `address` must hold a `T` whenever the field is read or written.
    pub unsafe fn field<T: FieldType + ?Sized>(&self, address: impl Into<RawAddress>) -> Field<'_, T> {
        // SAFETY: forwarded to the caller.
        unsafe { Field::bind(self, PtrGetter::absolute(address)) }
    }

    /// Function with signature `F` at the absolute `address`.
    ///
    /// # Safety
    ///
    /// `address` must be the entry point of a function with signature `F`.
    pub unsafe fn function<F: Signature>(&self, address: impl Into<RawAddress>) -> Function<F> {
        // SAFETY: forwarded to the caller.
        unsafe { Function::at(address) }
    }
}

impl Wrapper for Global {
    unsafe fn from_raw(_raw: RawAddress) -> Self {
        Global { _private: () }
    }

    fn address_of_obj(&self) -> RawAddress {
        RawAddress::NULL
    }
}
