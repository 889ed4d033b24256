//! Core identity types for remodel.
//!
//! This module contains the building blocks everything else is bound to:
//! the [`RawAddress`](address::RawAddress) value, the pointer getters that
//! compute member locations, the wrapper traits with the unchecked cast, and
//! weak wrappers for by-value nesting.

pub mod address;
pub mod getter;
pub mod weak;
pub mod wrapper;

pub use address::RawAddress;
pub use getter::PtrGetter;
pub use weak::Weak;
pub use wrapper::{
    address_of_obj, address_of_wrapper, wrapper_cast, SizedWrapper, Storage, Wrapper,
};
