//! Typed fields over wrapped objects.
//!
//! A [`Field`] is a transient view bound to a parent wrapper and a
//! [`PtrGetter`]. Creating one reads nothing; every `get`/`set` recomputes
//! the location from the parent's current object address. What a field can
//! do depends on the category of its declared type:
//!
//! - numbers and `bool` forward Rust operators ([`ops`]),
//! - raw pointers can be followed and indexed ([`pointer`]),
//! - fixed-size arrays can be subscripted and iterated ([`array`]),
//! - aggregates support read-modify-write ([`Field::update`]),
//! - sized wrappers read back as wrappers bound in place ([`nested`]),
//! - [`Ref<T>`] fields follow one stored address and then behave as `T`.

pub mod access;
pub mod array;
pub mod category;
pub mod nested;
pub mod ops;
pub mod pointer;

use std::fmt;
use std::marker::PhantomData;

use crate::core::address::RawAddress;
use crate::core::getter::PtrGetter;
use crate::core::wrapper::Wrapper;
use crate::memory;

pub use access::{
    Access, Arithmetic, Bitwise, Element, FieldType, Integer, Numeric, Ref, Signed, ValueOf,
};
pub use category::{Category, Operators};
pub use nested::Nested;

/// A typed view of one member of a wrapped object.
///
/// The `'w` lifetime borrows the parent wrapper, so a field never outlives
/// the wrapper it was obtained from. Fields are neither `Send` nor `Sync`.
pub struct Field<'w, D: ?Sized + FieldType> {
    parent: RawAddress,
    getter: PtrGetter,
    _marker: PhantomData<(&'w (), *const D)>,
}

impl<D: ?Sized + FieldType> Clone for Field<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized + FieldType> Copy for Field<'_, D> {}

impl<'w, D: ?Sized + FieldType> Field<'w, D> {
    /// Bind a field of declared type `D` to `parent` through `getter`.
    ///
    /// # Safety
    ///
    /// Whenever the field is read or written, `getter` applied to the parent's
    /// object address must yield memory holding a `D` (for [`Ref`], a pointer
    /// to a `T`).
    #[inline]
    pub unsafe fn bind<P: Wrapper>(parent: &'w P, getter: PtrGetter) -> Self {
        Field {
            parent: parent.address_of_obj(),
            getter,
            _marker: PhantomData,
        }
    }

    /// Bind a field at `offset` bytes into `parent`.
    ///
    /// # Safety
    ///
    /// See [`Field::bind`].
    #[inline]
    pub unsafe fn at_offset<P: Wrapper>(parent: &'w P, offset: isize) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::bind(parent, PtrGetter::offset(offset)) }
    }

    /// Derived field sharing the parent binding.
    #[inline]
    pub(crate) fn derive<E: ?Sized + FieldType>(&self, getter: PtrGetter) -> Field<'w, E> {
        Field {
            parent: self.parent,
            getter,
            _marker: PhantomData,
        }
    }

    /// Object address of the parent wrapper the field is bound to.
    pub fn parent(&self) -> RawAddress {
        self.parent
    }

    /// Getter locating the field inside its parent.
    pub fn getter(&self) -> PtrGetter {
        self.getter
    }

    /// Address of the viewed value, following the stored address for [`Ref`] fields.
    #[inline]
    pub fn address_of_obj(&self) -> RawAddress {
        // SAFETY: the binding was attested in `bind`.
        let slot = unsafe { self.getter.apply(self.parent) };
        if D::INDIRECT {
            // SAFETY: for `Ref` fields the slot holds an address.
            unsafe { memory::read_address(slot) }
        } else {
            slot
        }
    }

    /// Address of the field handle itself.
    pub fn address_of_wrapper(&self) -> *const Self {
        self
    }

    /// Read the current value.
    #[inline]
    pub fn get(&self) -> ValueOf<D> {
        // SAFETY: the binding was attested in `bind`.
        unsafe { D::Target::load(self.address_of_obj()) }
    }

    /// Overwrite the current value.
    #[inline]
    pub fn set(&self, value: ValueOf<D>) {
        // SAFETY: the binding was attested in `bind`.
        unsafe { D::Target::store(self.address_of_obj(), value) }
    }

    /// Store `value` and return the previous one.
    pub fn replace(&self, value: ValueOf<D>) -> ValueOf<D> {
        let previous = self.get();
        self.set(value);
        previous
    }

    /// Copy the value of `other` into this field. The binding of `self` is unchanged.
    pub fn assign<E>(&self, other: &Field<'_, E>)
    where
        E: ?Sized + FieldType<Target = D::Target>,
    {
        self.set(other.get());
    }

    /// Operators forwarded by this field's category.
    pub const fn operators() -> Operators {
        <<D::Target as Access>::Category as Category>::OPERATORS
    }

    /// Name of this field's category.
    pub const fn category() -> &'static str {
        <<D::Target as Access>::Category as Category>::NAME
    }
}

impl<'w, D> Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Element,
{
    /// Read, modify in place, and write back.
    ///
    /// This is how members of aggregate fields are changed:
    /// `pos.update(|v| v.x += 1.0)`.
    pub fn update<R>(&self, f: impl FnOnce(&mut D::Target) -> R) -> R {
        let mut value = self.get();
        let result = f(&mut value);
        self.set(value);
        result
    }
}

impl<'w, T: Access> Field<'w, Ref<T>> {
    /// Direct field at the referenced address.
    ///
    /// The stored address is read now; the result no longer follows later
    /// changes to the reference slot.
    pub fn referent(&self) -> Field<'w, T> {
        self.derive(PtrGetter::absolute(self.address_of_obj()))
    }
}

impl<D: ?Sized + FieldType> fmt::Debug for Field<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("type", &std::any::type_name::<D>())
            .field("category", &Self::category())
            .field("parent", &self.parent)
            .field("getter", &format_args!("{}", self.getter))
            .finish()
    }
}
