//! Wrappers embedded by value inside other wrapped objects.
//!
//! A sized wrapper used as a field type is stored as its [`Weak`]
//! placeholder: reading the field yields the strong wrapper bound to the
//! field's address, and writing copies `SIZE` bytes from another object.

use super::access::{Access, FieldType};
use super::category;
use super::Field;
use crate::core::address::RawAddress;
use crate::core::weak::Weak;
use crate::core::wrapper::{wrapper_cast, SizedWrapper};
use crate::memory;

/// Field types that stand for a sized wrapper embedded by value.
pub trait Nested: Access {
    /// The strong wrapper type.
    type Strong: SizedWrapper;
}

#[doc(hidden)]
#[inline]
pub unsafe fn load_wrapper<W: SizedWrapper>(addr: RawAddress) -> W {
    // SAFETY: guaranteed by the caller.
    unsafe { wrapper_cast(addr) }
}

#[doc(hidden)]
#[inline]
pub unsafe fn store_wrapper<W: SizedWrapper>(addr: RawAddress, value: W) {
    // SAFETY: guaranteed by the caller; both objects span `W::SIZE` bytes.
    unsafe { memory::copy(value.address_of_obj(), addr, W::SIZE) }
}

unsafe impl<W: SizedWrapper> Access for Weak<W> {
    type Category = category::Wrapped;
    type Value = W;
    type Repr = Weak<W>;

    #[inline]
    unsafe fn load(addr: RawAddress) -> W {
        // SAFETY: guaranteed by the caller.
        unsafe { load_wrapper(addr) }
    }

    #[inline]
    unsafe fn store(addr: RawAddress, value: W) {
        // SAFETY: guaranteed by the caller.
        unsafe { store_wrapper(addr, value) }
    }
}

impl<W: SizedWrapper> Nested for Weak<W> {
    type Strong = W;
}

impl<'w, D> Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Nested,
{
    /// The embedded object's placeholder, living at the field's address.
    pub fn weak(&self) -> &'w Weak<<D::Target as Nested>::Strong> {
        // SAFETY: the binding was attested in `bind`, and the placeholder
        // lives no longer than the parent borrow.
        unsafe { Weak::from_raw(self.address_of_obj()) }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use crate::core::address::RawAddress;
    use crate::core::weak::Weak;
    use crate::core::wrapper::{wrapper_cast, Wrapper};
    use crate::field::{Field, Operators, Ref};

    crate::wrapper! {
        struct Inner(8) {
            lo: u32 => offset(0),
            hi: u32 => offset(4),
        }
    }

    crate::wrapper! {
        struct Outer(24) {
            tag: u8 => offset(0),
            inner: Inner => offset(8),
            weak_inner: Weak<Inner> => offset(16),
            next: *mut Outer => offset(16),
            linked: Ref<Inner> => offset(16),
        }
    }

    #[test]
    fn test_nested_field_binds_in_place() {
        let mut buf = [0u8; 24];
        let base = RawAddress::from_mut_ptr(buf.as_mut_ptr());
        let outer: Outer = unsafe { wrapper_cast(base) };

        let inner = outer.inner().get();
        assert_eq!(inner.address_of_obj(), base.add(8));
        inner.hi().set(0xabcd);
        assert_eq!(outer.inner().weak().raw(), base.add(8));
        assert_eq!(outer.inner().weak().to_strong().hi().get(), 0xabcd);
        assert_eq!(Field::<Inner>::operators(), Operators::MEMBER_ACCESS);
        assert_eq!(Field::<Inner>::category(), "wrapper");
    }

    #[test]
    fn test_nested_assignment_copies_bytes() {
        let mut buf = [0u8; 24];
        let base = RawAddress::from_mut_ptr(buf.as_mut_ptr());
        let outer: Outer = unsafe { wrapper_cast(base) };
        let source = outer.weak_inner().get();
        source.lo().set(1);
        source.hi().set(2);

        outer.inner().set(source);
        assert_eq!(outer.inner().get().lo().get(), 1);
        assert_eq!(outer.inner().get().hi().get(), 2);
        assert_eq!(outer.weak_inner().get().address_of_obj(), base.add(16));
    }

    #[test]
    fn test_wrapper_pointer_strides_by_declared_size() {
        let mut nodes = [[0u8; 24]; 3];
        let first = RawAddress::from_mut_ptr(nodes.as_mut_ptr());
        let mut head = [0u8; 24];
        let head_addr = RawAddress::from_mut_ptr(head.as_mut_ptr());
        let outer: Outer = unsafe { wrapper_cast(head_addr) };

        outer.next().set(first.as_mut_ptr::<Weak<Outer>>());
        assert_eq!(size_of::<Weak<Outer>>(), 24);
        assert_eq!(outer.next().at(2).get().address_of_obj(), first.add(48));
        outer.next().at(1).get().tag().set(9);
        assert_eq!(nodes[1][0], 9);
    }

    #[test]
    fn test_reference_to_wrapper() {
        let mut target = [0u8; 8];
        let target_addr = RawAddress::from_mut_ptr(target.as_mut_ptr());
        let mut buf = [0u8; 24];
        let slot = target_addr.value().to_ne_bytes();
        buf[16..16 + slot.len()].copy_from_slice(&slot);
        let outer: Outer = unsafe { wrapper_cast(RawAddress::from_mut_ptr(buf.as_mut_ptr())) };

        assert_eq!(outer.linked().get().address_of_obj(), target_addr);
        outer.linked().get().lo().set(77);
        assert_eq!(outer.linked().weak().raw(), target_addr);
        assert_eq!(&target[0..4], &77u32.to_ne_bytes());
    }
}
