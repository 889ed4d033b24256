//! Pointer fields: indirection, subscript and pointer arithmetic.
//!
//! A `*mut T` field stores `*mut T::Repr`, so pointers to wrappers are
//! stored as pointers to their [`Weak`](crate::Weak) placeholders and are
//! strided by the wrapper's declared size.

use std::mem::size_of;

use super::access::Access;
use super::Field;
use crate::core::address::RawAddress;
use crate::core::getter::PtrGetter;

macro_rules! pointer_field {
    ($($ptr:ident),+) => {
        $(
            impl<'w, T: Access> Field<'w, *$ptr T> {
                /// Returns `true` if the stored pointer is null.
                pub fn is_null(&self) -> bool {
                    self.get().is_null()
                }

                /// Field viewing the pointee.
                ///
                /// The pointer is read now and not checked; a null or dangling
                /// pointer makes any later access undefined behavior.
                pub fn target(&self) -> Field<'w, T> {
                    self.at(0)
                }

                /// Field viewing element `index` of the pointed-to sequence.
                pub fn at(&self, index: usize) -> Field<'w, T> {
                    let base = RawAddress::from_ptr(self.get());
                    let stride = index.wrapping_mul(size_of::<T::Repr>());
                    self.derive(PtrGetter::absolute(base.add(stride)))
                }

                /// Pointer `count` elements past the stored one.
                pub fn add(&self, count: usize) -> *$ptr T::Repr {
                    self.get().wrapping_add(count)
                }

                /// Pointer `count` elements before the stored one.
                pub fn sub(&self, count: usize) -> *$ptr T::Repr {
                    self.get().wrapping_sub(count)
                }
            }
        )+
    };
}

pointer_field!(mut, const);

#[cfg(test)]
mod tests {
    use std::ffi::c_void;

    use crate::core::address::RawAddress;
    use crate::core::wrapper::{wrapper_cast, Wrapper};
    use crate::field::{Field, Operators};

    #[derive(Clone, Copy)]
    struct Blob(RawAddress);

    impl Wrapper for Blob {
        unsafe fn from_raw(raw: RawAddress) -> Self {
            Blob(raw)
        }

        fn address_of_obj(&self) -> RawAddress {
            self.0
        }
    }

    #[repr(C)]
    struct Holder {
        pad: u32,
        items: *mut u16,
        opaque: *const c_void,
    }

    #[test]
    fn test_pointer_subscript_and_arithmetic() {
        let mut items = [10u16, 20, 30, 40];
        let mut holder = Holder {
            pad: 0,
            items: items.as_mut_ptr(),
            opaque: std::ptr::null(),
        };
        let b: Blob = unsafe { wrapper_cast(RawAddress::from_mut_ptr(&mut holder as *mut Holder)) };
        let field = unsafe { Field::<*mut u16>::at_offset(&b, std::mem::offset_of!(Holder, items) as isize) };

        assert!(!field.is_null());
        assert_eq!(field.target().get(), 10);
        assert_eq!(field.at(2).get(), 30);
        field.at(3).set(44);
        assert_eq!(field.add(1), items.as_mut_ptr().wrapping_add(1));
        assert_eq!(field.add(2).wrapping_sub(2), field.get());

        field.set(field.add(1));
        assert_eq!(field.target().get(), 20);
        assert_eq!(field.sub(1), items.as_mut_ptr());
        assert_eq!(items[3], 44);
        assert_eq!(holder.pad, 0);
    }

    #[test]
    fn test_void_pointer_is_opaque_value() {
        let mut holder = Holder {
            pad: 0,
            items: std::ptr::null_mut(),
            opaque: std::ptr::null(),
        };
        let b: Blob = unsafe { wrapper_cast(RawAddress::from_mut_ptr(&mut holder as *mut Holder)) };
        let field =
            unsafe { Field::<*const c_void>::at_offset(&b, std::mem::offset_of!(Holder, opaque) as isize) };
        assert!(field.get().is_null());
        field.set(0x1000 as *const c_void);
        assert_eq!(field.get() as usize, 0x1000);
        assert!(Field::<*const c_void>::operators().contains(Operators::INDIRECTION));
        assert_eq!(holder.opaque as usize, 0x1000);
    }
}
