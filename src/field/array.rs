//! Fixed-size array fields.

use std::mem::size_of;

use super::access::Element;
use super::Field;

impl<'w, T: Element, const N: usize> Field<'w, [T; N]> {
    /// Number of elements.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` for zero-length arrays.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Field viewing element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn element(&self, index: usize) -> Field<'w, T> {
        assert!(index < N, "index {} out of bounds for array of {}", index, N);
        let extra = (index * size_of::<T>()) as isize;
        // SAFETY: the binding was attested in `bind`.
        self.derive(unsafe { self.getter().displaced(self.parent(), extra) })
    }

    /// Field viewing the first element, i.e. the array decayed and dereferenced.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn first(&self) -> Field<'w, T> {
        self.element(0)
    }

    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *mut T {
        self.address_of_obj().as_mut_ptr()
    }

    /// Pointer `count` elements past the first.
    pub fn add(&self, count: usize) -> *mut T {
        self.as_ptr().wrapping_add(count)
    }

    /// Pointer `count` elements before the first.
    pub fn sub(&self, count: usize) -> *mut T {
        self.as_ptr().wrapping_sub(count)
    }

    /// Fields for every element, in order.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = Field<'w, T>> {
        let array = *self;
        (0..N).map(move |index| array.element(index))
    }
}
