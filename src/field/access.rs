//! Type-level dispatch: which types can be fields, and how they are accessed.

use std::ffi::c_void;
use std::ops;

use crate::core::address::RawAddress;
use crate::field::category::{self, Category};
use crate::memory;

/// Load and store rules for a type that can be viewed through a [`Field`](super::Field).
///
/// # Safety
///
/// `load` and `store` must touch no more than `size_of::<Self::Repr>()`
/// bytes at the given address, and `load` must produce a valid `Value` from
/// any bytes a conforming target object holds there.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be viewed through a field",
    label = "unsupported field type",
    note = "fields hold primitive numbers, `bool`, raw pointers, `[T; N]` of plain elements, `Copy` structs registered with `trivial!`, and sized wrappers",
    note = "Rust references (`&T`, `&mut T`) are not field types; use `Ref<T>` for a stored reference"
)]
pub unsafe trait Access: Sized {
    /// Category policy deciding the forwarded operators.
    type Category: Category;
    /// What `get` returns and `set` accepts.
    type Value;
    /// In-memory representation; wrappers are represented by [`Weak`](crate::Weak).
    type Repr;

    /// Read the value stored at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be readable for `size_of::<Self::Repr>()` bytes.
    unsafe fn load(addr: RawAddress) -> Self::Value;

    /// Store `value` at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be writable for `size_of::<Self::Repr>()` bytes.
    unsafe fn store(addr: RawAddress, value: Self::Value);
}

/// Declared type of a field: a directly stored [`Access`] type or a
/// [`Ref`] to one.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a supported field type",
    label = "unsupported field type",
    note = "unknown-size arrays (`[T]`) cannot be fields; declare `[T; N]` or a pointer",
    note = "plain wrappers have no declared size; declare the size (`struct Name(SIZE)`) or use a pointer field"
)]
pub trait FieldType {
    /// Type the field ultimately reads and writes.
    type Target: Access;
    /// Whether the stored bytes are an address to follow first.
    const INDIRECT: bool;
}

impl<T: Access> FieldType for T {
    type Target = T;
    const INDIRECT: bool = false;
}

/// Reference field: the slot holds the address of a `T`.
///
/// Never instantiated; only used as a declared field type. References to
/// references are rejected since `Ref<T>` itself is not [`Access`].
pub struct Ref<T> {
    _target: std::marker::PhantomData<fn() -> T>,
}

impl<T: Access> FieldType for Ref<T> {
    type Target = T;
    const INDIRECT: bool = true;
}

/// Value type read and written by a field declared as `D`.
pub type ValueOf<D> = <<D as FieldType>::Target as Access>::Value;

/// Types that may be the element of an array field, or the pointee of a
/// strided pointer without rewriting.
///
/// # Safety
///
/// The value must be its own in-memory representation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be an array element",
    label = "not a plain element type",
    note = "arrays of wrappers and weak wrappers are not supported; declare a pointer field (`*mut Weak<W>`) and index it with `at`"
)]
pub unsafe trait Element: Access<Value = Self, Repr = Self> + Copy {}

/// Plain values supporting comparison against fields.
pub trait Arithmetic: Access<Value = Self> + Copy + PartialEq + PartialOrd {}

/// Arithmetic values with `+ - * / %`, stepping and compound assignment.
///
/// Field operators go through the `wrapping_*` methods: integer overflow
/// wraps around like the target's own unsigned arithmetic instead of
/// panicking, and floats use ordinary IEEE arithmetic. Division or remainder
/// by zero still panics.
pub trait Numeric:
    Arithmetic
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
    + ops::Div<Output = Self>
    + ops::Rem<Output = Self>
{
    /// Step used by `increment` and `decrement`.
    const ONE: Self;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_div(self, rhs: Self) -> Self;
    fn wrapping_rem(self, rhs: Self) -> Self;
}

/// Values with `& | ^`.
pub trait Bitwise:
    Arithmetic + ops::BitAnd<Output = Self> + ops::BitOr<Output = Self> + ops::BitXor<Output = Self>
{
}

/// Integers: complement and shifts.
///
/// Shift amounts are masked to the bit width, as with `wrapping_shl`.
pub trait Integer:
    Numeric + Bitwise + ops::Not<Output = Self> + ops::Shl<u32, Output = Self> + ops::Shr<u32, Output = Self>
{
    fn wrapping_shl(self, rhs: u32) -> Self;
    fn wrapping_shr(self, rhs: u32) -> Self;
}

/// Numeric values with negation.
pub trait Signed: Numeric + ops::Neg<Output = Self> {
    /// Negation; `MIN` negates to itself for integers.
    fn wrapping_neg(self) -> Self;
}

macro_rules! plain_access {
    ($category:ty => $($ty:ty),+ $(,)?) => {
        $(
            unsafe impl Access for $ty {
                type Category = $category;
                type Value = $ty;
                type Repr = $ty;

                #[inline]
                unsafe fn load(addr: RawAddress) -> $ty {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::read(addr) }
                }

                #[inline]
                unsafe fn store(addr: RawAddress, value: $ty) {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::write(addr, value) }
                }
            }

            unsafe impl Element for $ty {}
            impl Arithmetic for $ty {}
        )+
    };
}

macro_rules! numeric {
    (int: $($ty:ty),+) => {
        $(
            impl Numeric for $ty {
                const ONE: Self = 1;

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$ty>::wrapping_mul(self, rhs)
                }

                #[inline]
                fn wrapping_div(self, rhs: Self) -> Self {
                    <$ty>::wrapping_div(self, rhs)
                }

                #[inline]
                fn wrapping_rem(self, rhs: Self) -> Self {
                    <$ty>::wrapping_rem(self, rhs)
                }
            }
        )+
    };
    (float: $($ty:ty),+) => {
        $(
            impl Numeric for $ty {
                const ONE: Self = 1.0;

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline]
                fn wrapping_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline]
                fn wrapping_rem(self, rhs: Self) -> Self {
                    self % rhs
                }
            }
        )+
    };
}

plain_access!(category::SignedInteger => i8, i16, i32, i64, i128, isize);
plain_access!(category::UnsignedInteger => u8, u16, u32, u64, u128, usize);
plain_access!(category::Float => f32, f64);

numeric!(int: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric!(float: f32, f64);

macro_rules! integer {
    ($($ty:ty),+) => {
        $(
            impl Bitwise for $ty {}

            impl Integer for $ty {
                #[inline]
                fn wrapping_shl(self, rhs: u32) -> Self {
                    <$ty>::wrapping_shl(self, rhs)
                }

                #[inline]
                fn wrapping_shr(self, rhs: u32) -> Self {
                    <$ty>::wrapping_shr(self, rhs)
                }
            }
        )+
    };
}

integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! signed {
    (int: $($ty:ty),+) => {
        $(
            impl Signed for $ty {
                #[inline]
                fn wrapping_neg(self) -> Self {
                    <$ty>::wrapping_neg(self)
                }
            }
        )+
    };
    (float: $($ty:ty),+) => {
        $(
            impl Signed for $ty {
                #[inline]
                fn wrapping_neg(self) -> Self {
                    -self
                }
            }
        )+
    };
}

signed!(int: i8, i16, i32, i64, i128, isize);
signed!(float: f32, f64);

// `bool` is read through a byte so that any non-zero value reads as `true`.
unsafe impl Access for bool {
    type Category = category::Boolean;
    type Value = bool;
    type Repr = bool;

    #[inline]
    unsafe fn load(addr: RawAddress) -> bool {
        // SAFETY: guaranteed by the caller.
        unsafe { memory::read::<u8>(addr) != 0 }
    }

    #[inline]
    unsafe fn store(addr: RawAddress, value: bool) {
        // SAFETY: guaranteed by the caller.
        unsafe { memory::write(addr, u8::from(value)) }
    }
}

unsafe impl Element for bool {}
impl Arithmetic for bool {}
impl Bitwise for bool {}

macro_rules! pointer_access {
    ($($ptr:ident),+) => {
        $(
            unsafe impl<T: Access> Access for *$ptr T {
                type Category = category::Pointer;
                type Value = *$ptr T::Repr;
                type Repr = *$ptr T::Repr;

                #[inline]
                unsafe fn load(addr: RawAddress) -> Self::Value {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::read(addr) }
                }

                #[inline]
                unsafe fn store(addr: RawAddress, value: Self::Value) {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::write(addr, value) }
                }
            }

            unsafe impl<T: Access<Repr = T>> Element for *$ptr T {}

            unsafe impl Access for *$ptr c_void {
                type Category = category::Pointer;
                type Value = *$ptr c_void;
                type Repr = *$ptr c_void;

                #[inline]
                unsafe fn load(addr: RawAddress) -> Self::Value {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::read(addr) }
                }

                #[inline]
                unsafe fn store(addr: RawAddress, value: Self::Value) {
                    // SAFETY: guaranteed by the caller.
                    unsafe { memory::write(addr, value) }
                }
            }

            unsafe impl Element for *$ptr c_void {}
        )+
    };
}

pointer_access!(mut, const);

unsafe impl<T: Element, const N: usize> Access for [T; N] {
    type Category = category::Array;
    type Value = [T; N];
    type Repr = [T; N];

    #[inline]
    unsafe fn load(addr: RawAddress) -> [T; N] {
        // SAFETY: guaranteed by the caller.
        unsafe { memory::read(addr) }
    }

    #[inline]
    unsafe fn store(addr: RawAddress, value: [T; N]) {
        // SAFETY: guaranteed by the caller.
        unsafe { memory::write(addr, value) }
    }
}

unsafe impl<T: Element, const N: usize> Element for [T; N] {}

/// Register `#[repr(C)]` `Copy` structs as aggregate field types.
///
/// ```
/// #[repr(C)]
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Vec3 {
///     x: f32,
///     y: f32,
///     z: f32,
/// }
///
/// remodel::trivial!(Vec3);
/// ```
#[macro_export]
macro_rules! trivial {
    ($($ty:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::field::Access for $ty {
                type Category = $crate::field::category::Aggregate;
                type Value = $ty;
                type Repr = $ty;

                #[inline]
                unsafe fn load(addr: $crate::RawAddress) -> $ty {
                    // SAFETY: guaranteed by the caller.
                    unsafe { $crate::memory::read(addr) }
                }

                #[inline]
                unsafe fn store(addr: $crate::RawAddress, value: $ty) {
                    // SAFETY: guaranteed by the caller.
                    unsafe { $crate::memory::write(addr, value) }
                }
            }

            unsafe impl $crate::field::Element for $ty {}
        )+
    };
}
