//! Operator forwarding for arithmetic and boolean fields.
//!
//! Binary operators read the field and return a plain value; compound
//! assignments read, combine and write back. Which operators exist for a
//! field follows the marker traits of its target type, mirroring the
//! category's [`Operators`](super::Operators) set.
//!
//! Integer arithmetic, shifts and negation wrap on overflow (see
//! [`Numeric`]), so a counter in target memory rolls over rather than
//! panicking. Dividing by zero panics as it does for plain integers.

use std::cmp::Ordering;
use std::fmt;
use std::ops;

use super::access::{Arithmetic, Bitwise, FieldType, Integer, Numeric, Signed};
use super::Field;

macro_rules! forward_binary {
    ($bound:ident: $($op:ident $method:ident, $assign:ident $assign_method:ident => $combine:path;)+) => {
        $(
            impl<'w, D> ops::$op<D::Target> for Field<'w, D>
            where
                D: ?Sized + FieldType,
                D::Target: $bound,
            {
                type Output = D::Target;

                #[inline]
                fn $method(self, rhs: D::Target) -> D::Target {
                    $combine(self.get(), rhs)
                }
            }

            impl<'w, D> ops::$assign<D::Target> for Field<'w, D>
            where
                D: ?Sized + FieldType,
                D::Target: $bound,
            {
                #[inline]
                fn $assign_method(&mut self, rhs: D::Target) {
                    self.set($combine(self.get(), rhs));
                }
            }
        )+
    };
}

forward_binary! { Numeric:
    Add add, AddAssign add_assign => Numeric::wrapping_add;
    Sub sub, SubAssign sub_assign => Numeric::wrapping_sub;
    Mul mul, MulAssign mul_assign => Numeric::wrapping_mul;
    Div div, DivAssign div_assign => Numeric::wrapping_div;
    Rem rem, RemAssign rem_assign => Numeric::wrapping_rem;
}

forward_binary! { Bitwise:
    BitAnd bitand, BitAndAssign bitand_assign => ops::BitAnd::bitand;
    BitOr bitor, BitOrAssign bitor_assign => ops::BitOr::bitor;
    BitXor bitxor, BitXorAssign bitxor_assign => ops::BitXor::bitxor;
}

macro_rules! forward_shift {
    ($($op:ident $method:ident, $assign:ident $assign_method:ident => $combine:path;)+) => {
        $(
            impl<'w, D> ops::$op<u32> for Field<'w, D>
            where
                D: ?Sized + FieldType,
                D::Target: Integer,
            {
                type Output = D::Target;

                #[inline]
                fn $method(self, rhs: u32) -> D::Target {
                    $combine(self.get(), rhs)
                }
            }

            impl<'w, D> ops::$assign<u32> for Field<'w, D>
            where
                D: ?Sized + FieldType,
                D::Target: Integer,
            {
                #[inline]
                fn $assign_method(&mut self, rhs: u32) {
                    self.set($combine(self.get(), rhs));
                }
            }
        )+
    };
}

forward_shift! {
    Shl shl, ShlAssign shl_assign => Integer::wrapping_shl;
    Shr shr, ShrAssign shr_assign => Integer::wrapping_shr;
}

impl<'w, D> ops::Neg for Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Signed,
{
    type Output = D::Target;

    #[inline]
    fn neg(self) -> D::Target {
        self.get().wrapping_neg()
    }
}

impl<'w, D> ops::Not for Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Integer,
{
    type Output = D::Target;

    #[inline]
    fn not(self) -> D::Target {
        !self.get()
    }
}

impl<'w, D> Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Numeric,
{
    /// Add one and return the new value, wrapping at the type's maximum.
    #[inline]
    pub fn increment(&self) -> D::Target {
        let value = self.get().wrapping_add(D::Target::ONE);
        self.set(value);
        value
    }

    /// Subtract one and return the new value, wrapping at the type's minimum.
    #[inline]
    pub fn decrement(&self) -> D::Target {
        let value = self.get().wrapping_sub(D::Target::ONE);
        self.set(value);
        value
    }
}

impl<'w, D> PartialEq<D::Target> for Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Arithmetic,
{
    fn eq(&self, other: &D::Target) -> bool {
        self.get() == *other
    }
}

impl<'w, D> PartialOrd<D::Target> for Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Arithmetic,
{
    fn partial_cmp(&self, other: &D::Target) -> Option<Ordering> {
        self.get().partial_cmp(other)
    }
}

impl<'w, D> fmt::Display for Field<'w, D>
where
    D: ?Sized + FieldType,
    D::Target: Arithmetic + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}
