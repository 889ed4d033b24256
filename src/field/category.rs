//! Field categories and the operator set each one supports.
//!
//! Every field type belongs to exactly one category. The category decides
//! how the field is addressed and which operators a [`Field`](super::Field)
//! forwards for it; the operator implementations in [`super::ops`] are gated
//! on the same split, and [`Category::OPERATORS`] states it explicitly.

use bitflags::bitflags;

bitflags! {
    /// Operators a field category forwards to the underlying value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Operators: u32 {
        /// `+ - * / %` and their compound assignments.
        const ARITHMETIC = 1 << 0;
        /// `increment()`.
        const INCREMENT = 1 << 1;
        /// `decrement()`.
        const DECREMENT = 1 << 2;
        /// Unary `-`.
        const UNARY_MINUS = 1 << 3;
        /// `& | ^` and their compound assignments.
        const BITWISE = 1 << 4;
        /// Unary `!` as bitwise complement.
        const BITWISE_NOT = 1 << 5;
        /// `<< >>` and their compound assignments.
        const SHIFT = 1 << 6;
        /// `== != < <= > >=` against plain values.
        const COMPARE = 1 << 7;
        /// Following a pointer to its target.
        const INDIRECTION = 1 << 8;
        /// Element access by index.
        const SUBSCRIPT = 1 << 9;
        /// Pointer-style advance by an element count.
        const POINTER_ADD = 1 << 10;
        /// Pointer-style retreat by an element count.
        const POINTER_SUB = 1 << 11;
        /// Access to the members of a structured value.
        const MEMBER_ACCESS = 1 << 12;
    }
}

/// Access policy of a field category.
pub trait Category {
    /// Human readable category name.
    const NAME: &'static str;
    /// Operators forwarded for fields of this category.
    const OPERATORS: Operators;
}

const INTEGER_OPERATORS: Operators = Operators::ARITHMETIC
    .union(Operators::INCREMENT)
    .union(Operators::DECREMENT)
    .union(Operators::BITWISE)
    .union(Operators::BITWISE_NOT)
    .union(Operators::SHIFT)
    .union(Operators::COMPARE);

const POINTER_OPERATORS: Operators = Operators::INDIRECTION
    .union(Operators::SUBSCRIPT)
    .union(Operators::POINTER_ADD)
    .union(Operators::POINTER_SUB);

/// Signed integers (`i8` to `i128`, `isize`).
pub enum SignedInteger {}

impl Category for SignedInteger {
    const NAME: &'static str = "signed integer";
    const OPERATORS: Operators = INTEGER_OPERATORS.union(Operators::UNARY_MINUS);
}

/// Unsigned integers (`u8` to `u128`, `usize`); no negation.
pub enum UnsignedInteger {}

impl Category for UnsignedInteger {
    const NAME: &'static str = "unsigned integer";
    const OPERATORS: Operators = INTEGER_OPERATORS;
}

/// Floating point numbers; no bitwise operators.
pub enum Float {}

impl Category for Float {
    const NAME: &'static str = "float";
    const OPERATORS: Operators = Operators::ARITHMETIC
        .union(Operators::INCREMENT)
        .union(Operators::DECREMENT)
        .union(Operators::UNARY_MINUS)
        .union(Operators::COMPARE);
}

/// `bool`; logical `& | ^` only, no complement and no stepping.
pub enum Boolean {}

impl Category for Boolean {
    const NAME: &'static str = "boolean";
    const OPERATORS: Operators = Operators::BITWISE.union(Operators::COMPARE);
}

/// Raw pointers.
pub enum Pointer {}

impl Category for Pointer {
    const NAME: &'static str = "pointer";
    const OPERATORS: Operators = POINTER_OPERATORS;
}

/// Fixed-size arrays of plain elements.
pub enum Array {}

impl Category for Array {
    const NAME: &'static str = "array";
    const OPERATORS: Operators = POINTER_OPERATORS;
}

/// Trivially copyable structures registered with [`crate::trivial!`].
pub enum Aggregate {}

impl Category for Aggregate {
    const NAME: &'static str = "aggregate";
    const OPERATORS: Operators = Operators::MEMBER_ACCESS;
}

/// Sized wrappers embedded by value.
pub enum Wrapped {}

impl Category for Wrapped {
    const NAME: &'static str = "wrapper";
    const OPERATORS: Operators = Operators::MEMBER_ACCESS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disallowed_operators() {
        assert!(!Float::OPERATORS.contains(Operators::BITWISE_NOT));
        assert!(!Float::OPERATORS.contains(Operators::BITWISE));
        assert!(!UnsignedInteger::OPERATORS.contains(Operators::UNARY_MINUS));
        assert!(SignedInteger::OPERATORS.contains(Operators::UNARY_MINUS));
        for op in [
            Operators::INCREMENT,
            Operators::DECREMENT,
            Operators::BITWISE_NOT,
        ] {
            assert!(!Boolean::OPERATORS.contains(op));
        }
    }

    #[test]
    fn test_pointer_like_categories() {
        for ops in [Pointer::OPERATORS, Array::OPERATORS] {
            assert!(ops.contains(Operators::SUBSCRIPT | Operators::INDIRECTION));
            assert!(ops.contains(Operators::POINTER_ADD | Operators::POINTER_SUB));
            assert!(!ops.intersects(Operators::ARITHMETIC | Operators::COMPARE));
        }
    }

    #[test]
    fn test_structured_categories() {
        assert_eq!(Aggregate::OPERATORS, Operators::MEMBER_ACCESS);
        assert_eq!(Wrapped::OPERATORS, Operators::MEMBER_ACCESS);
        assert_eq!(Wrapped::NAME, "wrapper");
    }
}
