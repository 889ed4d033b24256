//! Platform preconditions.
//!
//! Function handles round-trip entry points through [`RawAddress`](crate::RawAddress)
//! values, which only works when code and data pointers share a width.

use std::mem::size_of;

const _: () = assert!(
    size_of::<fn()>() == size_of::<*const ()>(),
    "code and data pointers must have the same width"
);

const _: () = assert!(size_of::<usize>() == size_of::<*const ()>());

/// Target architecture this build was compiled for.
pub const TARGET_ARCH: &str = std::env::consts::ARCH;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::POINTER_SIZE;

    #[test]
    fn test_pointer_width() {
        assert_eq!(POINTER_SIZE, size_of::<fn()>());
        assert!(!TARGET_ARCH.is_empty());
    }
}
