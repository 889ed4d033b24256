//! Native function signatures and calling conventions.
//!
//! [`Signature`] is implemented for `extern "<abi>" fn` pointers of up to
//! eleven arguments ([`MethodSignature`] for up to ten, plus the receiver), in
//! safe and `unsafe` flavors, for every calling convention the build target
//! supports. The ABI is part of the type, so a wrapper declared
//! with `extern "thiscall" fn(u32)` is called with exactly that convention.

use std::ffi::c_void;
use std::mem;

use crate::core::address::RawAddress;

/// Native calling conventions a [`Signature`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    /// `extern "Rust"`, i.e. plain `fn` pointers.
    Rust,
    /// `extern "C"`.
    C,
    /// `extern "system"`: stdcall on 32-bit Windows, C elsewhere.
    System,
    /// `extern "sysv64"`.
    #[cfg(target_arch = "x86_64")]
    SysV64,
    /// `extern "win64"`.
    #[cfg(target_arch = "x86_64")]
    Win64,
    /// `extern "cdecl"`.
    #[cfg(target_arch = "x86")]
    Cdecl,
    /// `extern "stdcall"`.
    #[cfg(target_arch = "x86")]
    Stdcall,
    /// `extern "fastcall"`.
    #[cfg(target_arch = "x86")]
    Fastcall,
    /// `extern "thiscall"`: receiver passed in `ecx`.
    #[cfg(target_arch = "x86")]
    Thiscall,
    /// `extern "efiapi"`.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))]
    Efiapi,
}

impl CallingConvention {
    /// The ABI string as written in Rust source.
    pub const fn abi(self) -> &'static str {
        match self {
            CallingConvention::Rust => "Rust",
            CallingConvention::C => "C",
            CallingConvention::System => "system",
            #[cfg(target_arch = "x86_64")]
            CallingConvention::SysV64 => "sysv64",
            #[cfg(target_arch = "x86_64")]
            CallingConvention::Win64 => "win64",
            #[cfg(target_arch = "x86")]
            CallingConvention::Cdecl => "cdecl",
            #[cfg(target_arch = "x86")]
            CallingConvention::Stdcall => "stdcall",
            #[cfg(target_arch = "x86")]
            CallingConvention::Fastcall => "fastcall",
            #[cfg(target_arch = "x86")]
            CallingConvention::Thiscall => "thiscall",
            #[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))]
            CallingConvention::Efiapi => "efiapi",
        }
    }
}

/// A native function pointer type that can be called through a raw address.
pub trait Signature: Copy + 'static {
    /// Arguments as a tuple.
    type Args;
    /// Return type.
    type Output;
    /// Calling convention of the pointer type.
    const CONVENTION: CallingConvention;
    /// Number of declared arguments.
    const ARITY: usize;

    /// Reinterpret `addr` as a function pointer of this type.
    ///
    /// # Safety
    ///
    /// `addr` must be the entry point of a function with this exact signature
    /// and calling convention.
    unsafe fn from_address(addr: RawAddress) -> Self;

    /// Entry point address.
    fn address(self) -> RawAddress;

    /// Call the function.
    ///
    /// # Safety
    ///
    /// The call must satisfy whatever contract the target function has.
    unsafe fn invoke(self, args: Self::Args) -> Self::Output;
}

/// Signatures that can also be called as methods, with the receiver passed
/// as a leading `*mut c_void` argument.
pub trait MethodSignature: Signature {
    /// The native pointer type including the receiver.
    type Method: Signature;

    /// Call the method at `addr` on the object `this`.
    ///
    /// # Safety
    ///
    /// `addr` must be the entry point of a method with the receiver-extended
    /// signature, and `this` a valid receiver for it.
    unsafe fn invoke_method(addr: RawAddress, this: *mut c_void, args: Self::Args) -> Self::Output;
}

/// Signatures declared without `unsafe`, which handles may call from safe code.
pub trait SafeCall: Signature {}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! signature_impl {
    ($abi:tt $conv:ident [$($unsafety:ident)?] $($arg:ident: $ty:ident),*) => {
        impl<R: 'static $(, $ty: 'static)*> Signature for $($unsafety)? extern $abi fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;
            const CONVENTION: CallingConvention = CallingConvention::$conv;
            const ARITY: usize = count!($($ty)*);

            #[inline]
            unsafe fn from_address(addr: RawAddress) -> Self {
                // SAFETY: function pointers are address-sized; the entry point
                // is guaranteed by the caller.
                unsafe { mem::transmute_copy::<usize, Self>(&addr.value()) }
            }

            #[inline]
            fn address(self) -> RawAddress {
                RawAddress::new(self as usize)
            }

            #[inline]
            #[allow(unused_unsafe)]
            unsafe fn invoke(self, args: Self::Args) -> R {
                let ($($arg,)*) = args;
                // SAFETY: guaranteed by the caller.
                unsafe { (self)($($arg),*) }
            }
        }
    };
}

macro_rules! method_impl {
    ($abi:tt [$($unsafety:ident)?] $($arg:ident: $ty:ident),*) => {
        impl<R: 'static $(, $ty: 'static)*> MethodSignature for $($unsafety)? extern $abi fn($($ty),*) -> R {
            type Method = $($unsafety)? extern $abi fn(*mut c_void $(, $ty)*) -> R;

            #[inline]
            unsafe fn invoke_method(addr: RawAddress, this: *mut c_void, args: Self::Args) -> R {
                // SAFETY: guaranteed by the caller.
                let method = unsafe { <Self::Method as Signature>::from_address(addr) };
                let ($($arg,)*) = args;
                // SAFETY: guaranteed by the caller.
                unsafe { <Self::Method as Signature>::invoke(method, (this, $($arg,)*)) }
            }
        }
    };
}

macro_rules! signature_arity {
    ($abi:tt $conv:ident; $($arg:ident: $ty:ident),*) => {
        signature_impl!($abi $conv [] $($arg: $ty),*);
        signature_impl!($abi $conv [unsafe] $($arg: $ty),*);

        impl<R: 'static $(, $ty: 'static)*> SafeCall for extern $abi fn($($ty),*) -> R {}
    };
}

macro_rules! method_arity {
    ($abi:tt; $($arg:ident: $ty:ident),*) => {
        method_impl!($abi [] $($arg: $ty),*);
        method_impl!($abi [unsafe] $($arg: $ty),*);
    };
}

// Methods declare up to ten arguments; the receiver-extended pointer
// underneath has one more.
macro_rules! abi_signatures {
    ($($abi:tt => $conv:ident),+ $(,)?) => {
        $(
            signature_arity!($abi $conv;);
            signature_arity!($abi $conv; a0: A0);
            signature_arity!($abi $conv; a0: A0, a1: A1);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9);
            signature_arity!($abi $conv; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10);

            method_arity!($abi;);
            method_arity!($abi; a0: A0);
            method_arity!($abi; a0: A0, a1: A1);
            method_arity!($abi; a0: A0, a1: A1, a2: A2);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
            method_arity!($abi; a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9);
        )+
    };
}

abi_signatures! {
    "Rust" => Rust,
    "C" => C,
    "system" => System,
}

#[cfg(target_arch = "x86_64")]
abi_signatures! {
    "sysv64" => SysV64,
    "win64" => Win64,
}

#[cfg(target_arch = "x86")]
abi_signatures! {
    "cdecl" => Cdecl,
    "stdcall" => Stdcall,
    "fastcall" => Fastcall,
    "thiscall" => Thiscall,
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))]
abi_signatures! {
    "efiapi" => Efiapi,
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    extern "C" fn answer() -> u64 {
        42
    }

    fn rust_abi(x: u8) -> u8 {
        x.wrapping_mul(2)
    }

    extern "C" fn scaled(this: *mut c_void, factor: u32) -> u32 {
        // SAFETY: the test passes a pointer to a u32.
        unsafe { *(this as *const u32) * factor }
    }

    #[test]
    fn test_signature_metadata() {
        type Add = extern "C" fn(i32, i32) -> i32;
        assert_eq!(<Add as Signature>::ARITY, 2);
        assert_eq!(<Add as Signature>::CONVENTION, CallingConvention::C);
        assert_eq!(<fn(u8) -> u8 as Signature>::CONVENTION, CallingConvention::Rust);
        assert_eq!(
            <unsafe extern "system" fn() as Signature>::CONVENTION.abi(),
            "system"
        );
    }

    #[test]
    fn test_address_round_trip_and_invoke() {
        let f: extern "C" fn(i32, i32) -> i32 = add;
        let addr = f.address();
        let g = unsafe { <extern "C" fn(i32, i32) -> i32>::from_address(addr) };
        assert_eq!(unsafe { g.invoke((2, 3)) }, 5);

        let h: extern "C" fn() -> u64 = answer;
        assert_eq!(unsafe { h.invoke(()) }, 42);

        let r: fn(u8) -> u8 = rust_abi;
        assert_eq!(unsafe { r.invoke((21,)) }, 42);
    }

    #[test]
    fn test_method_prepends_receiver() {
        let mut value = 7u32;
        let this = &mut value as *mut u32 as *mut c_void;
        let method: extern "C" fn(*mut c_void, u32) -> u32 = scaled;
        let result = unsafe {
            <extern "C" fn(u32) -> u32 as MethodSignature>::invoke_method(method.address(), this, (3,))
        };
        assert_eq!(result, 21);
    }
}
