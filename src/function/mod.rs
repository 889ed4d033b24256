//! Callable wrappers: free functions, member functions and virtual functions.
//!
//! A handle pairs a [`PtrGetter`] with a [`Signature`]. Calling it resolves
//! the getter and jumps to the result; nothing is cached or validated, so a
//! patched virtual table is picked up on the next call.

pub mod signature;

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::core::address::RawAddress;
use crate::core::getter::PtrGetter;
use crate::core::wrapper::Wrapper;

pub use signature::{CallingConvention, MethodSignature, SafeCall, Signature};

/// A free function located through a getter applied to a null base.
pub struct Function<F: Signature> {
    getter: PtrGetter,
    _signature: PhantomData<(F, *const ())>,
}

impl<F: Signature> Clone for Function<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Signature> Copy for Function<F> {}

impl<F: Signature> Function<F> {
    /// Function found by applying `getter` to a null base.
    ///
    /// # Safety
    ///
    /// Whenever the function is called, the getter must resolve to the entry
    /// point of a function with signature `F`.
    pub unsafe fn new(getter: PtrGetter) -> Self {
        Function {
            getter,
            _signature: PhantomData,
        }
    }

    /// Function at a fixed address.
    ///
    /// # Safety
    ///
    /// See [`Function::new`].
    pub unsafe fn at(address: impl Into<RawAddress>) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::new(PtrGetter::absolute(address)) }
    }

    /// Function wrapping an existing function pointer.
    pub fn from_fn(f: F) -> Self {
        Function {
            getter: PtrGetter::absolute(f.address()),
            _signature: PhantomData,
        }
    }

    /// Getter locating the function.
    pub fn getter(&self) -> PtrGetter {
        self.getter
    }

    /// Resolved entry point.
    pub fn address(&self) -> RawAddress {
        // SAFETY: the getter was attested in `new`.
        unsafe { self.getter.apply(RawAddress::NULL) }
    }

    /// Resolved native function pointer.
    pub fn get(&self) -> F {
        // SAFETY: the getter was attested in `new`.
        unsafe { F::from_address(self.address()) }
    }

    /// Calling convention of `F`.
    pub const fn convention() -> CallingConvention {
        F::CONVENTION
    }

    /// Call the function.
    pub fn call(&self, args: F::Args) -> F::Output
    where
        F: SafeCall,
    {
        // SAFETY: the signature is not `unsafe` and the getter was attested.
        unsafe { self.get().invoke(args) }
    }

    /// Call a function declared with an `unsafe` signature.
    ///
    /// # Safety
    ///
    /// The call must satisfy the target function's contract.
    pub unsafe fn call_unchecked(&self, args: F::Args) -> F::Output {
        // SAFETY: guaranteed by the caller.
        unsafe { self.get().invoke(args) }
    }
}

impl<F: Signature> fmt::Debug for Function<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &std::any::type_name::<F>())
            .field("getter", &format_args!("{}", self.getter))
            .finish()
    }
}

/// A method bound to the object of its parent wrapper.
///
/// `F` is declared without the receiver; the parent's object address is
/// passed as a leading `*mut c_void` argument on every call.
pub struct MemberFunction<'w, F: MethodSignature> {
    this: RawAddress,
    getter: PtrGetter,
    _marker: PhantomData<(&'w (), F, *const ())>,
}

impl<F: MethodSignature> Clone for MemberFunction<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: MethodSignature> Copy for MemberFunction<'_, F> {}

impl<'w, F: MethodSignature> MemberFunction<'w, F> {
    /// Bind a method of `parent` located through `getter`.
    ///
    /// # Safety
    ///
    /// Whenever the method is called, the getter applied to the parent's
    /// object address must resolve to a method taking the object as receiver
    /// followed by the arguments of `F`.
    pub unsafe fn bind<P: Wrapper>(parent: &'w P, getter: PtrGetter) -> Self {
        MemberFunction {
            this: parent.address_of_obj(),
            getter,
            _marker: PhantomData,
        }
    }

    /// Receiver passed on every call.
    pub fn this(&self) -> RawAddress {
        self.this
    }

    /// Getter locating the method.
    pub fn getter(&self) -> PtrGetter {
        self.getter
    }

    /// Resolved entry point.
    pub fn address(&self) -> RawAddress {
        // SAFETY: the getter was attested in `bind`.
        unsafe { self.getter.apply(self.this) }
    }

    /// Resolved native function pointer, receiver included.
    pub fn get(&self) -> F::Method {
        // SAFETY: the getter was attested in `bind`.
        unsafe { <F::Method as Signature>::from_address(self.address()) }
    }

    /// Calling convention of `F`.
    pub const fn convention() -> CallingConvention {
        F::CONVENTION
    }

    /// Call the method on the bound object.
    pub fn call(&self, args: F::Args) -> F::Output
    where
        F: SafeCall,
    {
        // SAFETY: the signature is not `unsafe` and the getter was attested.
        unsafe { F::invoke_method(self.address(), self.this.as_mut_ptr::<c_void>(), args) }
    }

    /// Call a method declared with an `unsafe` signature.
    ///
    /// # Safety
    ///
    /// The call must satisfy the target method's contract.
    pub unsafe fn call_unchecked(&self, args: F::Args) -> F::Output {
        // SAFETY: guaranteed by the caller.
        unsafe { F::invoke_method(self.address(), self.this.as_mut_ptr::<c_void>(), args) }
    }
}

impl<F: MethodSignature> fmt::Debug for MemberFunction<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberFunction")
            .field("signature", &std::any::type_name::<F>())
            .field("this", &self.this)
            .field("getter", &format_args!("{}", self.getter))
            .finish()
    }
}

/// A method dispatched through the object's virtual table.
#[derive(Clone, Copy)]
pub struct VirtualFunction<'w, F: MethodSignature>(MemberFunction<'w, F>);

impl<'w, F: MethodSignature> VirtualFunction<'w, F> {
    /// Bind a virtual method of `parent` located through `getter`, normally a
    /// [`PtrGetter::VTableSlot`].
    ///
    /// # Safety
    ///
    /// See [`MemberFunction::bind`].
    pub unsafe fn bind<P: Wrapper>(parent: &'w P, getter: PtrGetter) -> Self {
        // SAFETY: forwarded to the caller.
        VirtualFunction(unsafe { MemberFunction::bind(parent, getter) })
    }

    /// Bind slot `index` of the table whose pointer lives at `vtable_offset`.
    ///
    /// # Safety
    ///
    /// The object must start a table pointer at `vtable_offset` whose slot
    /// `index` holds a method with receiver plus the arguments of `F`.
    pub unsafe fn slot<P: Wrapper>(parent: &'w P, index: usize, vtable_offset: usize) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::bind(parent, PtrGetter::vtable_at(index, vtable_offset)) }
    }

    /// Slot index, if bound through a virtual-table getter.
    pub fn index(&self) -> Option<usize> {
        match self.0.getter() {
            PtrGetter::VTableSlot { index, .. } => Some(index),
            _ => None,
        }
    }
}

impl<'w, F: MethodSignature> Deref for VirtualFunction<'w, F> {
    type Target = MemberFunction<'w, F>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<F: MethodSignature> fmt::Debug for VirtualFunction<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VirtualFunction").field(&self.0).finish()
    }
}
