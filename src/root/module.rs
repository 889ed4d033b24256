//! Module roots: fields and functions relative to a loaded module's base.

use tracing::debug;

use crate::core::address::RawAddress;
use crate::core::getter::PtrGetter;
use crate::core::wrapper::Wrapper;
use crate::field::{Field, FieldType};
use crate::function::{Function, Signature};
use crate::root::resolver::{ModuleResolver, ProcessModules};

/// A loaded module, identified by its base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Module {
    base: RawAddress,
}

impl Module {
    /// Find `name` among the modules of the current process.
    pub fn find(name: &str) -> Option<Module> {
        Self::resolve_with(&ProcessModules::new(), name)
    }

    /// Find `name` through `resolver`.
    pub fn resolve_with<R: ModuleResolver + ?Sized>(resolver: &R, name: &str) -> Option<Module> {
        match resolver.resolve(name) {
            Some(base) => {
                debug!(module = name, base = %base, "module resolved");
                Some(Module { base })
            }
            None => {
                debug!(module = name, "module not found");
                None
            }
        }
    }

    /// The running executable.
    pub fn main() -> Option<Module> {
        let name = ProcessModules::main_module_name()?;
        Self::find(&name)
    }

    /// Base address of the module.
    pub fn base(&self) -> RawAddress {
        self.base
    }

    /// Field of type `T` at `offset` from the module base.
    ///
    /// # Safety
    ///
    /// `base + offset` must hold a `T` whenever the field is read or written.
    pub unsafe fn field<T: FieldType + ?Sized>(&self, offset: isize) -> Field<'_, T> {
        // SAFETY: forwarded to the caller.
        unsafe { Field::bind(self, PtrGetter::offset(offset)) }
    }

    /// Function with signature `F` at `offset` from the module base.
    ///
    /// # Safety
    ///
    /// `base + offset` must be the entry point of a function with signature `F`.
    pub unsafe fn function<F: Signature>(&self, offset: isize) -> Function<F> {
        // SAFETY: forwarded to the caller.
        unsafe { Function::at(self.base.offset(offset)) }
    }
}

impl Wrapper for Module {
    unsafe fn from_raw(raw: RawAddress) -> Self {
        Module { base: raw }
    }

    fn address_of_obj(&self) -> RawAddress {
        self.base
    }
}
