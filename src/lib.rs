//! Typed views over partially-known binary structures.
//!
//! `remodel` describes an opaque structure by what is known about it
//! (fields at offsets, methods at addresses or virtual-table slots) and
//! then lets code use it like a native object. A wrapper is one address;
//! fields and methods are computed on access and never cached.
//!
//! ```
//! use remodel::{wrapper, wrapper_cast};
//!
//! wrapper! {
//!     pub struct Entity(0x20) {
//!         pub id: u32 => offset(0x0),
//!         pub alive: bool => offset(0x1d),
//!     }
//! }
//!
//! let mut raw = [0u8; 0x20];
//! let entity: Entity = unsafe { wrapper_cast(raw.as_mut_ptr()) };
//! entity.id().set(7);
//! entity.alive().set(true);
//! assert_eq!(raw[0x1d], 1);
//! ```

/// Core identity types: addresses, getters, wrappers
pub mod core;

/// Configuration of module bases and type layouts
pub mod config;

/// Error types
pub mod error;

/// Typed fields and their per-category access rules
pub mod field;

/// Free, member and virtual function handles
pub mod function;

/// Owned instances of sized wrappers
pub mod instance;

/// Tracing setup
pub mod logging;

mod macros;

/// Unaligned target-memory primitives
pub mod memory;

/// Compile-time platform checks
pub mod platform;

/// Global and module roots, module resolution
pub mod root;

pub use crate::config::{LayoutConfig, TypeLayout};
pub use crate::core::{
    address_of_obj, address_of_wrapper, wrapper_cast, PtrGetter, RawAddress, SizedWrapper, Weak,
    Wrapper,
};
pub use crate::error::{RemodelError, Result};
pub use crate::field::{Access, Element, Field, FieldType, Operators, Ref};
pub use crate::function::{
    CallingConvention, Function, MemberFunction, MethodSignature, SafeCall, Signature,
    VirtualFunction,
};
pub use crate::instance::{Construct, Instantiable};
pub use crate::root::{Global, Module, ModuleResolver, ModuleTable, ProcessModules};
