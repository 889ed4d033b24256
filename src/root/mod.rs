//! Root identities: wrappers that are not obtained from another wrapper.
//!
//! [`Global`] anchors absolute addresses, [`Module`] anchors addresses
//! relative to a loaded module found through a [`ModuleResolver`].

pub mod global;
pub mod module;
pub mod resolver;

pub use global::Global;
pub use module::Module;
pub use resolver::{
    module_base, parse_mapping_line, parse_maps, Mapping, ModuleResolver, ModuleTable,
    ProcessModules,
};
