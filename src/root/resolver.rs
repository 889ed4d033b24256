//! Module resolution: mapping module names to base addresses.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::address::RawAddress;
use crate::error::{RemodelError, Result};

/// Looks up the base address of a loaded module by name.
pub trait ModuleResolver {
    /// Base address of `name`, or `None` when no such module is known.
    fn resolve(&self, name: &str) -> Option<RawAddress>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, name: &str) -> Option<RawAddress> {
        (**self).resolve(name)
    }
}

/// Static name to base-address table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleTable {
    modules: HashMap<String, RawAddress>,
}

impl ModuleTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, returning the previous base.
    pub fn insert(&mut self, name: impl Into<String>, base: impl Into<RawAddress>) -> Option<RawAddress> {
        self.modules.insert(name.into(), base.into())
    }

    /// Builder-style [`ModuleTable::insert`].
    pub fn with(mut self, name: impl Into<String>, base: impl Into<RawAddress>) -> Self {
        self.insert(name, base);
        self
    }

    /// Base of `name`, if present.
    pub fn get(&self, name: &str) -> Option<RawAddress> {
        self.modules.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RawAddress)> {
        self.modules.iter().map(|(name, base)| (name.as_str(), *base))
    }
}

impl ModuleResolver for ModuleTable {
    fn resolve(&self, name: &str) -> Option<RawAddress> {
        self.get(name)
    }
}

impl<S: Into<String>, A: Into<RawAddress>> FromIterator<(S, A)> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = (S, A)>>(iter: I) -> Self {
        ModuleTable {
            modules: iter
                .into_iter()
                .map(|(name, base)| (name.into(), base.into()))
                .collect(),
        }
    }
}

/// One line of a process memory map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// First address of the mapping.
    pub start: RawAddress,
    /// One past the last address of the mapping.
    pub end: RawAddress,
    /// Permission flags as printed by the kernel, e.g. `r-xp`.
    pub permissions: String,
    /// Offset of the mapping into its backing file.
    pub file_offset: u64,
    /// Backing file or pseudo-path such as `[heap]`; `None` for anonymous memory.
    pub path: Option<String>,
}

impl Mapping {
    /// Returns `true` if the mapping is backed by the module called `name`,
    /// given either as a full path or a file name.
    pub fn belongs_to(&self, name: &str) -> bool {
        match &self.path {
            Some(path) => {
                path == name
                    || Path::new(path)
                        .file_name()
                        .is_some_and(|file| file.to_string_lossy() == name)
            }
            None => false,
        }
    }
}

static RE_MAPPING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9a-fA-F]+)-([0-9a-fA-F]+)\s+([rwxsp-]{4})\s+([0-9a-fA-F]+)\s+\S+\s+\d+(?:\s+(.*))?$",
    )
    .expect("valid mapping regex")
});

fn hex_address(text: &str, line: &str) -> Result<RawAddress> {
    usize::from_str_radix(text, 16)
        .map(RawAddress::new)
        .map_err(|_| RemodelError::MalformedMapping(line.to_string()))
}

/// Parse one `/proc/<pid>/maps` line.
pub fn parse_mapping_line(line: &str) -> Result<Mapping> {
    let caps = RE_MAPPING
        .captures(line.trim_end())
        .ok_or_else(|| RemodelError::MalformedMapping(line.to_string()))?;

    let start = hex_address(&caps[1], line)?;
    let end = hex_address(&caps[2], line)?;
    let file_offset = u64::from_str_radix(&caps[4], 16)
        .map_err(|_| RemodelError::MalformedMapping(line.to_string()))?;
    let path = caps
        .get(5)
        .map(|m| m.as_str().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(Mapping {
        start,
        end,
        permissions: caps[3].to_string(),
        file_offset,
        path,
    })
}

/// Parse a whole memory map, skipping lines that do not parse.
pub fn parse_maps(text: &str) -> Vec<Mapping> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_mapping_line(line) {
            Ok(mapping) => Some(mapping),
            Err(err) => {
                trace!(error = %err, "skipping memory map line");
                None
            }
        })
        .collect()
}

/// Lowest start address among the mappings backed by `name`.
pub fn module_base(mappings: &[Mapping], name: &str) -> Option<RawAddress> {
    mappings
        .iter()
        .filter(|mapping| mapping.belongs_to(name))
        .map(|mapping| mapping.start)
        .min()
}

/// Resolver for modules loaded in the current process.
///
/// On Linux the memory map in `/proc/self/maps` is read on every lookup;
/// on other platforms nothing resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessModules;

impl ProcessModules {
    /// Resolver over the current process.
    pub fn new() -> Self {
        ProcessModules
    }

    /// Current memory map of the process.
    #[cfg(target_os = "linux")]
    pub fn mappings(&self) -> Result<Vec<Mapping>> {
        let text = std::fs::read_to_string("/proc/self/maps").map_err(|err| {
            crate::log_error!(RemodelError::from(err), "reading process memory map")
        })?;
        Ok(parse_maps(&text))
    }

    /// Current memory map of the process.
    #[cfg(not(target_os = "linux"))]
    pub fn mappings(&self) -> Result<Vec<Mapping>> {
        Ok(Vec::new())
    }

    /// File name of the running executable.
    pub fn main_module_name() -> Option<String> {
        let exe = std::env::current_exe().ok()?;
        exe.file_name().map(|name| name.to_string_lossy().into_owned())
    }
}

impl ModuleResolver for ProcessModules {
    fn resolve(&self, name: &str) -> Option<RawAddress> {
        match self.mappings() {
            Ok(mappings) => module_base(&mappings, name),
            Err(err) => {
                trace!(error = %err, "memory map unavailable");
                None
            }
        }
    }
}
