//! Layout configuration: module bases and field getters loaded from JSON.
//!
//! Offsets of a target change between builds far more often than its
//! structure does. A [`LayoutConfig`] keeps them out of the code:
//!
//! ```json
//! {
//!   "modules": { "game.bin": "0x140000000" },
//!   "layouts": {
//!     "Player": {
//!       "size": 128,
//!       "fields": {
//!         "health": { "kind": "offset", "delta": 16 },
//!         "think":  { "kind": "vtable_slot", "index": 3 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Getters looked up here plug straight into [`Field::bind`](crate::Field::bind)
//! and [`MemberFunction::bind`](crate::MemberFunction::bind).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::getter::PtrGetter;
use crate::error::{RemodelError, Result};
use crate::root::{Module, ModuleTable};

/// Layout of one wrapped type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLayout {
    /// Declared size in bytes, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Getter of every described field or method, by name.
    #[serde(default)]
    pub fields: BTreeMap<String, PtrGetter>,
}

impl TypeLayout {
    /// Getter of `field`, if described.
    pub fn getter(&self, field: &str) -> Option<PtrGetter> {
        self.fields.get(field).copied()
    }
}

/// Module bases and type layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub modules: ModuleTable,
    #[serde(default)]
    pub layouts: BTreeMap<String, TypeLayout>,
}

impl LayoutConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            modules = config.modules.len(),
            layouts = config.layouts.len(),
            "layout configuration parsed"
        );
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            crate::log_error!(RemodelError::from(err), "reading layout configuration")
        })?;
        let config = Self::from_json_str(&text)
            .map_err(|err| crate::log_error!(err, "parsing layout configuration"))?;
        info!(path = %path.display(), "loaded layout configuration");
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every offset field lies inside its layout.
    ///
    /// Offsets must be non-negative, and smaller than the declared size when
    /// one is given. Absolute and virtual-table getters are not checked.
    pub fn validate(&self) -> Result<()> {
        for (name, layout) in &self.layouts {
            for (field, getter) in &layout.fields {
                let PtrGetter::Offset { delta } = *getter else {
                    continue;
                };
                let outside = delta < 0 || layout.size.is_some_and(|size| delta as usize >= size);
                if outside {
                    return Err(RemodelError::FieldOutOfBounds {
                        layout: name.clone(),
                        field: field.clone(),
                        offset: delta,
                        size: layout.size.unwrap_or(0),
                    });
                }
            }
        }
        Ok(())
    }

    /// Layout called `name`.
    pub fn layout(&self, name: &str) -> Result<&TypeLayout> {
        self.layouts
            .get(name)
            .ok_or_else(|| RemodelError::UnknownLayout(name.to_string()))
    }

    /// Getter of `field` in layout `layout`.
    pub fn getter(&self, layout: &str, field: &str) -> Result<PtrGetter> {
        self.layout(layout)?
            .getter(field)
            .ok_or_else(|| RemodelError::UnknownField {
                layout: layout.to_string(),
                field: field.to_string(),
            })
    }

    /// The configured module bases.
    pub fn module_table(&self) -> &ModuleTable {
        &self.modules
    }

    /// Module `name` as configured.
    pub fn module(&self, name: &str) -> Option<Module> {
        Module::resolve_with(&self.modules, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::RawAddress;

    const CONFIG: &str = r#"{
        "modules": { "game.bin": "0x14000000" },
        "layouts": {
            "Player": {
                "size": 128,
                "fields": {
                    "health": { "kind": "offset", "delta": 16 },
                    "think": { "kind": "vtable_slot", "index": 3, "vtable_offset": 0 },
                    "tick": { "kind": "absolute", "address": "0x14001000" }
                }
            },
            "World": {}
        }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let config = LayoutConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.getter("Player", "health").unwrap(), PtrGetter::offset(16));
        assert_eq!(config.getter("Player", "think").unwrap(), PtrGetter::vtable(3));
        assert_eq!(
            config.getter("Player", "tick").unwrap(),
            PtrGetter::absolute(0x1400_1000usize)
        );
        assert_eq!(config.layout("Player").unwrap().size, Some(128));
        assert_eq!(config.layout("World").unwrap(), &TypeLayout::default());
        assert_eq!(
            config.module("game.bin").map(|m| m.base()),
            Some(RawAddress::new(0x1400_0000))
        );
        assert_eq!(config.module_table().len(), 1);
    }

    #[test]
    fn test_lookup_errors() {
        let config = LayoutConfig::from_json_str(CONFIG).unwrap();
        assert!(matches!(
            config.layout("Enemy"),
            Err(RemodelError::UnknownLayout(name)) if name == "Enemy"
        ));
        assert!(matches!(
            config.getter("Player", "mana"),
            Err(RemodelError::UnknownField { .. })
        ));
        assert!(config.module("other.bin").is_none());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let json = r#"{"layouts": {"Small": {"size": 8, "fields": {"x": {"kind": "offset", "delta": 8}}}}}"#;
        match LayoutConfig::from_json_str(json) {
            Err(RemodelError::FieldOutOfBounds { offset, size, .. }) => {
                assert_eq!(offset, 8);
                assert_eq!(size, 8);
            }
            other => panic!("expected FieldOutOfBounds, got {:?}", other),
        }

        let json = r#"{"layouts": {"Open": {"fields": {"x": {"kind": "offset", "delta": -4}}}}}"#;
        assert!(matches!(
            LayoutConfig::from_json_str(json),
            Err(RemodelError::FieldOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LayoutConfig::from_json_str("{\"layouts\": 3}"),
            Err(RemodelError::Config(_))
        ));
        assert!(matches!(
            LayoutConfig::from_json_str(r#"{"modules": {"a": "0xzz"}}"#),
            Err(RemodelError::Config(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_documented_layout_format() {
        let json = r#"{
  "modules": { "game.bin": "0x140000000" },
  "layouts": {
    "Player": {
      "size": 128,
      "fields": {
        "health": { "kind": "offset", "delta": 16 },
        "think":  { "kind": "vtable_slot", "index": 3, "vtable_offset": 0 },
        "tick":   { "kind": "absolute", "address": "0x140001000" }
      }
    }
  }
}"#;
        let config = LayoutConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.module("game.bin").map(|m| m.base()),
            Some(RawAddress::new(0x1_4000_0000))
        );
        let player = config.layout("Player").unwrap();
        assert_eq!(player.getter("health"), Some(PtrGetter::offset(16)));
        assert_eq!(player.getter("think"), Some(PtrGetter::vtable(3)));
        assert_eq!(
            player.getter("tick"),
            Some(PtrGetter::absolute(0x1_4000_1000usize))
        );
    }

    #[test]
    fn test_from_path_errors_are_logged_and_returned() {
        crate::logging::init_tracing();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LayoutConfig::from_path(dir.path().join("missing.json")),
            Err(RemodelError::Io(_))
        ));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"layouts\": [").unwrap();
        assert!(matches!(LayoutConfig::from_path(&path), Err(RemodelError::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = LayoutConfig::from_json_str(CONFIG).unwrap();
        let text = config.to_json_string().unwrap();
        let again = LayoutConfig::from_json_str(&text).unwrap();
        assert_eq!(config, again);
    }
}
