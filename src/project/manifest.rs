//! Canister manifest (`dfx.json`) loading
//!
//! Only the `canisters` table is read. Each entry keeps the fields the helper
//! knows about plus every other attribute untouched, so records round-trip
//! into the payload handed to test scripts.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Metadata of a single canister
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanisterInfo {
    /// Canister type (`motoko`, `rust`, `custom`, `assets`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Entry point source file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Candid interface file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candid: Option<String>,

    /// Cargo package name for Rust canisters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Canisters that must be deployed first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Init argument template, set only when the file exists
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Every other manifest attribute
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanisterInfo {
    /// Manifest attributes as display pairs, known fields first
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut attrs = Vec::new();
        let known = [
            ("type", &self.kind),
            ("main", &self.main),
            ("candid", &self.candid),
            ("package", &self.package),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                attrs.push((key.to_string(), value.clone()));
            }
        }
        if !self.dependencies.is_empty() {
            attrs.push((
                "dependencies".to_string(),
                format!("[{}]", self.dependencies.join(", ")),
            ));
        }
        for (key, value) in &self.extra {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            attrs.push((key.clone(), shown));
        }
        attrs
    }
}

/// A named canister
#[derive(Debug, Clone, PartialEq)]
pub struct Canister {
    pub name: String,
    pub info: CanisterInfo,
}

/// Canisters in manifest order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canisters {
    entries: Vec<Canister>,
}

impl Canisters {
    pub fn new(entries: Vec<Canister>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Canister> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Canister> {
        self.entries.iter_mut()
    }

    /// Look up a canister by name
    pub fn get(&self, name: &str) -> Option<&Canister> {
        self.entries.iter().find(|c| c.name == name)
    }

    /// Canister names in manifest order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.name.clone()).collect()
    }
}

impl Serialize for Canisters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for canister in &self.entries {
            map.serialize_entry(&canister.name, &canister.info)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Canisters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // `serde_json::Map` keeps insertion order with `preserve_order`
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .map(|(name, value)| {
                serde_json::from_value(value)
                    .map(|info| Canister { name: name.clone(), info })
                    .map_err(|e| D::Error::custom(format!("canister '{}': {}", name, e)))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

/// The part of `dfx.json` the helper reads
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    canisters: Canisters,
}

/// Load the canisters defined in a manifest
///
/// A manifest without a `canisters` table yields an empty set.
pub fn load_manifest(path: &Path) -> Result<Canisters> {
    let display_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::ManifestNotFound(display_name.clone())
        } else {
            Error::file_read(path, &e)
        }
    })?;

    let manifest: Manifest = serde_json::from_str(&content).map_err(|e| Error::ManifestParse {
        path: display_name,
        reason: e.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        count = manifest.canisters.len(),
        "loaded manifest"
    );
    Ok(manifest.canisters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "version": 1,
        "canisters": {
            "ledger": {
                "type": "custom",
                "candid": "ledger.did",
                "wasm": "ledger.wasm"
            },
            "backend": {
                "type": "motoko",
                "main": "src/backend/main.mo",
                "dependencies": ["ledger"]
            },
            "assets": {
                "type": "assets",
                "source": ["dist"]
            }
        }
    }"#;

    fn write_manifest(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dfx.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_keeps_manifest_order() {
        let (_dir, path) = write_manifest(MANIFEST);
        let canisters = load_manifest(&path).unwrap();
        assert_eq!(canisters.names(), vec!["ledger", "backend", "assets"]);
    }

    #[test]
    fn test_known_fields_and_extras() {
        let (_dir, path) = write_manifest(MANIFEST);
        let canisters = load_manifest(&path).unwrap();

        let backend = &canisters.get("backend").unwrap().info;
        assert_eq!(backend.kind.as_deref(), Some("motoko"));
        assert_eq!(backend.main.as_deref(), Some("src/backend/main.mo"));
        assert_eq!(backend.dependencies, vec!["ledger"]);
        assert!(backend.template_path.is_none());

        let ledger = &canisters.get("ledger").unwrap().info;
        assert_eq!(ledger.extra.get("wasm"), Some(&Value::from("ledger.wasm")));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("dfx.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound(ref name) if name == "dfx.json"));
    }

    #[test]
    fn test_malformed_manifest() {
        let (_dir, path) = write_manifest("{ \"canisters\": ");
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }

    #[test]
    fn test_manifest_without_canisters_is_empty() {
        let (_dir, path) = write_manifest(r#"{ "version": 1 }"#);
        assert!(load_manifest(&path).unwrap().is_empty());
    }

    #[test]
    fn test_serializes_as_ordered_map_with_template_path() {
        let (_dir, path) = write_manifest(MANIFEST);
        let canisters = load_manifest(&path).unwrap();
        let json = serde_json::to_value(&canisters).unwrap();

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ledger", "backend", "assets"]);
        assert_eq!(json["backend"]["type"], "motoko");
        assert_eq!(json["backend"]["template_path"], Value::Null);
        assert_eq!(json["assets"]["source"], serde_json::json!(["dist"]));
    }

    #[test]
    fn test_attributes_list_known_fields_first() {
        let (_dir, path) = write_manifest(MANIFEST);
        let canisters = load_manifest(&path).unwrap();
        let attrs = canisters.get("backend").unwrap().info.attributes();
        assert_eq!(attrs[0], ("type".to_string(), "motoko".to_string()));
        assert_eq!(
            attrs[2],
            ("dependencies".to_string(), "[ledger]".to_string())
        );
    }
}
