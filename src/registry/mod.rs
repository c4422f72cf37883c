// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Semantic-conventions registry.
//!
//! Loads the upstream semantic-conventions YAML model into an immutable
//! lookup: attribute id → brief/type, plus the set of registered metric
//! names. The generator consults it to decide which extracted attributes
//! are custom (need their own definitions) and to prefer official briefs.
//!
//! The registry is a value constructed once and passed where needed; a
//! missing registry directory yields an empty registry, not an error.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::analyze::AttributeType;
use crate::error::RegistryError;

/// An attribute definition from the semantic-conventions registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemconvAttribute {
    pub id: String,
    pub brief: String,
    pub attr_type: AttributeType,
}

/// Loaded semantic-conventions lookups.
#[derive(Debug, Clone, Default)]
pub struct SemconvRegistry {
    attributes: HashMap<String, SemconvAttribute>,
    metrics: HashMap<String, String>,
}

/// Shape of one registry YAML document. Attribute entries are loosely
/// structured upstream, so they are read as free-form mappings.
#[derive(Debug, Deserialize)]
struct RegistryDoc {
    #[serde(default)]
    groups: Vec<RegistryGroup>,
}

#[derive(Debug, Deserialize)]
struct RegistryGroup {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    group_type: String,
    #[serde(default)]
    metric_name: String,
    #[serde(default)]
    attributes: Vec<HashMap<String, serde_yaml::Value>>,
}

impl SemconvRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `.yaml`/`.yml` file under `path`.
    ///
    /// A nonexistent path yields an empty registry; files that fail to
    /// parse are skipped.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        if !path.exists() {
            return Ok(registry);
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| RegistryError::Io(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if ext != "yaml" && ext != "yml" {
                continue;
            }
            if registry.load_file(entry.path()).is_err() {
                continue;
            }
        }

        Ok(registry)
    }

    fn load_file(&mut self, path: &Path) -> Result<(), RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let doc: RegistryDoc = serde_yaml::from_str(&content)?;

        for group in doc.groups {
            if group.group_type == "metric" && !group.metric_name.is_empty() {
                self.metrics
                    .insert(group.metric_name.clone(), group.id.clone());
            }

            if group.group_type != "attribute_group" {
                continue;
            }

            for attr in &group.attributes {
                let id = string_field(attr, "id");
                if id.is_empty() {
                    continue;
                }
                // Entries referencing another attribute carry no definition.
                if !string_field(attr, "ref").is_empty() {
                    continue;
                }
                let brief = string_field(attr, "brief").trim().to_string();
                let attr_type = map_semconv_type(&attribute_type_field(attr));

                self.attributes.insert(
                    id.clone(),
                    SemconvAttribute {
                        id,
                        brief,
                        attr_type,
                    },
                );
            }
        }

        Ok(())
    }

    /// Look up an attribute definition by id.
    pub fn attribute(&self, id: &str) -> Option<&SemconvAttribute> {
        self.attributes.get(id)
    }

    /// Whether a metric name is registered.
    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Number of loaded attribute definitions.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.metrics.is_empty()
    }
}

fn string_field(map: &HashMap<String, serde_yaml::Value>, key: &str) -> String {
    map.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// The `type` field is either a scalar type name or an enum definition
/// with `members`; enums are string-valued.
fn attribute_type_field(map: &HashMap<String, serde_yaml::Value>) -> String {
    let Some(value) = map.get("type") else {
        return String::new();
    };
    if let Some(s) = value.as_str() {
        return s.to_string();
    }
    if let Some(type_map) = value.as_mapping() {
        if type_map
            .iter()
            .any(|(k, _)| k.as_str() == Some("members"))
        {
            return "string".to_string();
        }
    }
    String::new()
}

/// Map a semconv type name onto the analysis attribute types.
fn map_semconv_type(semconv_type: &str) -> AttributeType {
    match semconv_type.to_lowercase().as_str() {
        "string" | "string[]" => AttributeType::String,
        "int" | "int[]" => AttributeType::Long,
        "double" | "double[]" => AttributeType::Double,
        "boolean" | "boolean[]" => AttributeType::Boolean,
        _ => AttributeType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const REGISTRY_YAML: &str = r#"groups:
  - id: registry.http
    type: attribute_group
    brief: HTTP attributes.
    attributes:
      - id: http.request.method
        type: string
        brief: HTTP request method.
      - id: http.response.status_code
        type: int
        brief: HTTP response status code.
      - id: http.request.method_original
        ref: http.request.method
      - id: http.connection.state
        type:
          members:
            - id: active
              value: "active"
        brief: State of the HTTP connection.
  - id: metric.http.server.request.duration
    type: metric
    metric_name: http.server.request.duration
"#;

    fn load_registry(yaml: &str) -> SemconvRegistry {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("http.yaml"), yaml).unwrap();
        SemconvRegistry::load(temp.path()).unwrap()
    }

    #[test]
    fn test_load_attributes() {
        let registry = load_registry(REGISTRY_YAML);
        let method = registry.attribute("http.request.method").unwrap();
        assert_eq!(method.brief, "HTTP request method.");
        assert_eq!(method.attr_type, AttributeType::String);

        let status = registry.attribute("http.response.status_code").unwrap();
        assert_eq!(status.attr_type, AttributeType::Long);
    }

    #[test]
    fn test_ref_entries_are_skipped() {
        let registry = load_registry(REGISTRY_YAML);
        assert!(registry.attribute("http.request.method_original").is_none());
    }

    #[test]
    fn test_enum_type_is_string() {
        let registry = load_registry(REGISTRY_YAML);
        let state = registry.attribute("http.connection.state").unwrap();
        assert_eq!(state.attr_type, AttributeType::String);
    }

    #[test]
    fn test_metric_names_loaded() {
        let registry = load_registry(REGISTRY_YAML);
        assert!(registry.has_metric("http.server.request.duration"));
        assert!(!registry.has_metric("custom.metric"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = tempdir().unwrap();
        let registry = SemconvRegistry::load(&temp.path().join("missing")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unparsable_file_is_skipped() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("bad.yaml"), "groups: [\n").unwrap();
        fs::write(
            temp.path().join("good.yaml"),
            "groups:\n  - id: g\n    type: attribute_group\n    attributes:\n      - id: a.b\n        type: boolean\n",
        )
        .unwrap();
        let registry = SemconvRegistry::load(temp.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.attribute("a.b").unwrap().attr_type,
            AttributeType::Boolean
        );
    }

    #[test]
    fn test_map_semconv_type() {
        assert_eq!(map_semconv_type("string"), AttributeType::String);
        assert_eq!(map_semconv_type("int[]"), AttributeType::Long);
        assert_eq!(map_semconv_type("double"), AttributeType::Double);
        assert_eq!(map_semconv_type("boolean"), AttributeType::Boolean);
        assert_eq!(map_semconv_type("template[string]"), AttributeType::String);
    }
}
