// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Registry artifact generation.
//!
//! Turns analyzed libraries into semconv-style registry YAML:
//!
//! - `signals.yaml`: span and metric groups with attribute references
//! - `attributes.yaml`: definitions for custom attributes that do not
//!   exist in the official semantic-conventions registry, with inferred
//!   types and generated briefs
//! - `libraries.yaml`: the per-repository [`Library`] records
//!
//! Groups and attribute definitions are sorted by id so regeneration is
//! diff-stable.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::analyze::{AttributeType, SpanKind};
use crate::error::GenerateError;
use crate::registry::SemconvRegistry;
use crate::schema::Library;

/// Stability marker for generated attribute definitions.
pub const STABILITY_DEVELOPMENT: &str = "development";

/// Name of the generated attribute group.
const ATTRIBUTE_GROUP_ID: &str = "registry.otel.go";

/// A span or metric group in the signals registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub brief: String,
    pub stability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeRef>,
}

/// A reference to an attribute by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// A custom attribute definition emitted into `attributes.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub id: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub brief: String,
    pub stability: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// The group wrapper in `attributes.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeGroup {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub name: String,
    pub brief: String,
    pub attributes: Vec<AttributeDef>,
}

#[derive(Serialize)]
struct GroupsFile<T: Serialize> {
    groups: T,
}

/// Build signal groups from analyzed libraries.
///
/// One group per span kind and one per metric; groups that collide on id
/// across libraries are merged, unioning attribute references with the
/// first occurrence winning.
pub fn build_groups(libraries: &[Library]) -> Vec<Group> {
    let mut by_id: BTreeMap<String, Group> = BTreeMap::new();

    for lib in libraries {
        for section in &lib.telemetry {
            for span in &section.spans {
                let group = span_group(lib, span.kind, &span.attributes);
                merge_group(&mut by_id, group);
            }
            for metric in &section.metrics {
                let group = metric_group(lib, metric);
                merge_group(&mut by_id, group);
            }
        }
    }

    by_id.into_values().collect()
}

fn span_group(lib: &Library, kind: SpanKind, attributes: &[crate::analyze::Attribute]) -> Group {
    Group {
        id: format!("span.{}.{}", lib.name, kind.keyword()),
        group_type: "span".to_string(),
        brief: format!("{} span emitted by {}", title_word(kind.keyword()), lib.scope.name),
        stability: STABILITY_DEVELOPMENT.to_string(),
        span_kind: Some(kind.keyword().to_string()),
        metric_name: None,
        instrument: None,
        unit: None,
        attributes: attribute_refs(attributes),
    }
}

fn metric_group(lib: &Library, metric: &crate::analyze::Metric) -> Group {
    Group {
        id: format!("metric.{}", metric.name),
        group_type: "metric".to_string(),
        brief: smart_case(&metric.name),
        stability: STABILITY_DEVELOPMENT.to_string(),
        span_kind: None,
        metric_name: Some(metric.name.clone()),
        instrument: Some(metric.metric_type.instrument().to_string()),
        unit: if metric.unit.is_empty() {
            None
        } else {
            Some(metric.unit.clone())
        },
        attributes: attribute_refs(&metric.attributes),
    }
}

fn attribute_refs(attributes: &[crate::analyze::Attribute]) -> Vec<AttributeRef> {
    attributes
        .iter()
        .map(|a| AttributeRef {
            reference: a.name.clone(),
        })
        .collect()
}

fn merge_group(by_id: &mut BTreeMap<String, Group>, group: Group) {
    match by_id.get_mut(&group.id) {
        Some(existing) => {
            for attr in group.attributes {
                if !existing.attributes.contains(&attr) {
                    existing.attributes.push(attr);
                }
            }
        }
        None => {
            by_id.insert(group.id.clone(), group);
        }
    }
}

/// Collect definitions for referenced attributes that are absent from the
/// official registry, sorted by id.
pub fn extract_attribute_defs(groups: &[Group], registry: &SemconvRegistry) -> Vec<AttributeDef> {
    let mut defs: BTreeMap<String, AttributeDef> = BTreeMap::new();

    for group in groups {
        for attr_ref in &group.attributes {
            let id = &attr_ref.reference;
            if registry.attribute(id).is_some() || defs.contains_key(id) {
                continue;
            }

            let attr_type = infer_attribute_type(id);
            let examples = if attr_type == AttributeType::String {
                vec![id.clone()]
            } else {
                Vec::new()
            };

            defs.insert(
                id.clone(),
                AttributeDef {
                    id: id.clone(),
                    attr_type,
                    brief: generate_brief(registry, id),
                    stability: STABILITY_DEVELOPMENT.to_string(),
                    examples,
                },
            );
        }
    }

    defs.into_values().collect()
}

/// Infer a custom attribute's type from its name.
pub fn infer_attribute_type(name: &str) -> AttributeType {
    if name.contains("port") || name.contains("status_code") {
        AttributeType::Long
    } else if name.contains("duration") {
        AttributeType::Double
    } else {
        AttributeType::String
    }
}

/// Terms that keep their conventional casing in generated briefs.
static WELL_KNOWN_TERMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rpc", "RPC"),
        ("grpc", "gRPC"),
        ("http", "HTTP"),
        ("https", "HTTPS"),
        ("url", "URL"),
        ("uri", "URI"),
        ("aws", "AWS"),
        ("db", "Database"),
        ("sql", "SQL"),
        ("nosql", "NoSQL"),
        ("mongodb", "MongoDB"),
        ("id", "ID"),
        ("api", "API"),
        ("tcp", "TCP"),
        ("udp", "UDP"),
        ("ip", "IP"),
        ("dns", "DNS"),
        ("tls", "TLS"),
        ("ssl", "SSL"),
        ("faas", "FaaS"),
        ("k8s", "Kubernetes"),
        ("os", "OS"),
        ("cpu", "CPU"),
        ("io", "I/O"),
        ("sdk", "SDK"),
        ("json", "JSON"),
        ("xml", "XML"),
        ("yaml", "YAML"),
        ("status_code", "status code"),
    ])
});

/// Generate a brief for an attribute: the official registry brief when one
/// exists, otherwise smart casing of the dotted name.
pub fn generate_brief(registry: &SemconvRegistry, attr_name: &str) -> String {
    if let Some(attr) = registry.attribute(attr_name) {
        if !attr.brief.is_empty() {
            return attr.brief.clone();
        }
    }
    smart_case(attr_name)
}

/// Case a dotted attribute or metric name into readable words, keeping
/// well-known terms in their conventional form.
fn smart_case(name: &str) -> String {
    let mut result = Vec::new();

    for part in name.split('.') {
        if let Some(replacement) = WELL_KNOWN_TERMS.get(part.to_lowercase().as_str()) {
            result.push((*replacement).to_string());
            continue;
        }

        let words: Vec<String> = part
            .replace('_', " ")
            .split_whitespace()
            .map(|word| {
                WELL_KNOWN_TERMS
                    .get(word.to_lowercase().as_str())
                    .map(|r| (*r).to_string())
                    .unwrap_or_else(|| title_word(word))
            })
            .collect();
        result.push(words.join(" "));
    }

    result.join(" ")
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Write `signals.yaml` and `attributes.yaml` into `registry_dir`.
pub fn generate(
    registry_dir: &Path,
    groups: &[Group],
    registry: &SemconvRegistry,
) -> Result<(), GenerateError> {
    std::fs::create_dir_all(registry_dir)?;

    let signals = serde_yaml::to_string(&GroupsFile { groups })?;
    std::fs::write(registry_dir.join("signals.yaml"), signals)?;

    let custom = extract_attribute_defs(groups, registry);
    if !custom.is_empty() {
        let attributes = serde_yaml::to_string(&GroupsFile {
            groups: vec![AttributeGroup {
                id: ATTRIBUTE_GROUP_ID.to_string(),
                group_type: "attribute_group".to_string(),
                name: "OpenTelemetry Go Instrumentation Attributes".to_string(),
                brief: "Custom attributes used in OpenTelemetry Go instrumentation".to_string(),
                attributes: custom,
            }],
        })?;
        std::fs::write(registry_dir.join("attributes.yaml"), attributes)?;
    }

    Ok(())
}

/// Write the per-repository library records into `libraries.yaml`.
pub fn write_libraries(
    registry_dir: &Path,
    libraries_by_repo: &BTreeMap<String, Vec<Library>>,
) -> Result<(), GenerateError> {
    std::fs::create_dir_all(registry_dir)?;
    let content = serde_yaml::to_string(libraries_by_repo)?;
    std::fs::write(registry_dir.join("libraries.yaml"), content)?;
    Ok(())
}
