//! # Configuration File Validation
//!
//! Parses one configuration file and validates it against a compiled
//! schema.
//!
//! ## Format Selection
//!
//! File names ending in `.yaml` or `.yml` are parsed as YAML, everything
//! else as JSON. YAML is loaded as plain data: tags are dropped, merge
//! keys are applied, a repeated mapping key keeps its last value, and
//! nothing is executed.
//!
//! ## Failure Classification
//!
//! Each file yields at most one [`FileError`]: YAML syntax, JSON syntax,
//! the schema violation closest to the document root, or an unexpected error (I/O, encoding,
//! unrepresentable YAML, uncompilable schema). Nothing escapes as `Err`.
//!
//! ## Schema Resolution
//!
//! `$ref`s pointing outside the schema document are not fetched. They
//! resolve to the empty (accept-anything) schema.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use jsonschema::{Retrieve, Uri, Validator};
use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_json::Value;

use crate::document::SchemaDocument;
use crate::error::FileError;

/// Retriever that keeps schema compilation offline.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(
            uri = uri.as_str(),
            "external $ref not resolved; treating it as an empty schema"
        );
        Ok(serde_json::json!({}))
    }
}

/// Result of validating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    error: Option<FileError>,
}

impl ValidationOutcome {
    fn pass() -> Self {
        Self { error: None }
    }

    fn fail(error: FileError) -> Self {
        Self { error: Some(error) }
    }

    /// True when the file parsed and conforms to the schema.
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// The classified failure, if any.
    pub fn error(&self) -> Option<&FileError> {
        self.error.as_ref()
    }

    /// Human-readable diagnostic lines. Empty on success.
    pub fn diagnostics(&self) -> Vec<String> {
        self.error
            .as_ref()
            .map(FileError::diagnostic_lines)
            .unwrap_or_default()
    }

    /// Write each diagnostic line to `out`.
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        for line in self.diagnostics() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// A schema compiled once and applied to any number of files.
pub struct ConfigValidator {
    compiled: Result<Validator, String>,
}

impl fmt::Debug for ConfigValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigValidator")
            .field("compiled", &self.compiled.is_ok())
            .finish()
    }
}

impl ConfigValidator {
    /// Compile `schema`.
    ///
    /// Compilation failure is not returned here: it is reported as an
    /// unexpected error for every file validated afterwards.
    pub fn new(schema: &SchemaDocument) -> Self {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever);

        let compiled = opts.build(&schema.to_value()).map_err(|e| e.to_string());
        if let Err(reason) = &compiled {
            tracing::warn!(%reason, "schema does not compile");
        }
        Self { compiled }
    }

    /// The compilation error message, if the schema is unusable.
    pub fn compile_error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }

    /// Validate the file at `path`.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> ValidationOutcome {
        let path = path.as_ref();
        match self.check_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "file is valid");
                ValidationOutcome::pass()
            }
            Err(e) => ValidationOutcome::fail(e),
        }
    }

    /// Validate an already-parsed document. `name` labels diagnostics.
    pub fn validate_value(&self, name: &str, instance: &Value) -> Result<(), FileError> {
        let validator = self.compiled.as_ref().map_err(|reason| FileError::Unexpected {
            path: name.to_string(),
            detail: format!("invalid schema: {reason}"),
        })?;

        // Shallowest violation wins; ties keep iteration order.
        let shallowest = validator
            .iter_errors(instance)
            .map(|e| (e.to_string(), pointer_segments(&e.instance_path.to_string())))
            .min_by_key(|(_, location)| location.len());

        match shallowest {
            None => Ok(()),
            Some((message, location)) => Err(FileError::Schema {
                path: name.to_string(),
                message,
                location,
            }),
        }
    }

    fn check_file(&self, path: &Path) -> Result<(), FileError> {
        let name = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| FileError::Unexpected {
            path: name.clone(),
            detail: e.to_string(),
        })?;

        let instance = if is_yaml_name(&name) {
            parse_yaml(&name, &content)?
        } else {
            serde_json::from_str(&content).map_err(|e| FileError::Json {
                path: name.clone(),
                detail: e.to_string(),
            })?
        };

        self.validate_value(&name, &instance)
    }
}

/// Validate one file against `schema`, compiling the schema for this call.
pub fn validate_file(path: impl AsRef<Path>, schema: &SchemaDocument) -> ValidationOutcome {
    ConfigValidator::new(schema).validate_file(path)
}

fn is_yaml_name(name: &str) -> bool {
    name.ends_with(".yaml") || name.ends_with(".yml")
}

fn parse_yaml(name: &str, content: &str) -> Result<Value, FileError> {
    let yaml_err = |e: serde_yaml::Error| FileError::Yaml {
        path: name.to_string(),
        detail: e.to_string(),
    };

    let LastWins(mut yaml_value) = serde_yaml::from_str(content).map_err(yaml_err)?;
    yaml_value.apply_merge().map_err(yaml_err)?;

    yaml_to_json_value(&yaml_value).map_err(|detail| FileError::Unexpected {
        path: name.to_string(),
        detail,
    })
}

/// YAML node loaded without the duplicate-key check of `serde_yaml::Value`.
///
/// Hand-edited Mergify files occasionally repeat a key; the later entry
/// replaces the earlier one. Tags are unwrapped to their inner value.
struct LastWins(serde_yaml::Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastWinsVisitor).map(LastWins)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = serde_yaml::Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Number(i.into()))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Number(u.into()))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Number(f.into()))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(serde_yaml::Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        LastWins::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::new();
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(serde_yaml::Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut mapping = serde_yaml::Mapping::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(serde_yaml::Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
        let (_tag, variant): (String, _) = data.variant()?;
        let LastWins(value) = variant.newtype_variant()?;
        Ok(value)
    }
}

/// Split a JSON Pointer into unescaped segments. `""` (the root) is empty.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|seg| seg.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Lower a loaded YAML tree into the JSON model the schema validator reads.
///
/// Mergify keys are always strings, but YAML happily reads `1:` or `on:`
/// as a number or boolean, so those keys are stringified rather than
/// rejected. Anything JSON cannot express (NaN, complex keys) is an error.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        // Mergify assigns no meaning to tags; validate the tagged payload.
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
