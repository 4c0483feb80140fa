//! Compose descriptor model with the `x-fnpack` extension block.
//!
//! The descriptor is parsed once into a raw YAML document. The typed view
//! ([`ComposeFile::services`], [`ComposeFile::x_fnpack`]) is derived from
//! that document, and the document itself is kept so the cleaned copy
//! written into the package preserves every key the builder does not
//! interpret.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};

/// Top-level key of the extension block interpreted by the builder.
pub const EXTENSION_KEY: &str = "x-fnpack";

/// Key inside the extension block holding the app metadata.
pub const MANIFEST_KEY: &str = "manifest";

/// Recognized descriptor file names, in lookup order.
pub const DESCRIPTOR_FILE_NAMES: &[&str] = &["compose.yaml", "docker-compose.yaml"];

/// Default manifest version when none is given.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// A compose file together with its `x-fnpack` extension block.
#[derive(Debug, Clone, Default)]
pub struct ComposeFile {
    /// The parsed extension block (empty when absent)
    pub x_fnpack: XFnpack,
    /// Services keyed by name; iteration order is byte-wise by name
    pub services: BTreeMap<String, Service>,
    /// Network definitions, never interpreted
    pub networks: Option<Value>,
    /// Volume definitions, never interpreted
    pub volumes: Option<Value>,
    /// The full top-level document as parsed, in source order
    pub document: Mapping,
}

/// The `x-fnpack` extension block.
///
/// `manifest` is the app metadata object. Every other key is a relative
/// output path whose string value is written verbatim into the package.
/// Non-string values under those keys are dropped: they cannot be file
/// content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XFnpack {
    pub manifest: BTreeMap<String, Value>,
    pub files: BTreeMap<String, String>,
}

/// One compose service. Only the fields the builder reads are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Image reference, `[registry/][org/]name[:tag]`
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,
    /// Remaining compose fields (environment, volumes, restart, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A `ports:` entry in any of the compose syntaxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortMapping {
    /// `"[ip:]host:container[/proto]"` or `"port"`
    Short(String),
    /// Bare `3000`
    Number(u64),
    /// Long syntax with `target`, `published`, `protocol`, ...
    Long(BTreeMap<String, Value>),
}

impl PortMapping {
    /// The host-side port of this mapping, or an empty string if none can be derived.
    pub fn host_port(&self) -> String {
        match self {
            Self::Short(mapping) => crate::variables::extract_host_port(mapping),
            Self::Number(port) => port.to_string(),
            Self::Long(fields) => fields
                .get("published")
                .map(format_manifest_value)
                .unwrap_or_default(),
        }
    }
}

impl From<&str> for PortMapping {
    fn from(mapping: &str) -> Self {
        Self::Short(mapping.to_owned())
    }
}

impl ComposeFile {
    /// Locate the descriptor in `input_dir`, trying each recognized name in order.
    pub fn locate(input_dir: &Path) -> crate::Result<PathBuf> {
        if !input_dir.is_dir() {
            return Err(crate::Error::InputDirNotFound(input_dir.to_path_buf()));
        }

        DESCRIPTOR_FILE_NAMES
            .iter()
            .map(|name| input_dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| crate::Error::DescriptorNotFound(input_dir.to_path_buf()))
    }

    /// Read and parse a descriptor file.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::DescriptorRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "parsing compose file");
        Self::parse(&content)
    }

    /// Parse descriptor text.
    pub fn parse(content: &str) -> crate::Result<Self> {
        let value: Value = serde_yaml_ng::from_str(content)
            .map_err(|e| crate::Error::DescriptorParse { source: e })?;

        let document = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            other => {
                return Err(crate::Error::DescriptorShape {
                    reason: format!("expected a mapping at the top level, found {}", kind(&other)),
                });
            }
        };

        // `<<` merge keys are resolved for the typed view only; the document
        // keeps them as written.
        let services = match document.get("services") {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(value) => {
                let mut value = value.clone();
                value
                    .apply_merge()
                    .map_err(|e| crate::Error::DescriptorParse { source: e })?;
                serde_yaml_ng::from_value(value)
                    .map_err(|e| crate::Error::DescriptorParse { source: e })?
            }
        };

        let x_fnpack = match document.get(EXTENSION_KEY) {
            None | Some(Value::Null) => XFnpack::default(),
            Some(Value::Mapping(block)) => XFnpack::from_mapping(block)?,
            Some(other) => {
                return Err(crate::Error::DescriptorShape {
                    reason: format!("`{EXTENSION_KEY}` must be a mapping, found {}", kind(other)),
                });
            }
        };

        Ok(Self {
            x_fnpack,
            services,
            networks: document.get("networks").cloned(),
            volumes: document.get("volumes").cloned(),
            document,
        })
    }

    /// Serialize the descriptor with the extension block removed.
    ///
    /// All other top-level keys are kept in their original order.
    pub fn cleaned_yaml(&self) -> crate::Result<String> {
        let mut document = self.document.clone();
        document.shift_remove(EXTENSION_KEY);
        serde_yaml_ng::to_string(&document)
            .map_err(|e| crate::Error::DescriptorSerialize { source: e })
    }
}

impl XFnpack {
    fn from_mapping(block: &Mapping) -> crate::Result<Self> {
        let mut manifest = BTreeMap::new();
        let mut files = BTreeMap::new();

        for (key, value) in block {
            let Some(key) = key.as_str() else {
                tracing::debug!(key = ?key, "ignoring non-string x-fnpack key");
                continue;
            };

            if key == MANIFEST_KEY {
                manifest = match value {
                    Value::Null => BTreeMap::new(),
                    Value::Mapping(_) => serde_yaml_ng::from_value(value.clone())
                        .map_err(|e| crate::Error::DescriptorParse { source: e })?,
                    other => {
                        return Err(crate::Error::DescriptorShape {
                            reason: format!(
                                "`{EXTENSION_KEY}.{MANIFEST_KEY}` must be a mapping, found {}",
                                kind(other)
                            ),
                        });
                    }
                };
                continue;
            }

            match value {
                Value::String(content) => {
                    files.insert(key.to_owned(), content.clone());
                }
                other => {
                    tracing::debug!(key, kind = kind(other), "ignoring non-text x-fnpack entry");
                }
            }
        }

        Ok(Self { manifest, files })
    }

    /// The explicit manifest value for `key`, formatted, or `default` if absent.
    pub fn manifest_value(&self, key: &str, default: &str) -> String {
        self.manifest
            .get(key)
            .map(format_manifest_value)
            .unwrap_or_else(|| default.to_owned())
    }

    /// The manifest version, falling back to the default version.
    pub fn version(&self) -> String {
        self.manifest_value("version", DEFAULT_VERSION)
    }

    /// Whether the block supplies content for the given output path.
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// Render a manifest value as manifest text.
///
/// Strings are verbatim, booleans become `yes`/`no`, whole-valued floats
/// print without a fraction, and null renders empty. Sequences join their
/// items with commas; mappings render as `key:value` pairs joined with
/// commas.
pub fn format_manifest_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "yes".to_owned(),
        Value::Bool(false) => "no".to_owned(),
        Value::Number(number) => format_number(number),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(format_manifest_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Mapping(entries) => entries
            .iter()
            .map(|(k, v)| format!("{}:{}", format_manifest_value(k), format_manifest_value(v)))
            .collect::<Vec<_>>()
            .join(","),
        Value::Tagged(tagged) => format_manifest_value(&tagged.value),
    }
}

/// Accept any scalar where compose expects text, so `container_name: 123`
/// reads as `"123"`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(format_manifest_value(&value)),
    })
}

fn format_number(number: &serde_yaml_ng::Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
