use std::collections::{BTreeMap, HashSet};

use fpk_core::compose::DEFAULT_VERSION;
use fpk_core::{Variables, format_manifest_value};
use serde_yaml_ng::Value;

use crate::substitute::replace_variables;

/// Static defaults, applied before anything else.
pub const MANIFEST_DEFAULTS: &[(&str, &str)] = &[
    ("arch", "x86_64"),
    ("source", "thirdparty"),
    ("desktop_uidir", "ui"),
    ("version", DEFAULT_VERSION),
];

/// Keys emitted first, in this order. Remaining keys follow alphabetically.
pub const MANIFEST_FIELD_ORDER: &[&str] = &[
    "appname",
    "version",
    "display_name",
    "desc",
    "arch",
    "source",
    "maintainer",
    "maintainer_url",
    "distributor",
    "distributor_url",
    "os_min_ver",
    "beta",
    "reloadui",
    "desktop_uidir",
    "desktop_applaunchname",
    "changelog",
    "ctl_stop",
    "checkport",
    "install_type",
    "service_port",
];

const LAUNCH_NAME_KEY: &str = "desktop_applaunchname";
const LEGACY_LAUNCH_NAME_KEY: &str = "desktop_appname";
const LAUNCH_SUFFIX: &str = ".Application";
const KEY_WIDTH: usize = 16;

/// Renders the `manifest` file as aligned `key = value` lines.
pub struct ManifestGenerator<'a> {
    manifest: &'a BTreeMap<String, Value>,
    vars: &'a Variables,
}

impl<'a> ManifestGenerator<'a> {
    pub fn new(manifest: &'a BTreeMap<String, Value>, vars: &'a Variables) -> Self {
        Self { manifest, vars }
    }

    /// Resolve every manifest key. Later layers win:
    /// static defaults, variable defaults, explicit entries, then the
    /// synthesized launch name.
    pub fn resolve(&self) -> BTreeMap<String, String> {
        let mut result: BTreeMap<String, String> = MANIFEST_DEFAULTS
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();

        let vars = self.vars;
        if !vars.service_name.is_empty() {
            result.insert("appname".to_owned(), vars.service_name.clone());
            result.insert("display_name".to_owned(), vars.service_name.clone());
            result.insert(
                LAUNCH_NAME_KEY.to_owned(),
                format!("{}{LAUNCH_SUFFIX}", vars.service_name),
            );
        }

        if !vars.image_org.is_empty() {
            result.insert("maintainer".to_owned(), vars.image_org.clone());
            result.insert("distributor".to_owned(), vars.image_org.clone());
        }

        if !vars.image_name.is_empty() {
            result.insert("desc".to_owned(), vars.image_name.clone());
        } else if !vars.service_name.is_empty() {
            result.insert("desc".to_owned(), vars.service_name.clone());
        }

        if !vars.first_port.is_empty() {
            result.insert("service_port".to_owned(), vars.first_port.clone());
        }

        for (key, value) in self.manifest {
            let value = replace_variables(&format_manifest_value(value), vars);
            result.insert(key.clone(), value);
        }

        let launch_name_given = self.manifest.contains_key(LAUNCH_NAME_KEY)
            || self.manifest.contains_key(LEGACY_LAUNCH_NAME_KEY);
        if !launch_name_given {
            if let Some(appname) = result.get("appname").filter(|name| !name.is_empty()) {
                let launch_name = format!("{appname}{LAUNCH_SUFFIX}");
                result.insert(LAUNCH_NAME_KEY.to_owned(), launch_name);
            }
        }

        result
    }

    pub fn render(&self) -> String {
        let resolved = self.resolve();
        let ordered: HashSet<&str> = MANIFEST_FIELD_ORDER.iter().copied().collect();

        let canonical = MANIFEST_FIELD_ORDER
            .iter()
            .filter_map(|key| resolved.get_key_value(*key));
        let remaining = resolved
            .iter()
            .filter(|(key, _)| !ordered.contains(key.as_str()));

        let mut output = String::new();
        for (key, value) in canonical.chain(remaining) {
            if value.is_empty() {
                continue;
            }
            output.push_str(&format_manifest_line(key, value));
            output.push('\n');
        }
        output
    }
}

/// `key = value`, with the key padded to a fixed column so values line up.
pub fn format_manifest_line(key: &str, value: &str) -> String {
    // Width counts bytes, not chars.
    if key.len() < KEY_WIDTH {
        format!("{key}{}= {value}", " ".repeat(KEY_WIDTH - key.len()))
    } else {
        format!("{key} = {value}")
    }
}

/// The package name: the explicit manifest `appname`, else the service name.
pub fn resolve_app_name(manifest: &BTreeMap<String, Value>, vars: &Variables) -> String {
    manifest
        .get("appname")
        .map(|value| replace_variables(&format_manifest_value(value), vars))
        .unwrap_or_else(|| vars.service_name.clone())
}
