use std::collections::BTreeMap;

use fpk_build::config::{render_privilege, render_resource};
use fpk_build::manifest::{ManifestGenerator, format_manifest_line, resolve_app_name};
use fpk_build::scripts::{LIFECYCLE_HOOKS, render_lifecycle_script, render_main_script};
use fpk_build::substitute::replace_variables;
use fpk_build::ui::render_ui_config;
use fpk_core::{ComposeFile, Variables};
use serde_yaml_ng::Value;

fn vars() -> Variables {
    Variables {
        service_name: "chromium".to_owned(),
        container_name: "chromium-box".to_owned(),
        first_port: "3000".to_owned(),
        image_org: "fnapp".to_owned(),
        image_name: "trim-chromium".to_owned(),
    }
}

fn manifest(yaml: &str) -> BTreeMap<String, Value> {
    serde_yaml_ng::from_str(yaml).unwrap()
}

fn lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

// ── Substitution ──

#[test]
fn replaces_all_placeholders() {
    let out = replace_variables(
        "svc=${SERVICE_NAME} ctr=${CONTAINER_NAME} port=${FIRST_PORT} again=${SERVICE_NAME}",
        &vars(),
    );
    assert_eq!(
        out,
        "svc=chromium ctr=chromium-box port=3000 again=chromium"
    );
}

#[test]
fn leaves_unknown_placeholders_untouched() {
    let out = replace_variables("${IMAGE_NAME} $SERVICE_NAME {FIRST_PORT}", &vars());
    assert_eq!(out, "${IMAGE_NAME} $SERVICE_NAME {FIRST_PORT}");
}

// ── Manifest ──

#[test]
fn manifest_line_alignment() {
    assert_eq!(format_manifest_line("appname", "x"), "appname         = x");
    assert_eq!(
        format_manifest_line("desktop_applaunchname", "x"),
        "desktop_applaunchname = x"
    );
    assert_eq!(
        format_manifest_line("exactly16chars__", "x"),
        "exactly16chars__ = x"
    );
}

#[test]
fn manifest_line_width_counts_bytes() {
    // "名前" is two chars but six bytes
    assert_eq!(format_manifest_line("名前", "x"), "名前          = x");
    assert_eq!(format_manifest_line("名前", "x").find('='), Some(16));
    // six chars, eighteen bytes: past the column
    assert_eq!(format_manifest_line("説明説明説明", "x"), "説明説明説明 = x");
}

#[test]
fn manifest_defaults_from_variables() {
    let empty = BTreeMap::new();
    let vars = vars();
    let output = ManifestGenerator::new(&empty, &vars).render();

    assert_eq!(
        lines(&output),
        vec![
            "appname         = chromium",
            "version         = 1.0.0",
            "display_name    = chromium",
            "desc            = trim-chromium",
            "arch            = x86_64",
            "source          = thirdparty",
            "maintainer      = fnapp",
            "distributor     = fnapp",
            "desktop_uidir   = ui",
            "desktop_applaunchname = chromium.Application",
            "service_port    = 3000",
        ]
    );
    assert!(output.ends_with("3000\n"));
    assert!(!output.ends_with("\n\n"));
}

#[test]
fn manifest_desc_falls_back_to_service_name() {
    let empty = BTreeMap::new();
    let vars = Variables {
        image_org: String::new(),
        image_name: String::new(),
        ..vars()
    };
    let output = ManifestGenerator::new(&empty, &vars).render();

    assert!(output.contains("desc            = chromium\n"));
    assert!(!output.contains("maintainer"));
    assert!(!output.contains("distributor"));
}

#[test]
fn manifest_with_no_variables_has_static_defaults_only() {
    let empty = BTreeMap::new();
    let vars = Variables::default();
    let output = ManifestGenerator::new(&empty, &vars).render();

    assert_eq!(
        output,
        "version         = 1.0.0\n\
         arch            = x86_64\n\
         source          = thirdparty\n\
         desktop_uidir   = ui\n"
    );
}

#[test]
fn manifest_explicit_values_override_and_are_substituted() {
    let m = manifest(
        r#"
appname: docker-chromium
version: "1.2.3"
arch: noarch
beta: true
checkport: false
os_min_ver: 0.9
changelog: "Runs on port ${FIRST_PORT}"
"#,
    );
    let vars = vars();
    let output = ManifestGenerator::new(&m, &vars).render();

    assert!(output.contains("appname         = docker-chromium\n"));
    assert!(output.contains("version         = 1.2.3\n"));
    assert!(output.contains("arch            = noarch\n"));
    assert!(output.contains("beta            = yes\n"));
    assert!(output.contains("checkport       = no\n"));
    assert!(output.contains("os_min_ver      = 0.9\n"));
    assert!(output.contains("changelog       = Runs on port 3000\n"));
    // launch name follows the explicit appname
    assert!(output.contains("desktop_applaunchname = docker-chromium.Application\n"));
    assert!(!output.contains("appname         = chromium\n"));
}

#[test]
fn manifest_explicit_launch_name_is_kept() {
    let m = manifest(
        r#"
appname: docker-chromium
desktop_applaunchname: custom.Launch
"#,
    );
    let vars = vars();
    let output = ManifestGenerator::new(&m, &vars).render();
    assert!(output.contains("desktop_applaunchname = custom.Launch\n"));
}

#[test]
fn manifest_legacy_launch_key_suppresses_synthesis() {
    let m = manifest(
        r#"
appname: docker-chromium
desktop_appname: legacy.Application
"#,
    );
    let vars = vars();
    let output = ManifestGenerator::new(&m, &vars).render();

    // the service-derived default survives; no synthesized override
    assert!(output.contains("desktop_applaunchname = chromium.Application\n"));
    assert!(output.contains("desktop_appname = legacy.Application\n"));
}

#[test]
fn manifest_unknown_keys_follow_canonical_keys_alphabetically() {
    let m = manifest(
        r#"
zz_last: z
aa_first: a
version: "2.0.0"
"#,
    );
    let vars = vars();
    let output = ManifestGenerator::new(&m, &vars).render();
    let lines = lines(&output);

    let service_port = lines.iter().position(|l| l.starts_with("service_port")).unwrap();
    let aa = lines.iter().position(|l| l.starts_with("aa_first")).unwrap();
    let zz = lines.iter().position(|l| l.starts_with("zz_last")).unwrap();
    assert!(service_port < aa && aa < zz);
}

#[test]
fn manifest_omits_empty_values() {
    let m = manifest("maintainer_url: \"\"\ndesc: ~\n");
    let vars = vars();
    let output = ManifestGenerator::new(&m, &vars).render();

    assert!(!output.contains("maintainer_url"));
    assert!(!output.contains("desc"));
}

#[test]
fn manifest_generation_is_deterministic() {
    let m = manifest("appname: a\nb: 1\nc: true\nversion: \"3\"\n");
    let vars = vars();
    let first = ManifestGenerator::new(&m, &vars).render();
    let second = ManifestGenerator::new(&m, &vars).render();
    assert_eq!(first, second);
}

#[test]
fn chromium_manifest_scenario() {
    let compose = ComposeFile::parse(
        r#"
x-fnpack:
  manifest:
    appname: "docker-chromium"
    version: "1.2.3"
services:
  chromium:
    container_name: chromium
    ports:
      - 3000:3000
      - 3001:3001
"#,
    )
    .unwrap();
    let vars = Variables::extract(&compose);
    let output = ManifestGenerator::new(&compose.x_fnpack.manifest, &vars).render();

    assert!(output.contains("appname         = docker-chromium\n"));
    assert!(output.contains("version         = 1.2.3\n"));
    assert!(!output.contains("appname         = chromium\n"));
    assert!(output.contains("service_port    = 3000\n"));
}

#[test]
fn app_name_prefers_manifest() {
    let vars = vars();
    assert_eq!(resolve_app_name(&manifest("appname: docker-x"), &vars), "docker-x");
    assert_eq!(
        resolve_app_name(&manifest("appname: ${SERVICE_NAME}-app"), &vars),
        "chromium-app"
    );
    assert_eq!(resolve_app_name(&BTreeMap::new(), &vars), "chromium");
}

// ── Structured configs ──

#[test]
fn privilege_config_json() {
    let json = render_privilege(&vars()).unwrap();
    assert_eq!(
        json,
        r#"{
    "defaults": {
        "run-as": "package"
    },
    "username": "chromium",
    "groupname": "chromium"
}
"#
    );
}

#[test]
fn resource_config_json() {
    let json = render_resource(&vars()).unwrap();
    assert_eq!(
        json,
        r#"{
    "docker-project": {
        "projects": [
            {
                "name": "chromium",
                "path": "docker"
            }
        ]
    }
}
"#
    );
}

#[test]
fn ui_config_json() {
    let json = render_ui_config(&vars()).unwrap();
    assert_eq!(
        json,
        r#"{
    ".url": {
        "chromium.Application": {
            "title": "chromium",
            "icon": "images/icon-{0}.png",
            "type": "url",
            "protocol": "http",
            "port": "3000",
            "url": "/",
            "allUsers": true
        }
    }
}
"#
    );
}

#[test]
fn ui_config_omits_missing_port() {
    let vars = Variables {
        first_port: String::new(),
        ..vars()
    };
    let json = render_ui_config(&vars).unwrap();
    assert!(!json.contains("\"port\""));

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[".url"]["chromium.Application"]["allUsers"], true);
}

// ── Scripts ──

#[test]
fn main_script_uses_variables() {
    let script = render_main_script(&vars());
    assert!(script.starts_with("#!/bin/bash\n"));
    assert!(script.contains("SERVICE_NAME=\"chromium\""));
    assert!(script.contains("CONTAINER_NAME=\"chromium-box\""));
    assert!(script.contains("status)"));
    assert!(script.contains("name=^${CONTAINER_NAME}$"));
}

#[test]
fn lifecycle_scripts_are_deterministic() {
    for hook in LIFECYCLE_HOOKS {
        let script = render_lifecycle_script(hook, &vars());
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains(hook));
        assert!(script.trim_end().ends_with("exit 0"));
        assert_eq!(script, render_lifecycle_script(hook, &vars()));
    }
}
