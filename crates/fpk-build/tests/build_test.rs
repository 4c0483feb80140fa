use std::path::Path;

use fpk_build::writer::{CLEAN_COMPOSE_PATH, PACKAGE_DIRS};
use fpk_build::{BuildError, Builder, WriteError};
use tempfile::TempDir;

const COMPOSE: &str = r#"
x-fnpack:
  manifest:
    appname: "docker-chromium"
    version: "1.2.3"
    display_name: "Chromium"
  wizard/install: |
    [{"stepTitle": "Install ${SERVICE_NAME}"}]
  cmd/main: |
    #!/bin/bash
    echo "custom main for ${CONTAINER_NAME} on ${FIRST_PORT}"
  config/privilege: |
    {"defaults": {"run-as": "root"}}
  extra/notes.txt: "plain"

services:
  chromium:
    image: linuxserver/chromium:latest
    container_name: chromium
    ports:
      - 3000:3000
      - 3001:3001
    restart: unless-stopped

networks:
  default: {}
"#;

fn input_with(compose: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("compose.yaml"), compose).unwrap();
    tmp
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[cfg(unix)]
fn mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

// ── Loading ──

#[test]
fn load_derives_app_name_and_variables() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();

    assert_eq!(builder.app_name, "docker-chromium");
    assert_eq!(builder.variables.service_name, "chromium");
    assert_eq!(builder.variables.first_port, "3000");
    assert_eq!(builder.variables.image_org, "linuxserver");
    assert_eq!(builder.version(), "1.2.3");
    assert_eq!(builder.app_dir(), out.path().join("docker-chromium"));
}

#[test]
fn load_falls_back_to_service_name() {
    let input = input_with("services:\n  web:\n    image: nginx\n");
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    assert_eq!(builder.app_name, "web");
    assert_eq!(builder.version(), "1.0.0");
}

#[test]
fn load_without_services_or_appname_fails() {
    let input = input_with("networks: {}\n");
    let out = TempDir::new().unwrap();

    let err = Builder::load(input.path(), out.path()).unwrap_err();
    assert!(matches!(err, BuildError::MissingAppName));
}

#[test]
fn load_reports_missing_compose() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let err = Builder::load(input.path(), out.path()).unwrap_err();
    assert!(matches!(err, BuildError::Compose(_)));
}

// ── Tree ──

#[test]
fn build_creates_fixed_directories() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();

    let app_dir = builder.app_dir();
    for dir in PACKAGE_DIRS {
        assert!(app_dir.join(dir).is_dir(), "missing {dir}");
    }
}

#[test]
fn build_writes_manifest_license_and_clean_compose() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    let manifest = read(&app_dir.join("manifest"));
    assert!(manifest.contains("appname         = docker-chromium\n"));
    assert!(manifest.contains("display_name    = Chromium\n"));

    assert_eq!(read(&app_dir.join("LICENSE")), "");

    let compose = read(&app_dir.join(CLEAN_COMPOSE_PATH));
    assert!(!compose.contains("x-fnpack"));
    assert!(!compose.contains("wizard/install"));
    assert!(compose.contains("services:"));
    assert!(compose.contains("networks:"));
    assert!(compose.contains("unless-stopped"));
}

#[test]
fn user_files_are_substituted_and_win_over_defaults() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    assert_eq!(
        read(&app_dir.join("wizard/install")),
        "[{\"stepTitle\": \"Install chromium\"}]\n"
    );
    assert_eq!(
        read(&app_dir.join("cmd/main")),
        "#!/bin/bash\necho \"custom main for chromium on 3000\"\n"
    );
    assert_eq!(
        read(&app_dir.join("config/privilege")),
        "{\"defaults\": {\"run-as\": \"root\"}}\n"
    );
    assert_eq!(read(&app_dir.join("extra/notes.txt")), "plain");
}

#[test]
fn defaults_fill_unsupplied_paths() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    let resource = read(&app_dir.join("config/resource"));
    assert!(resource.contains("\"docker-project\""));
    assert!(resource.contains("\"name\": \"chromium\""));

    let ui = read(&app_dir.join("app/ui/config"));
    assert!(ui.contains("\"chromium.Application\""));
    assert!(ui.contains("\"port\": \"3000\""));

    for hook in fpk_build::scripts::LIFECYCLE_HOOKS {
        assert!(app_dir.join("cmd").join(hook).is_file(), "missing cmd/{hook}");
    }
}

#[test]
fn minimal_compose_gets_every_default() {
    let input = input_with("services:\n  web:\n    ports: [\"8080:80\"]\n");
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    for artifact in fpk_build::artifacts::DEFAULT_ARTIFACTS {
        assert!(app_dir.join(artifact.path).is_file(), "missing {}", artifact.path);
    }
    assert!(read(&app_dir.join("config/privilege")).contains("\"username\": \"web\""));
}

#[cfg(unix)]
#[test]
fn command_files_are_executable() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    assert_eq!(mode(&app_dir.join("cmd/main")), 0o755);
    assert_eq!(mode(&app_dir.join("cmd/install_init")), 0o755);
    assert_eq!(mode(&app_dir.join("wizard/install")), 0o644);
    assert_eq!(mode(&app_dir.join("manifest")), 0o644);
}

#[test]
fn build_is_repeatable() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let first = read(&builder.app_dir().join("manifest"));
    builder.build().unwrap();
    let second = read(&builder.app_dir().join("manifest"));

    assert_eq!(first, second);
}

#[test]
fn escaping_file_path_is_rejected() {
    let input = input_with(
        "x-fnpack:\n  ../evil: \"boom\"\nservices:\n  web:\n    image: nginx\n",
    );
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    let err = builder.build().unwrap_err();

    assert!(matches!(
        err,
        BuildError::Write(WriteError::InvalidFilePath { .. })
    ));
    assert!(!out.path().join("evil").exists());
}

#[test]
fn build_without_icon_writes_no_icon_files() {
    let input = input_with(COMPOSE);
    let out = TempDir::new().unwrap();

    let builder = Builder::load(input.path(), out.path()).unwrap();
    builder.build().unwrap();
    let app_dir = builder.app_dir();

    assert!(!app_dir.join("ICON.PNG").exists());
    assert!(!app_dir.join("app/ui/images/icon-64.png").exists());
}
