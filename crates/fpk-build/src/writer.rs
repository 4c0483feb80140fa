//! Writes the FPK directory tree.
//!
//! ```text
//! <app>/
//!   manifest              always generated
//!   LICENSE               always empty
//!   ICON.PNG, ICON_256.PNG
//!   app/docker/docker-compose.yaml   compose file without x-fnpack
//!   app/ui/config         default unless supplied
//!   app/ui/images/        icon-64.png, icon-256.png
//!   cmd/                  main + lifecycle hooks, default unless supplied
//!   config/               privilege + resource, default unless supplied
//!   wizard/               user-supplied only
//! ```

use std::path::{Component, Path, PathBuf};

use fpk_core::{ComposeFile, Variables};

use crate::artifacts;
use crate::manifest::ManifestGenerator;
use crate::substitute::replace_variables;

/// Directories created for every package, relative to the app directory.
pub const PACKAGE_DIRS: &[&str] = &["app/docker", "app/ui/images", "cmd", "config", "wizard"];

pub const MANIFEST_PATH: &str = "manifest";
pub const LICENSE_PATH: &str = "LICENSE";
pub const CLEAN_COMPOSE_PATH: &str = "app/docker/docker-compose.yaml";

/// Files under this prefix are written executable.
pub const COMMANDS_PREFIX: &str = "cmd/";

const EXECUTABLE_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Populates one app directory from a parsed compose file.
pub struct PackageWriter<'a> {
    app_dir: &'a Path,
    compose: &'a ComposeFile,
    vars: &'a Variables,
}

impl<'a> PackageWriter<'a> {
    pub fn new(app_dir: &'a Path, compose: &'a ComposeFile, vars: &'a Variables) -> Self {
        Self {
            app_dir,
            compose,
            vars,
        }
    }

    /// Create the tree and write every file, in precedence order.
    pub fn write_all(&self) -> Result<(), WriteError> {
        self.create_directories()?;
        self.write_manifest()?;
        self.write_custom_files()?;
        self.write_defaults()?;
        self.write_compose()?;
        self.write_license()?;
        Ok(())
    }

    pub fn create_directories(&self) -> Result<(), WriteError> {
        for dir in PACKAGE_DIRS {
            let path = self.app_dir.join(dir);
            create_dir(&path)?;
            tracing::debug!(path = %path.display(), "created directory");
        }
        Ok(())
    }

    pub fn write_manifest(&self) -> Result<(), WriteError> {
        let content = ManifestGenerator::new(&self.compose.x_fnpack.manifest, self.vars).render();
        self.write(MANIFEST_PATH, &content)
    }

    /// Write every path-keyed entry of the `x-fnpack` block after substitution.
    pub fn write_custom_files(&self) -> Result<(), WriteError> {
        for (relative, content) in &self.compose.x_fnpack.files {
            validate_relative_path(relative)?;
            let content = replace_variables(content, self.vars);
            self.write(relative, &content)?;
        }
        Ok(())
    }

    /// Write the default artifacts whose paths the user did not supply.
    pub fn write_defaults(&self) -> Result<(), WriteError> {
        let files = &self.compose.x_fnpack;
        for artifact in artifacts::pending_defaults(|path| files.has_file(path)) {
            let content = artifact
                .render(self.vars)
                .map_err(|e| WriteError::Render {
                    artifact: artifact.path,
                    source: e,
                })?;
            self.write(artifact.path, &content)?;
            tracing::debug!(path = artifact.path, "wrote default");
        }
        Ok(())
    }

    /// Copy the compose file into the docker project with `x-fnpack` removed.
    pub fn write_compose(&self) -> Result<(), WriteError> {
        let cleaned = self
            .compose
            .cleaned_yaml()
            .map_err(|e| WriteError::CleanCompose { source: e })?;
        self.write(CLEAN_COMPOSE_PATH, &cleaned)
    }

    pub fn write_license(&self) -> Result<(), WriteError> {
        self.write(LICENSE_PATH, "")
    }

    fn write(&self, relative: &str, content: &str) -> Result<(), WriteError> {
        let path = self.app_dir.join(relative);
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        std::fs::write(&path, content).map_err(|e| WriteError::Write {
            path: path.clone(),
            source: e,
        })?;

        let mode = if relative.starts_with(COMMANDS_PREFIX) {
            EXECUTABLE_MODE
        } else {
            FILE_MODE
        };
        set_mode(&path, mode)?;

        tracing::debug!(path = %path.display(), "written");
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), WriteError> {
    std::fs::create_dir_all(path).map_err(|e| WriteError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), WriteError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        WriteError::Permissions {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), WriteError> {
    Ok(())
}

/// Reject paths that would land outside the app directory.
fn validate_relative_path(path: &str) -> Result<(), WriteError> {
    let invalid = |reason| WriteError::InvalidFilePath {
        path: path.to_owned(),
        reason,
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain `..`")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative"));
            }
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to set permissions on {path}")]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to render default {artifact}")]
    Render {
        artifact: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to clean compose file")]
    CleanCompose { source: fpk_core::Error },
    #[error("invalid x-fnpack file path {path:?}: {reason}")]
    InvalidFilePath { path: String, reason: &'static str },
}
