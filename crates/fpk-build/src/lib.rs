//! FPK package generation for fpk-compose-builder.
//!
//! # Build pipeline
//!
//! ```text
//! fpk-compose-builder build
//!   1. Parse      ── compose.yaml / docker-compose.yaml → ComposeFile
//!   2. Variables  ── first service (by name) → Variables
//!   3. Tree       ── PackageWriter::write_all()
//!   4. Icons      ── first *.png → ICON.PNG, ICON_256.PNG, app/ui/images/
//!   5. Package    ── fnpack build <app dir>  (skipped with --skip-fnpack)
//! ```
//!
//! # Precedence
//!
//! `manifest` and the cleaned compose copy are always generated. Every
//! other default artifact is written only when `x-fnpack` does not
//! supply content at the same path.

pub mod artifacts;
pub mod config;
pub mod fnpack;
pub mod icon;
pub mod manifest;
pub mod scripts;
pub mod substitute;
pub mod ui;
pub mod writer;

use std::path::{Path, PathBuf};

use fpk_core::{ComposeFile, Variables};

pub use fnpack::{FnpackRunner, PackageExecutor, PackagerError, RealExecutor};
pub use icon::IconError;
pub use manifest::ManifestGenerator;
pub use writer::{PackageWriter, WriteError};

/// The build context: a parsed compose file and everything derived from it.
#[derive(Debug, Clone)]
pub struct Builder {
    /// Directory holding the compose file and icon
    pub input_dir: PathBuf,
    /// Directory the app tree (and the .fpk) is created in
    pub output_dir: PathBuf,
    /// Package name: manifest `appname`, else the service name
    pub app_name: String,
    pub compose: ComposeFile,
    pub variables: Variables,
}

impl Builder {
    /// Locate and parse the compose file in `input_dir`, then derive the
    /// variables and app name.
    pub fn load(input_dir: &Path, output_dir: &Path) -> Result<Self, BuildError> {
        let compose_path = ComposeFile::locate(input_dir)?;
        let compose = ComposeFile::from_path(&compose_path)?;
        let variables = Variables::extract(&compose);

        let app_name = manifest::resolve_app_name(&compose.x_fnpack.manifest, &variables);
        if app_name.is_empty() {
            return Err(BuildError::MissingAppName);
        }

        tracing::info!(
            compose = %compose_path.display(),
            app = %app_name,
            service = %variables.service_name,
            "parsed compose file"
        );

        Ok(Self {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            app_name,
            compose,
            variables,
        })
    }

    pub fn app_dir(&self) -> PathBuf {
        self.output_dir.join(&self.app_name)
    }

    /// Materialize the package tree and icons.
    pub fn build(&self) -> Result<(), BuildError> {
        let app_dir = self.app_dir();

        PackageWriter::new(&app_dir, &self.compose, &self.variables).write_all()?;
        icon::process_icons(&self.input_dir, &app_dir)?;

        tracing::info!(path = %app_dir.display(), "package tree generated");
        Ok(())
    }

    /// [`build`](Self::build), then run `fnpack` and return the package path.
    pub fn build_with_packager<E: PackageExecutor>(
        &self,
        runner: &FnpackRunner<E>,
    ) -> Result<PathBuf, BuildError> {
        self.build()?;
        let package = runner.run(&self.app_dir(), &self.output_dir, &self.app_name)?;
        Ok(package)
    }

    /// Manifest version for reporting.
    pub fn version(&self) -> String {
        self.compose.x_fnpack.version()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to load compose file")]
    Compose(#[from] fpk_core::Error),
    #[error("no app name: set x-fnpack.manifest.appname or declare a service")]
    MissingAppName,
    #[error("failed to write files")]
    Write(#[from] WriteError),
    #[error("failed to process icons")]
    Icon(#[from] IconError),
    #[error("fnpack build failed")]
    Packager(#[from] PackagerError),
}
