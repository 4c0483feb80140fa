//! Invocation of the external `fnpack` packager.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const PACKAGER_NAME: &str = "fnpack";

/// Candidates relative to the working directory, tried first.
pub const RELATIVE_CANDIDATES: &[&str] = &["../bin/fnpack", "bin/fnpack", "../../bin/fnpack"];

/// Absolute candidates, tried after the `PATH` lookup.
pub const SYSTEM_CANDIDATES: &[&str] = &["/usr/local/bin/fnpack"];

pub const PACKAGE_EXTENSION: &str = "fpk";

/// Abstraction over process execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
pub trait PackageExecutor {
    /// Run `program` with `args` in `working_dir`, streaming its output to
    /// the terminal, and wait for it to exit.
    fn run(&self, program: &Path, args: &[String], working_dir: &Path)
    -> Result<(), PackagerError>;
}

/// Runs the packager as a child process with inherited stdio.
pub struct RealExecutor;

impl PackageExecutor for RealExecutor {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> Result<(), PackagerError> {
        let status = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| PackagerError::Spawn {
                program: program.to_path_buf(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PackagerError::Failed {
                args: args.to_vec(),
                status: status.to_string(),
            })
        }
    }
}

/// Locates and runs `fnpack`, parameterized over the executor for testability.
pub struct FnpackRunner<E: PackageExecutor = RealExecutor> {
    executor: E,
    configured_path: Option<PathBuf>,
    search_root: Option<PathBuf>,
}

impl FnpackRunner<RealExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RealExecutor)
    }
}

impl Default for FnpackRunner<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PackageExecutor> FnpackRunner<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor,
            configured_path: None,
            search_root: None,
        }
    }

    /// Use this binary instead of searching.
    pub fn configured_path(mut self, path: Option<PathBuf>) -> Self {
        self.configured_path = path;
        self
    }

    /// Resolve relative candidates against `dir` instead of the working directory.
    pub fn search_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_root = Some(dir.into());
        self
    }

    /// Find the packager binary.
    ///
    /// Order: configured path, relative candidates, `PATH`, system candidates.
    pub fn locate(&self) -> Result<PathBuf, PackagerError> {
        if let Some(path) = &self.configured_path {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(PackagerError::ConfiguredPathMissing(path.clone()));
        }

        let root = match &self.search_root {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| PackagerError::WorkingDir { source: e })?,
        };
        if let Some(path) = RELATIVE_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
        {
            return Ok(path);
        }

        match which::which(PACKAGER_NAME) {
            Ok(path) => return Ok(path),
            Err(e) => tracing::debug!(error = %e, "fnpack not found in PATH"),
        }

        SYSTEM_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
            .ok_or(PackagerError::NotFound)
    }

    /// Run `fnpack build <app_dir>` inside `output_dir` and return the
    /// produced package.
    pub fn run(
        &self,
        app_dir: &Path,
        output_dir: &Path,
        app_name: &str,
    ) -> Result<PathBuf, PackagerError> {
        let abs_app_dir = absolute(app_dir)?;
        let abs_output_dir = absolute(output_dir)?;
        let program = self.locate()?;

        tracing::info!(
            fnpack = %program.display(),
            app_dir = %abs_app_dir.display(),
            "running fnpack build"
        );

        let args = vec!["build".to_owned(), abs_app_dir.display().to_string()];
        self.executor.run(&program, &args, &abs_output_dir)?;

        let package = find_package_file(&abs_output_dir, app_name)?;
        tracing::info!(path = %package.display(), "package built");
        Ok(package)
    }
}

/// The package `fnpack` produced in `output_dir`.
///
/// Prefers `<app_name>*.fpk`, then falls back to any `*.fpk`. The first
/// match in glob order wins.
pub fn find_package_file(output_dir: &Path, app_name: &str) -> Result<PathBuf, PackagerError> {
    let dir = glob::Pattern::escape(&output_dir.to_string_lossy());
    let patterns = [
        format!(
            "{dir}/{}*.{PACKAGE_EXTENSION}",
            glob::Pattern::escape(app_name)
        ),
        format!("{dir}/*.{PACKAGE_EXTENSION}"),
    ];

    for pattern in &patterns {
        if let Some(path) = first_match(pattern)? {
            return Ok(path);
        }
    }

    Err(PackagerError::PackageMissing(output_dir.to_path_buf()))
}

fn first_match(pattern: &str) -> Result<Option<PathBuf>, PackagerError> {
    let paths = glob::glob(pattern).map_err(|e| PackagerError::Pattern {
        pattern: pattern.to_owned(),
        source: e,
    })?;

    for entry in paths {
        match entry {
            Ok(path) => return Ok(Some(path)),
            Err(e) => tracing::debug!(error = %e, "skipping unreadable glob entry"),
        }
    }
    Ok(None)
}

fn absolute(path: &Path) -> Result<PathBuf, PackagerError> {
    std::path::absolute(path).map_err(|e| PackagerError::AbsolutePath {
        path: path.to_path_buf(),
        source: e,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum PackagerError {
    #[error(
        "fnpack not found in PATH or common locations (bin/fnpack, /usr/local/bin/fnpack)"
    )]
    NotFound,

    #[error("configured fnpack path does not exist: {0}")]
    ConfiguredPathMissing(PathBuf),

    #[error("failed to resolve working directory")]
    WorkingDir { source: std::io::Error },

    #[error("failed to resolve absolute path for {path}")]
    AbsolutePath {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to execute {program}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("fnpack command failed: {args:?} ({status})")]
    Failed { args: Vec<String>, status: String },

    #[error("invalid package search pattern {pattern}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("no .fpk file found in {0}")]
    PackageMissing(PathBuf),
}
