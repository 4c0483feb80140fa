//! Default artifacts and the paths they reserve.
//!
//! A default is generated only when the `x-fnpack` block does not already
//! supply content at its path. User content always wins.

use fpk_core::Variables;

use crate::{config, scripts, ui};

/// What a default artifact renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Privilege,
    Resource,
    MainScript,
    LifecycleHook(&'static str),
    UiConfig,
}

/// A default artifact bound to its output path, relative to the app directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultArtifact {
    pub path: &'static str,
    pub kind: ArtifactKind,
}

/// Every default artifact, in write order.
pub const DEFAULT_ARTIFACTS: &[DefaultArtifact] = &[
    DefaultArtifact {
        path: "config/privilege",
        kind: ArtifactKind::Privilege,
    },
    DefaultArtifact {
        path: "config/resource",
        kind: ArtifactKind::Resource,
    },
    DefaultArtifact {
        path: "cmd/main",
        kind: ArtifactKind::MainScript,
    },
    DefaultArtifact {
        path: "cmd/install_init",
        kind: ArtifactKind::LifecycleHook("install_init"),
    },
    DefaultArtifact {
        path: "cmd/install_callback",
        kind: ArtifactKind::LifecycleHook("install_callback"),
    },
    DefaultArtifact {
        path: "cmd/uninstall_init",
        kind: ArtifactKind::LifecycleHook("uninstall_init"),
    },
    DefaultArtifact {
        path: "cmd/uninstall_callback",
        kind: ArtifactKind::LifecycleHook("uninstall_callback"),
    },
    DefaultArtifact {
        path: "cmd/upgrade_init",
        kind: ArtifactKind::LifecycleHook("upgrade_init"),
    },
    DefaultArtifact {
        path: "cmd/upgrade_callback",
        kind: ArtifactKind::LifecycleHook("upgrade_callback"),
    },
    DefaultArtifact {
        path: "cmd/config_init",
        kind: ArtifactKind::LifecycleHook("config_init"),
    },
    DefaultArtifact {
        path: "cmd/config_callback",
        kind: ArtifactKind::LifecycleHook("config_callback"),
    },
    DefaultArtifact {
        path: "app/ui/config",
        kind: ArtifactKind::UiConfig,
    },
];

impl DefaultArtifact {
    pub fn render(&self, vars: &Variables) -> Result<String, serde_json::Error> {
        match self.kind {
            ArtifactKind::Privilege => config::render_privilege(vars),
            ArtifactKind::Resource => config::render_resource(vars),
            ArtifactKind::MainScript => Ok(scripts::render_main_script(vars)),
            ArtifactKind::LifecycleHook(hook) => Ok(scripts::render_lifecycle_script(hook, vars)),
            ArtifactKind::UiConfig => ui::render_ui_config(vars),
        }
    }
}

/// The defaults still to generate once user-supplied paths are taken out.
pub fn pending_defaults<F>(is_user_supplied: F) -> impl Iterator<Item = &'static DefaultArtifact>
where
    F: Fn(&str) -> bool,
{
    DEFAULT_ARTIFACTS
        .iter()
        .filter(move |artifact| !is_user_supplied(artifact.path))
}
