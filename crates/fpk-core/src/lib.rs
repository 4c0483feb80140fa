//! Core types and configuration for fpk-compose-builder.
//!
//! This crate defines the compose descriptor model with its `x-fnpack`
//! extension block ([`ComposeFile`]), the substitution [`Variables`]
//! derived from it, the optional `fpk.toml` schema ([`BuilderConfig`]),
//! and shared error types.

pub mod compose;
pub mod config;
pub mod error;
pub mod variables;

pub use compose::{ComposeFile, PortMapping, Service, XFnpack, format_manifest_value};
pub use config::{BuildSection, BuilderConfig, PackagerSection};
pub use error::{Error, Result};
pub use variables::{Variables, extract_host_port, extract_image_info};
