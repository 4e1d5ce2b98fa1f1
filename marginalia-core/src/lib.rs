//! # marginalia-core
//!
//! Core library for the marginalia publishing engine.
//!
//! This crate provides the content filter pipeline (named text transforms
//! composed into ordered, fault-tolerant chains), the built-in transforms,
//! and site configuration.

pub mod config;
pub mod filters;
pub mod render;

pub use config::{Config, Environment};
pub use filters::{
    apply, ConfigurationError, FilterChain, RegistryError, Transform, TransformError,
    TransformRegistry,
};
pub use render::Renderer;
