//! Configuration loading.
//!
//! The environment is read exactly once, by [`ConfigLoader::load`]. Everything
//! downstream receives a [`MiniAppConfig`] by reference.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AvatarConfig, ChainConfig, ClaimConfig, ConfigMetadata, ImageConfig,
    MiniAppConfig, ShareConfig,
};
pub use sources::EnvConfig;
pub use validation::{ConfigWarning, ConfigWarnings};
