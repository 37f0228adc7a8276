//! Configuration for next-boot
//!
//! Two unrelated kinds of configuration live here:
//! - **mapping**: per-machine identifiers written by `configure` into the state directory
//! - **settings**: optional user preferences for the tool itself (JSON)

pub mod mapping;
pub mod settings;

pub use mapping::{ConfigMapping, ConfigMappingWriter};
pub use settings::Settings;
