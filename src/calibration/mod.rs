//! One-time, per-machine population of the configuration file
//!
//! Linux learns the boot entries from `grub.cfg`; Windows learns the display
//! identifiers by trying both display switch arguments.

mod displays;
mod grub;

pub use displays::configure_displays;
pub use grub::configure_grub_entries;
