//! User-facing wording

use crate::types::OptionValue;

pub mod operating_system {
    pub const ON_NEXT_BOOT: &str = "Operating system to start on the next boot";
    pub const UNDEFINED: &str = "undefined";
}

pub mod display {
    pub const ON_NEXT_WINDOWS_BOOT: &str = "Display to use on the next Windows boot";
    pub const CURRENT: &str = "Current display";
    pub const UNDEFINED: &str = "undefined";

    pub const SWITCH_NOT_SUPPORTED: &str =
        "Switching displays is not supported on the current operating system";
    pub const SWITCHING_TO: &str = "Switching display to";
    pub const IS_ALREADY_CURRENT: &str = "is already the current display";
    pub const CONFIGURE_NEEDS_CURRENT: &str = "Tell which display is in use right now: \
        'next-boot configure monitor' or 'next-boot configure tv'";
}

pub mod reboot_action {
    pub const REBOOTING: &str = "Rebooting...";
    pub const SHUTTING_DOWN: &str = "Shutting down...";
}

/// Printed instead of running an action when dry-run is on
pub const NOT_REALLY: &str = "...not really! (dry run)";

/// Label of an optional value, or `undefined`
pub fn value_text<T: OptionValue>(value: Option<T>, undefined: &'static str) -> &'static str {
    value.map_or(undefined, T::label)
}

/// `"<description> was updated to <value>."`
pub fn was_updated_to<T: OptionValue>(
    description: &str,
    value: Option<T>,
    undefined: &'static str,
) -> String {
    format!("{description} was updated to {}.", value_text(value, undefined))
}
