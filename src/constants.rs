//! Application-wide constants
//!
//! File names, reserved keys and fixed limits shared by the stores,
//! the platform providers and the CLI.

/// Names of the files kept in the state directory
pub mod files {
    /// Bootloader environment block
    pub const GRUBENV: &str = "grubenv";

    /// Windows-side options (next Windows boot display)
    pub const OPTIONS: &str = "my-reboot-options.properties";

    /// Machine-specific mappings written by `configure`
    pub const CONFIGS: &str = "my-reboot-configs.properties";
}

/// Reserved keys inside the stores
pub mod keys {
    /// Boot entry GRUB starts next
    pub const SAVED_ENTRY: &str = "saved_entry";

    /// Display to use on the next Windows boot
    pub const WINDOWS_DISPLAY: &str = "windows.display";
}

/// Attribute suffixes of the configuration keys (`<value>.<attribute>`)
pub mod attributes {
    pub const GRUB_ENTRY: &str = "grubEntry";
    pub const DEVICE_ID: &str = "deviceId";
    pub const DISPLAY_SWITCH_ARG: &str = "displaySwitchArg";
}

/// GRUB environment block layout
pub mod grubenv {
    /// Exact on-disk size of the block
    pub const BLOCK_SIZE: usize = 1024;

    /// Filler byte used to pad the block
    pub const FILLER: u8 = b'#';

    /// First line of a freshly created block
    pub const HEADER: &str = "# GRUB Environment Block";
}

/// Platform state directories
pub mod paths {
    pub const LINUX_STATE_DIR: &str = "/boot/grub/grubenv.dir";
    pub const WINDOWS_STATE_DIR: &str = r"C:\grubenv.dir";
    pub const GRUB_CFG: &str = "/boot/grub/grub.cfg";
}

/// External programs invoked by the platform providers
pub mod programs {
    pub const SYSTEMCTL: &str = "systemctl";
    pub const SHUTDOWN: &str = "shutdown";
    pub const DISPLAY_SWITCH: &str = "DisplaySwitch.exe";
    pub const ACTIVE_DISPLAY: &str = "get_active_display_device_id.exe";
    pub const CMD: &str = "cmd";
}

/// Display switch candidate arguments
pub mod switch_args {
    /// `DisplaySwitch.exe` arguments on Windows 11 and later
    pub const WINDOWS_11: [&str; 2] = ["1", "4"];

    /// `DisplaySwitch.exe` arguments on earlier releases
    pub const LEGACY: [&str; 2] = ["/internal", "/external"];

    /// First Windows 11 build number
    pub const WINDOWS_11_FIRST_BUILD: u32 = 22000;
}

/// Polling limits (seconds, one check per second)
pub mod timeouts {
    pub const SWITCH_SECS: u64 = 10;
    pub const DETECTION_SECS: u64 = 5;
    pub const MIN_SECS: u64 = 1;
    pub const MAX_SECS: u64 = 60;
}

/// Environment variables read at startup
pub mod env {
    /// Suppresses reboot, shutdown and display switch invocations
    pub const DRY_RUN: &str = "NO_REBOOT_ACTION";

    /// Overrides the platform state directory
    pub const STATE_DIR: &str = "NEXT_BOOT_STATE_DIR";

    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// Settings file location
pub mod config {
    pub const APP_DIR: &str = "next-boot";
    pub const FILENAME: &str = "settings.json";
}

/// Process exit codes chosen by the top-level error boundary
pub mod exit {
    pub const IO: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const CONFIGURATION: u8 = 3;
    pub const CAPABILITY: u8 = 4;
    pub const DETECTION: u8 = 5;
}
