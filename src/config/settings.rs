//! User settings for the tool itself
//!
//! Optional JSON file under the user's config directory. Every field has a
//! default so a missing file, or a partial one, is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::{self, timeouts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Replaces the platform state directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    /// Seconds to wait for a requested display switch to show up
    #[serde(default = "default_switch_timeout")]
    pub switch_timeout_secs: u64,

    /// Seconds each calibration attempt waits for a display change
    #[serde(default = "default_detection_timeout")]
    pub detection_timeout_secs: u64,

    #[serde(default = "default_display_switch_command")]
    pub display_switch_command: String,

    /// Helper printing the active display device id on stdout
    #[serde(default = "default_active_display_command")]
    pub active_display_command: String,

    /// Candidate `DisplaySwitch.exe` arguments; detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_switch_args: Option<[String; 2]>,
}

fn default_switch_timeout() -> u64 {
    timeouts::SWITCH_SECS
}

fn default_detection_timeout() -> u64 {
    timeouts::DETECTION_SECS
}

fn default_display_switch_command() -> String {
    constants::programs::DISPLAY_SWITCH.to_string()
}

fn default_active_display_command() -> String {
    constants::programs::ACTIVE_DISPLAY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: None,
            switch_timeout_secs: default_switch_timeout(),
            detection_timeout_secs: default_detection_timeout(),
            display_switch_command: default_display_switch_command(),
            active_display_command: default_active_display_command(),
            display_switch_args: None,
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load from [`Settings::path`], falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            info!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default().with_env_overrides(|key| std::env::var_os(key)));
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings.with_env_overrides(|key| std::env::var_os(key)))
    }

    fn from_json(contents: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(contents)?;
        settings.validate_and_clamp();
        Ok(settings)
    }

    /// Apply `NEXT_BOOT_STATE_DIR` as looked up by `var`
    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<OsString>) -> Self {
        if let Some(dir) = var(constants::env::STATE_DIR) {
            info!(state_dir = ?dir, "State directory overridden from environment");
            self.state_dir = Some(PathBuf::from(dir));
        }
        self
    }

    fn validate_and_clamp(&mut self) {
        self.switch_timeout_secs = clamp_timeout("switchTimeoutSecs", self.switch_timeout_secs);
        self.detection_timeout_secs =
            clamp_timeout("detectionTimeoutSecs", self.detection_timeout_secs);

        if let Some(args) = &self.display_switch_args {
            if args[0] == args[1] || args.iter().any(|a| a.trim().is_empty()) {
                warn!(
                    args = ?args,
                    "displaySwitchArgs must be two distinct arguments, detecting instead"
                );
                self.display_switch_args = None;
            }
        }
    }
}

fn clamp_timeout(name: &str, secs: u64) -> u64 {
    let clamped = secs.clamp(timeouts::MIN_SECS, timeouts::MAX_SECS);
    if clamped != secs {
        warn!(setting = name, value = secs, using = clamped, "Timeout out of range, clamping");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.switch_timeout_secs, 10);
        assert_eq!(settings.detection_timeout_secs, 5);
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "stateDir": "/tmp/state",
            "detectionTimeoutSecs": 8,
            "displaySwitchArgs": ["1", "4"]
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.state_dir, Some(PathBuf::from("/tmp/state")));
        assert_eq!(settings.detection_timeout_secs, 8);
        assert_eq!(settings.display_switch_args, Some(["1".to_string(), "4".to_string()]));
    }

    #[test]
    fn test_timeouts_are_clamped() {
        let json = r#"{"switchTimeoutSecs": 0, "detectionTimeoutSecs": 600}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.switch_timeout_secs, timeouts::MIN_SECS);
        assert_eq!(settings.detection_timeout_secs, timeouts::MAX_SECS);
    }

    #[test]
    fn test_duplicate_switch_args_are_dropped() {
        let settings = Settings::from_json(r#"{"displaySwitchArgs": ["1", "1"]}"#).unwrap();
        assert_eq!(settings.display_switch_args, None);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json(r#"{"switchTimeoutSecs": "soon"}"#).is_err());
    }

    #[test]
    fn test_state_dir_env_override() {
        let settings = Settings::default().with_env_overrides(|key| {
            (key == constants::env::STATE_DIR).then(|| OsString::from("/srv/grubenv.dir"))
        });
        assert_eq!(settings.state_dir, Some(PathBuf::from("/srv/grubenv.dir")));

        let untouched = Settings::default().with_env_overrides(|_| None);
        assert_eq!(untouched.state_dir, None);
    }
}
