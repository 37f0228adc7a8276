use std::path::PathBuf;

use crate::config::Settings;
use crate::constants::{paths, programs};
use crate::display::DisplaySwitch;
use crate::error::Result;
use crate::script::Script;
use crate::types::{Display, OperatingSystem, RebootAction, SetOrUnset};

use super::{run_program, Host, PredefinedScript};

const PREDEFINED_SCRIPTS: [PredefinedScript; 2] = [
    PredefinedScript {
        label: "Reboot into Windows using the monitor",
        script: reboot_into_windows_with(Display::Monitor),
    },
    PredefinedScript {
        label: "Reboot into Windows using the TV",
        script: reboot_into_windows_with(Display::Tv),
    },
];

const fn reboot_into_windows_with(display: Display) -> Script {
    Script {
        next_boot_operating_system: Some(SetOrUnset::Set(OperatingSystem::Windows)),
        next_windows_boot_display: Some(SetOrUnset::Set(display)),
        reboot_action: Some(RebootAction::Reboot),
        ..Script::new()
    }
}

/// systemd-managed Linux; no display switching
#[derive(Debug)]
pub struct LinuxHost {
    state_dir: PathBuf,
}

impl LinuxHost {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state_dir: settings
                .state_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(paths::LINUX_STATE_DIR)),
        }
    }
}

impl Host for LinuxHost {
    fn state_dir(&self) -> PathBuf {
        self.state_dir.clone()
    }

    fn icon(&self) -> &'static str {
        "icon.png"
    }

    fn predefined_scripts(&self) -> Vec<PredefinedScript> {
        PREDEFINED_SCRIPTS.to_vec()
    }

    fn run_reboot_action(&self, action: RebootAction) -> Result<()> {
        let command = match action {
            RebootAction::Reboot => "reboot",
            RebootAction::Shutdown => "poweroff",
        };
        run_program(programs::SYSTEMCTL, &[command])
    }

    fn display_switch(&self) -> Option<&dyn DisplaySwitch> {
        None
    }
}
