use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::constants::{paths, programs, switch_args};
use crate::display::DisplaySwitch;
use crate::error::Result;
use crate::script::Script;
use crate::types::{OperatingSystem, RebootAction, SetOrUnset};

use super::{program_output, run_program, Host, PredefinedScript};

const PREDEFINED_SCRIPTS: [PredefinedScript; 1] = [PredefinedScript {
    label: "Reboot into Linux",
    script: Script {
        next_boot_operating_system: Some(SetOrUnset::Set(OperatingSystem::Linux)),
        reboot_action: Some(RebootAction::Reboot),
        ..Script::new()
    },
}];

/// Windows with `DisplaySwitch.exe` and a device id helper
#[derive(Debug)]
pub struct WindowsHost {
    state_dir: PathBuf,
    display: WindowsDisplaySwitch,
    switch_args: Option<[String; 2]>,
}

impl WindowsHost {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state_dir: settings
                .state_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(paths::WINDOWS_STATE_DIR)),
            display: WindowsDisplaySwitch {
                switch_command: settings.display_switch_command.clone(),
                active_display_command: settings.active_display_command.clone(),
            },
            switch_args: settings.display_switch_args.clone(),
        }
    }

    /// The two `DisplaySwitch.exe` arguments tried during calibration
    pub fn switch_arg_candidates(&self) -> [String; 2] {
        if let Some(args) = &self.switch_args {
            return args.clone();
        }

        let build = program_output(programs::CMD, &["/C", "ver"])
            .inspect_err(|e| warn!(error = %e, "Cannot query Windows version"))
            .ok()
            .and_then(|ver| parse_build_number(&ver));
        debug!(build = ?build, "Detected Windows build");

        candidates_for_build(build).map(str::to_string)
    }
}

fn candidates_for_build(build: Option<u32>) -> [&'static str; 2] {
    match build {
        Some(build) if build >= switch_args::WINDOWS_11_FIRST_BUILD => switch_args::WINDOWS_11,
        _ => switch_args::LEGACY,
    }
}

/// Build number from `ver` output, e.g. `Microsoft Windows [Version 10.0.22631.2428]`
fn parse_build_number(ver: &str) -> Option<u32> {
    let start = ver.find("[Version ")? + "[Version ".len();
    let version = &ver[start..];
    let version = &version[..version.find(']')?];
    version.split('.').nth(2)?.trim().parse().ok()
}

impl Host for WindowsHost {
    fn state_dir(&self) -> PathBuf {
        self.state_dir.clone()
    }

    fn icon(&self) -> &'static str {
        "icon.ico"
    }

    fn predefined_scripts(&self) -> Vec<PredefinedScript> {
        PREDEFINED_SCRIPTS.to_vec()
    }

    fn run_reboot_action(&self, action: RebootAction) -> Result<()> {
        let mode = match action {
            RebootAction::Reboot => "/g",
            RebootAction::Shutdown => "/sg",
        };
        run_program(programs::SHUTDOWN, &[mode, "/t", "0"])
    }

    fn display_switch(&self) -> Option<&dyn DisplaySwitch> {
        Some(&self.display)
    }
}

#[derive(Debug)]
struct WindowsDisplaySwitch {
    switch_command: String,
    active_display_command: String,
}

impl DisplaySwitch for WindowsDisplaySwitch {
    fn active_device_id(&self) -> Result<String> {
        program_output(&self.active_display_command, &[])
    }

    fn invoke_switch(&self, arg: &str) -> Result<()> {
        run_program(&self.switch_command, &[arg])
    }
}
