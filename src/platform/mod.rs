//! Per-OS behavior selected once at startup
//!
//! [`Platform`] is a closed set of providers; everything else talks to it
//! through the [`Host`] capability trait.

mod linux;
mod windows;

pub use linux::LinuxHost;
pub use windows::WindowsHost;

use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tracing::debug;

use crate::config::Settings;
use crate::display::DisplaySwitch;
use crate::error::{Error, Result};
use crate::script::Script;
use crate::types::RebootAction;

/// A script offered as a one-click choice for the current OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedScript {
    pub label: &'static str,
    pub script: Script,
}

pub trait Host {
    /// Directory holding the grubenv, options and configuration files
    fn state_dir(&self) -> PathBuf;

    fn icon(&self) -> &'static str;

    fn predefined_scripts(&self) -> Vec<PredefinedScript>;

    fn run_reboot_action(&self, action: RebootAction) -> Result<()>;

    /// `None` when the OS cannot switch displays
    fn display_switch(&self) -> Option<&dyn DisplaySwitch>;
}

#[derive(Debug)]
pub enum Platform {
    Linux(LinuxHost),
    Windows(WindowsHost),
}

impl Platform {
    /// Provider for the OS this binary runs on
    pub fn detect(settings: &Settings) -> Self {
        if cfg!(windows) {
            Platform::Windows(WindowsHost::new(settings))
        } else {
            Platform::Linux(LinuxHost::new(settings))
        }
    }

    fn host(&self) -> &dyn Host {
        match self {
            Platform::Linux(host) => host,
            Platform::Windows(host) => host,
        }
    }
}

impl Host for Platform {
    fn state_dir(&self) -> PathBuf {
        self.host().state_dir()
    }

    fn icon(&self) -> &'static str {
        self.host().icon()
    }

    fn predefined_scripts(&self) -> Vec<PredefinedScript> {
        self.host().predefined_scripts()
    }

    fn run_reboot_action(&self, action: RebootAction) -> Result<()> {
        self.host().run_reboot_action(action)
    }

    fn display_switch(&self) -> Option<&dyn DisplaySwitch> {
        self.host().display_switch()
    }
}

/// Run `program` to completion, failing on launch errors or a non-zero exit
pub(crate) fn run_program(program: &str, args: &[&str]) -> Result<()> {
    debug!(program, args = ?args, "Running external program");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| Error::Launch {
            program: program.to_string(),
            source,
        })?;
    check_status(program, status)
}

/// Run `program` and return its trimmed stdout
pub(crate) fn program_output(program: &str, args: &[&str]) -> Result<String> {
    debug!(program, args = ?args, "Reading external program output");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| Error::Launch {
            program: program.to_string(),
            source,
        })?;
    check_status(program, output.status)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(Error::ActionFailed {
            program: program.to_string(),
            status,
        })
    }
}
