//! Next boot OS and next Windows boot display
//!
//! Every operation loads its backing store, applies one change and saves it
//! before returning. The OS lives in the GRUB environment block, the display
//! in the Windows options file.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ConfigMapping;
use crate::constants::{files, keys};
use crate::display::{self, DisplaySwitch};
use crate::error::{Error, Result};
use crate::persistence::{Grubenv, Properties};
use crate::text;
use crate::types::{Display, OperatingSystem, OptionValue};

/// Snapshot shown by `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateValues {
    pub next_boot_operating_system: Option<OperatingSystem>,
    pub next_windows_boot_display: Option<Display>,
    /// Omitted on platforms without display switching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_display: Option<Display>,
}

pub struct BootState<'a> {
    state_dir: PathBuf,
    display: Option<&'a dyn DisplaySwitch>,
    switch_timeout_secs: u64,
}

impl<'a> BootState<'a> {
    pub fn new(
        state_dir: impl Into<PathBuf>,
        display: Option<&'a dyn DisplaySwitch>,
        switch_timeout_secs: u64,
    ) -> Self {
        Self {
            state_dir: state_dir.into(),
            display,
            switch_timeout_secs,
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn configs(&self) -> Result<ConfigMapping> {
        ConfigMapping::load(&self.state_dir)
    }

    fn options(&self) -> Result<Properties> {
        Properties::load(self.state_dir.join(files::OPTIONS))
    }

    pub fn get_next_boot_operating_system(&self) -> Result<Option<OperatingSystem>> {
        let grubenv = Grubenv::load(&self.state_dir)?;
        match grubenv.get(keys::SAVED_ENTRY) {
            Some(grub_entry) => Ok(Some(self.configs()?.os_for_grub_entry(&grub_entry)?)),
            None => Ok(None),
        }
    }

    pub fn set_next_boot_operating_system(&self, os: OperatingSystem) -> Result<()> {
        let grub_entry = self.configs()?.grub_entry(os)?;
        let mut grubenv = Grubenv::load(&self.state_dir)?;
        grubenv.set(keys::SAVED_ENTRY, &grub_entry);
        grubenv.save()?;
        info!(os = os.as_str(), grub_entry = %grub_entry, "Next boot operating system set");
        Ok(())
    }

    pub fn unset_next_boot_operating_system(&self) -> Result<()> {
        let mut grubenv = Grubenv::load(&self.state_dir)?;
        grubenv.clear(keys::SAVED_ENTRY);
        grubenv.save()?;
        info!("Next boot operating system unset");
        Ok(())
    }

    pub fn get_next_windows_boot_display(&self) -> Result<Option<Display>> {
        let options = self.options()?;
        Ok(options.get(keys::WINDOWS_DISPLAY).and_then(|value| {
            let display = Display::from_option_str(value);
            if display.is_none() {
                warn!(
                    value = %value,
                    key = keys::WINDOWS_DISPLAY,
                    "Ignoring unknown display in options file"
                );
            }
            display
        }))
    }

    pub fn set_next_windows_boot_display(&self, next_display: Display) -> Result<()> {
        let mut options = self.options()?;
        options.set(keys::WINDOWS_DISPLAY, next_display.as_str());
        options.save()?;
        info!(display = next_display.as_str(), "Next Windows boot display set");
        Ok(())
    }

    pub fn unset_next_windows_boot_display(&self) -> Result<()> {
        let mut options = self.options()?;
        options.clear(keys::WINDOWS_DISPLAY);
        options.save()?;
        info!("Next Windows boot display unset");
        Ok(())
    }

    /// `None` when the platform cannot tell which display is active
    pub fn get_current_display(&self) -> Result<Option<Display>> {
        let Some(display) = self.display else {
            return Ok(None);
        };
        let device_id = display.active_device_id()?;
        Ok(Some(self.configs()?.display_for_device_id(&device_id)?))
    }

    pub fn supports_display_switch(&self) -> bool {
        self.display.is_some()
    }

    /// Switch to `target` and wait for the device id to change
    pub fn switch_display_to(&self, target: Display) -> Result<()> {
        let display = self
            .display
            .ok_or(Error::CapabilityUnavailable(text::display::SWITCH_NOT_SUPPORTED))?;
        let arg = self.configs()?.display_switch_arg(target)?;

        if display::switch_and_wait(display, &arg, self.switch_timeout_secs)? {
            info!(display = target.as_str(), "Display switched");
            Ok(())
        } else {
            Err(Error::SwitchTimedOut {
                display: target,
                seconds: self.switch_timeout_secs,
            })
        }
    }

    pub fn values(&self) -> Result<StateValues> {
        Ok(StateValues {
            next_boot_operating_system: self.get_next_boot_operating_system()?,
            next_windows_boot_display: self.get_next_windows_boot_display()?,
            current_display: self.get_current_display()?,
        })
    }
}
