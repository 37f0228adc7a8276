//! Declarative boot/display intent and the executor applying it

use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

use crate::error::{Error, Result};
use crate::platform::Host;
use crate::state::BootState;
use crate::text;
use crate::types::{Display, OperatingSystem, RebootAction, SetOrUnset, SwitchToDisplay};

/// Desired state delta, consumed by one [`ScriptExecutor::execute`] call
///
/// Absent fields leave the corresponding state alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_boot_operating_system: Option<SetOrUnset<OperatingSystem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_windows_boot_display: Option<SetOrUnset<Display>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_to_display: Option<SwitchToDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reboot_action: Option<RebootAction>,
}

impl Script {
    pub const fn new() -> Self {
        Self {
            next_boot_operating_system: None,
            next_windows_boot_display: None,
            switch_to_display: None,
            reboot_action: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }
}

/// Applies a [`Script`] in a fixed order: OS, display, switch, action
///
/// Each step persists before the next one starts, so a failure leaves the
/// earlier steps applied.
pub struct ScriptExecutor<'a, W: Write> {
    state: BootState<'a>,
    host: &'a dyn Host,
    dry_run: bool,
    out: W,
}

impl<'a, W: Write> ScriptExecutor<'a, W> {
    pub fn new(state: BootState<'a>, host: &'a dyn Host, dry_run: bool, out: W) -> Self {
        Self {
            state,
            host,
            dry_run,
            out,
        }
    }

    pub fn execute(&mut self, script: &Script) -> Result<()> {
        info!(script = ?script, dry_run = self.dry_run, "Executing script");

        if let Some(option) = script.next_boot_operating_system {
            match option {
                SetOrUnset::Set(os) => self.state.set_next_boot_operating_system(os)?,
                SetOrUnset::Unset => self.state.unset_next_boot_operating_system()?,
            }
            self.say(&text::was_updated_to(
                text::operating_system::ON_NEXT_BOOT,
                option.to_option(),
                text::operating_system::UNDEFINED,
            ))?;
        }

        if let Some(option) = script.next_windows_boot_display {
            match option {
                SetOrUnset::Set(display) => self.state.set_next_windows_boot_display(display)?,
                SetOrUnset::Unset => self.state.unset_next_windows_boot_display()?,
            }
            self.say(&text::was_updated_to(
                text::display::ON_NEXT_WINDOWS_BOOT,
                option.to_option(),
                text::display::UNDEFINED,
            ))?;
        }

        if let Some(switch_to) = script.switch_to_display {
            self.apply_switch_to_display(switch_to)?;
        }

        if let Some(action) = script.reboot_action {
            self.apply_reboot_action(action)?;
        }

        Ok(())
    }

    fn apply_switch_to_display(&mut self, switch_to: SwitchToDisplay) -> Result<()> {
        let current = self
            .state
            .get_current_display()?
            .ok_or(Error::CapabilityUnavailable(text::display::SWITCH_NOT_SUPPORTED))?;

        match switch_to {
            SwitchToDisplay::Other => self.switch_display_to(current.other()),
            SwitchToDisplay::Display(target) if target == current => self.say(&format!(
                "{} {}.",
                text::value_text(Some(target), text::display::UNDEFINED),
                text::display::IS_ALREADY_CURRENT
            )),
            SwitchToDisplay::Display(target) => self.switch_display_to(target),
            SwitchToDisplay::Saved => match self.state.get_next_windows_boot_display()? {
                None => self.say(&format!(
                    "{} is {}.",
                    text::display::ON_NEXT_WINDOWS_BOOT,
                    text::display::UNDEFINED
                )),
                Some(target) if target == current => self.say(&format!(
                    "{} is {}, which {}.",
                    text::display::ON_NEXT_WINDOWS_BOOT,
                    text::value_text(Some(target), text::display::UNDEFINED),
                    text::display::IS_ALREADY_CURRENT
                )),
                Some(target) => {
                    self.switch_display_to(target)?;
                    self.state.unset_next_windows_boot_display()?;
                    self.say(&text::was_updated_to::<Display>(
                        text::display::ON_NEXT_WINDOWS_BOOT,
                        None,
                        text::display::UNDEFINED,
                    ))
                }
            },
        }
    }

    fn switch_display_to(&mut self, target: Display) -> Result<()> {
        self.say(&format!(
            "{} {}...",
            text::display::SWITCHING_TO,
            text::value_text(Some(target), text::display::UNDEFINED)
        ))?;
        if self.dry_run {
            return self.say(text::NOT_REALLY);
        }
        self.state.switch_display_to(target)
    }

    fn apply_reboot_action(&mut self, action: RebootAction) -> Result<()> {
        self.say(match action {
            RebootAction::Reboot => text::reboot_action::REBOOTING,
            RebootAction::Shutdown => text::reboot_action::SHUTTING_DOWN,
        })?;
        if self.dry_run {
            return self.say(text::NOT_REALLY);
        }
        self.host.run_reboot_action(action)
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}").map_err(|e| Error::io("<stdout>", e))
    }
}
