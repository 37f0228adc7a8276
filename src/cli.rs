//! Command line surface

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::timeouts;
use crate::error::{Error, Result};
use crate::script::Script;
use crate::types::{
    Display, OperatingSystem, OptionValue, RebootAction, SetOrUnset, SwitchToDisplay,
};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Choose the next boot operating system and Windows display",
    long_about = None
)]
pub struct Cli {
    /// Directory holding grubenv and the properties files
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Report reboot, shutdown and display switches without running them
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the next boot OS, the next Windows display and the current display
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run a script given as tokens, e.g. `windows tv reboot`
    #[command(after_help = TOKEN_HELP)]
    Run {
        #[arg(required = true, value_name = "TOKEN")]
        tokens: Vec<ScriptToken>,
    },

    /// Run a script given as JSON
    Apply {
        /// e.g. {"nextBootOperatingSystem": "windows", "rebootAction": "reboot"}
        json: String,
    },

    /// List the predefined scripts of this OS
    Scripts,

    /// Run predefined script N (see `scripts`)
    Script { number: usize },

    /// Learn the boot entries (Linux) or the display identifiers (Windows)
    Configure {
        /// Display in use right now (Windows only)
        display: Option<Display>,

        #[arg(long, value_name = "PATH")]
        grub_cfg: Option<PathBuf>,

        /// Seconds each detection attempt waits for the display to change
        #[arg(
            long,
            value_name = "SECS",
            value_parser = clap::value_parser!(u64).range(timeouts::MIN_SECS..=timeouts::MAX_SECS)
        )]
        timeout: Option<u64>,
    },
}

const TOKEN_HELP: &str = "\
Tokens:
  [os:]windows | [os:]linux | os:unset
  [display:]monitor | [display:]tv | display:unset
  switch | switch:other | switch:monitor | switch:tv | switch:saved
  reboot | shutdown";

/// One `run` argument, setting a single script field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptToken {
    OperatingSystem(SetOrUnset<OperatingSystem>),
    Display(SetOrUnset<Display>),
    Switch(SwitchToDisplay),
    Action(RebootAction),
}

impl FromStr for ScriptToken {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix("os:") {
            return value.parse().map(ScriptToken::OperatingSystem);
        }
        if let Some(value) = s.strip_prefix("display:") {
            return value.parse().map(ScriptToken::Display);
        }
        if let Some(value) = s.strip_prefix("switch:") {
            return value.parse().map(ScriptToken::Switch);
        }
        if s == "switch" {
            return Ok(ScriptToken::Switch(SwitchToDisplay::Other));
        }

        if let Some(os) = OperatingSystem::from_option_str(s) {
            Ok(ScriptToken::OperatingSystem(SetOrUnset::Set(os)))
        } else if let Some(display) = Display::from_option_str(s) {
            Ok(ScriptToken::Display(SetOrUnset::Set(display)))
        } else if let Some(action) = RebootAction::from_option_str(s) {
            Ok(ScriptToken::Action(action))
        } else {
            Err(format!("unknown script token '{s}'"))
        }
    }
}

impl Script {
    /// Fold tokens into a script; each field may be given once
    pub fn from_tokens(tokens: &[ScriptToken]) -> Result<Self> {
        let mut script = Script::new();
        for &token in tokens {
            let duplicate = match token {
                ScriptToken::OperatingSystem(v) => set_once(
                    &mut script.next_boot_operating_system,
                    v,
                    "next boot operating system",
                ),
                ScriptToken::Display(v) => {
                    set_once(&mut script.next_windows_boot_display, v, "next Windows boot display")
                }
                ScriptToken::Switch(v) => {
                    set_once(&mut script.switch_to_display, v, "display switch")
                }
                ScriptToken::Action(v) => set_once(&mut script.reboot_action, v, "reboot action"),
            };
            if let Some(field) = duplicate {
                return Err(Error::InvalidScript(format!("{field} given more than once")));
            }
        }
        Ok(script)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Option<&'static str> {
    if slot.is_some() {
        return Some(field);
    }
    *slot = Some(value);
    None
}
