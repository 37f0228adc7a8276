//! Portable option values shared by the stores, the script and the CLI

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A closed set of values with a stable lowercase spelling
///
/// The spelling is used in configuration keys, the options file and
/// script input.
pub trait OptionValue: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Human-readable label used in messages
    fn label(self) -> &'static str;

    fn from_option_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    Windows,
    Linux,
}

impl OptionValue for OperatingSystem {
    const ALL: &'static [Self] = &[OperatingSystem::Windows, OperatingSystem::Linux];

    fn as_str(self) -> &'static str {
        match self {
            OperatingSystem::Windows => "windows",
            OperatingSystem::Linux => "linux",
        }
    }

    fn label(self) -> &'static str {
        match self {
            OperatingSystem::Windows => "Windows",
            OperatingSystem::Linux => "Linux",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Monitor,
    Tv,
}

impl Display {
    /// The display that is not `self`
    pub fn other(self) -> Display {
        match self {
            Display::Monitor => Display::Tv,
            Display::Tv => Display::Monitor,
        }
    }
}

impl OptionValue for Display {
    const ALL: &'static [Self] = &[Display::Monitor, Display::Tv];

    fn as_str(self) -> &'static str {
        match self {
            Display::Monitor => "monitor",
            Display::Tv => "tv",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Display::Monitor => "monitor",
            Display::Tv => "TV",
        }
    }
}

impl FromStr for Display {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Display::from_option_str(s)
            .ok_or_else(|| format!("unknown display '{s}' (expected {})", expected::<Display>(&[])))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebootAction {
    Reboot,
    Shutdown,
}

impl OptionValue for RebootAction {
    const ALL: &'static [Self] = &[RebootAction::Reboot, RebootAction::Shutdown];

    fn as_str(self) -> &'static str {
        match self {
            RebootAction::Reboot => "reboot",
            RebootAction::Shutdown => "shutdown",
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }
}

/// Sentinel spelling of [`SetOrUnset::Unset`]
pub const UNSET: &str = "unset";

/// A requested change to a persisted value
///
/// A field that is absent from a script is `None`; `Some(Unset)` clears
/// the value and `Some(Set(v))` stores `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOrUnset<T> {
    Set(T),
    Unset,
}

impl<T: Copy> SetOrUnset<T> {
    pub fn to_option(self) -> Option<T> {
        match self {
            SetOrUnset::Set(value) => Some(value),
            SetOrUnset::Unset => None,
        }
    }
}

impl<T: OptionValue> fmt::Display for SetOrUnset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOrUnset::Set(value) => f.write_str(value.as_str()),
            SetOrUnset::Unset => f.write_str(UNSET),
        }
    }
}

impl<T: OptionValue> FromStr for SetOrUnset<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNSET {
            return Ok(SetOrUnset::Unset);
        }
        T::from_option_str(s)
            .map(SetOrUnset::Set)
            .ok_or_else(|| format!("unknown value '{s}' (expected {})", expected::<T>(&[UNSET])))
    }
}

impl<T: OptionValue> Serialize for SetOrUnset<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: OptionValue> Deserialize<'de> for SetOrUnset<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Where an immediate display switch should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchToDisplay {
    /// Whichever display is not current
    Other,
    Display(Display),
    /// The persisted next Windows boot display, consumed on use
    Saved,
}

impl fmt::Display for SwitchToDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchToDisplay::Other => f.write_str("other"),
            SwitchToDisplay::Display(display) => f.write_str(display.as_str()),
            SwitchToDisplay::Saved => f.write_str("saved"),
        }
    }
}

impl FromStr for SwitchToDisplay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "other" => Ok(SwitchToDisplay::Other),
            "saved" => Ok(SwitchToDisplay::Saved),
            _ => Display::from_option_str(s).map(SwitchToDisplay::Display).ok_or_else(|| {
                format!(
                    "unknown display switch '{s}' (expected {})",
                    expected::<Display>(&["other", "saved"])
                )
            }),
        }
    }
}

impl Serialize for SwitchToDisplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SwitchToDisplay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn expected<T: OptionValue>(extra: &[&str]) -> String {
    T::ALL
        .iter()
        .map(|v| v.as_str())
        .chain(extra.iter().copied())
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
