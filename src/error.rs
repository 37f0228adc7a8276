//! Provides [`Error`], the failure taxonomy of every core operation

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::constants::exit;
use crate::types::{Display, OperatingSystem, OptionValue};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A required mapping is missing or does not match the machine.
///
/// `configured_on` names the OS whose `configure` step writes the mapping.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration '{key}' not found. Run 'next-boot configure' on {}",
        configured_on.label()
    )]
    MissingKey {
        key: String,
        configured_on: OperatingSystem,
    },

    #[error(
        "No '{attribute}' configuration has value '{value}'. Run 'next-boot configure' on {}",
        configured_on.label()
    )]
    UnknownValue {
        attribute: &'static str,
        value: String,
        configured_on: OperatingSystem,
    },

    #[error("No boot entry for {} found in {}", os.label(), grub_cfg.display())]
    GrubEntryNotFound { os: OperatingSystem, grub_cfg: PathBuf },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    CapabilityUnavailable(&'static str),

    /// Calibration saw no device id change
    #[error("Display detection failed: no display change observed while {stage}")]
    DetectionFailed { stage: &'static str },

    #[error("The display did not switch to {} within {seconds}s", display.label())]
    SwitchTimedOut { display: Display, seconds: u64 },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GRUB environment block would be {size} bytes (limit {limit})")]
    GrubenvTooLarge { size: usize, limit: usize },

    #[error("Failed to start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' failed ({status})")]
    ActionFailed { program: String, status: ExitStatus },

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("{0}")]
    Usage(&'static str),

    #[error(transparent)]
    Settings(#[from] anyhow::Error),
}

/// Coarse classification used by the top-level boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Capability,
    Detection,
    Io,
    Action,
    Usage,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Configuration => exit::CONFIGURATION,
            ErrorKind::Capability => exit::CAPABILITY,
            ErrorKind::Detection => exit::DETECTION,
            ErrorKind::Usage => exit::USAGE,
            ErrorKind::Io | ErrorKind::Action => exit::IO,
        }
    }
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::Settings(_) => ErrorKind::Configuration,
            Error::CapabilityUnavailable(_) => ErrorKind::Capability,
            Error::DetectionFailed { .. } | Error::SwitchTimedOut { .. } => ErrorKind::Detection,
            Error::Io { .. } | Error::GrubenvTooLarge { .. } => ErrorKind::Io,
            Error::Launch { .. } | Error::ActionFailed { .. } => ErrorKind::Action,
            Error::InvalidScript(_) | Error::Usage(_) => ErrorKind::Usage,
        }
    }
}
