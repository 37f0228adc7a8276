//! Machine-specific identifiers for the portable option values
//!
//! Keys follow `<value>.<attribute>` in `my-reboot-configs.properties`,
//! e.g. `windows.grubEntry` or `tv.displaySwitchArg`.

use std::marker::PhantomData;
use std::path::Path;

use crate::constants::{attributes, files};
use crate::error::{ConfigError, Result};
use crate::persistence::Properties;
use crate::types::{Display, OperatingSystem, OptionValue};

/// One attribute mapped for every value of `T`
///
/// `configured_on` is the OS whose `configure` step writes the attribute;
/// it is named in every error so the user knows where to fix it.
#[derive(Debug, Clone, Copy)]
pub struct Attribute<T> {
    name: &'static str,
    configured_on: OperatingSystem,
    _values: PhantomData<T>,
}

pub const GRUB_ENTRY: Attribute<OperatingSystem> =
    Attribute::new(attributes::GRUB_ENTRY, OperatingSystem::Linux);
pub const DEVICE_ID: Attribute<Display> =
    Attribute::new(attributes::DEVICE_ID, OperatingSystem::Windows);
pub const DISPLAY_SWITCH_ARG: Attribute<Display> =
    Attribute::new(attributes::DISPLAY_SWITCH_ARG, OperatingSystem::Windows);

impl<T: OptionValue> Attribute<T> {
    pub const fn new(name: &'static str, configured_on: OperatingSystem) -> Self {
        Self {
            name,
            configured_on,
            _values: PhantomData,
        }
    }

    pub fn key_for(&self, value: T) -> String {
        format!("{}.{}", value.as_str(), self.name)
    }

    pub fn value_for(&self, props: &Properties, value: T) -> Result<String, ConfigError> {
        let key = self.key_for(value);
        match props.get(&key) {
            Some(configured) => Ok(configured.to_string()),
            None => Err(ConfigError::MissingKey {
                key,
                configured_on: self.configured_on,
            }),
        }
    }

    /// Reverse lookup by scanning the values of `T` in order
    ///
    /// Every value scanned before a match must be configured.
    pub fn enum_for_value(&self, props: &Properties, configured: &str) -> Result<T, ConfigError> {
        for &candidate in T::ALL {
            if self.value_for(props, candidate)? == configured {
                return Ok(candidate);
            }
        }

        Err(ConfigError::UnknownValue {
            attribute: self.name,
            value: configured.to_string(),
            configured_on: self.configured_on,
        })
    }

    fn set_value(&self, props: &mut Properties, value: T, configured: &str) {
        props.set(&self.key_for(value), configured);
    }
}

/// Read-only view of the configuration file
#[derive(Debug)]
pub struct ConfigMapping {
    props: Properties,
}

impl ConfigMapping {
    pub fn load(state_dir: &Path) -> Result<Self> {
        let props = Properties::load(state_dir.join(files::CONFIGS))?;
        Ok(Self { props })
    }

    pub fn grub_entry(&self, os: OperatingSystem) -> Result<String, ConfigError> {
        GRUB_ENTRY.value_for(&self.props, os)
    }

    pub fn os_for_grub_entry(&self, grub_entry: &str) -> Result<OperatingSystem, ConfigError> {
        GRUB_ENTRY.enum_for_value(&self.props, grub_entry)
    }

    pub fn display_for_device_id(&self, device_id: &str) -> Result<Display, ConfigError> {
        DEVICE_ID.enum_for_value(&self.props, device_id)
    }

    pub fn display_switch_arg(&self, display: Display) -> Result<String, ConfigError> {
        DISPLAY_SWITCH_ARG.value_for(&self.props, display)
    }
}

/// Writable configuration, only handed out to the `configure` flow
#[derive(Debug)]
pub struct ConfigMappingWriter {
    mapping: ConfigMapping,
}

impl ConfigMappingWriter {
    pub fn load(state_dir: &Path) -> Result<Self> {
        Ok(Self {
            mapping: ConfigMapping::load(state_dir)?,
        })
    }

    pub fn set_grub_entry(&mut self, os: OperatingSystem, grub_entry: &str) {
        GRUB_ENTRY.set_value(&mut self.mapping.props, os, grub_entry);
    }

    pub fn set_device_id(&mut self, display: Display, device_id: &str) {
        DEVICE_ID.set_value(&mut self.mapping.props, display, device_id);
    }

    pub fn set_display_switch_arg(&mut self, display: Display, arg: &str) {
        DISPLAY_SWITCH_ARG.set_value(&mut self.mapping.props, display, arg);
    }

    pub fn save(&self) -> Result<()> {
        self.mapping.props.save()
    }
}
