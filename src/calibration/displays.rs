//! Display detection: learns which switch argument and device id belong to
//! each display by toggling and watching the active device id.

use std::path::Path;
use tracing::{info, warn};

use crate::config::ConfigMappingWriter;
use crate::display::{switch_and_wait, DisplaySwitch};
use crate::error::{Error, Result};
use crate::types::{Display, OptionValue};

/// Switch argument and device id learned for one display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub display: Display,
    pub switch_arg: String,
    pub device_id: String,
}

/// Outcome of a successful detection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCalibration {
    pub initial: DisplayIdentity,
    pub other: DisplayIdentity,
}

/// Try both `candidates` starting from `initial`, then switch back
///
/// The first candidate that changes the device id reaches the other display;
/// the remaining one reaches `initial`. Nothing is persisted here.
pub fn detect_displays(
    switch: &dyn DisplaySwitch,
    initial: Display,
    candidates: &[String; 2],
    timeout_secs: u64,
) -> Result<DisplayCalibration> {
    let initial_id = switch.active_device_id()?;
    info!(display = initial.as_str(), device_id = %initial_id, "Starting display detection");

    let [first, second] = candidates;
    let (other_arg, initial_arg) = if switch_and_wait(switch, first, timeout_secs)? {
        (first, second)
    } else if switch_and_wait(switch, second, timeout_secs)? {
        (second, first)
    } else {
        warn!(?candidates, "Neither switch argument changed the display");
        return Err(Error::DetectionFailed {
            stage: "trying the switch arguments",
        });
    };
    let other_id = switch.active_device_id()?;
    info!(arg = %other_arg, device_id = %other_id, "Reached the other display");

    if !switch_and_wait(switch, initial_arg, timeout_secs)? {
        return Err(Error::DetectionFailed {
            stage: "restoring the initial display",
        });
    }

    Ok(DisplayCalibration {
        initial: DisplayIdentity {
            display: initial,
            switch_arg: initial_arg.clone(),
            device_id: initial_id,
        },
        other: DisplayIdentity {
            display: initial.other(),
            switch_arg: other_arg.clone(),
            device_id: other_id,
        },
    })
}

/// Run the detection and persist `deviceId` and `displaySwitchArg` for both displays
pub fn configure_displays(
    switch: &dyn DisplaySwitch,
    initial: Display,
    candidates: &[String; 2],
    timeout_secs: u64,
    state_dir: &Path,
) -> Result<DisplayCalibration> {
    let calibration = detect_displays(switch, initial, candidates, timeout_secs)?;

    let mut writer = ConfigMappingWriter::load(state_dir)?;
    for identity in [&calibration.initial, &calibration.other] {
        writer.set_device_id(identity.display, &identity.device_id);
        writer.set_display_switch_arg(identity.display, &identity.switch_arg);
    }
    writer.save()?;
    info!(path = %state_dir.display(), "Saved display configuration");

    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::files;
    use crate::test_support::{FakeDisplay, TempStateDir};

    fn legacy() -> [String; 2] {
        ["/internal".to_string(), "/external".to_string()]
    }

    #[test]
    fn test_first_switch_arg_reaches_other_display() {
        let display = FakeDisplay::new("DEV-MON")
            .on("/internal", "DEV-TV")
            .on("/external", "DEV-MON");

        let calibration = detect_displays(&display, Display::Monitor, &legacy(), 5).unwrap();

        assert_eq!(calibration.other.display, Display::Tv);
        assert_eq!(calibration.other.switch_arg, "/internal");
        assert_eq!(calibration.other.device_id, "DEV-TV");
        assert_eq!(calibration.initial.switch_arg, "/external");
        assert_eq!(calibration.initial.device_id, "DEV-MON");
        assert_eq!(display.invoked(), vec!["/internal", "/external"]);
        assert_eq!(display.active(), "DEV-MON");
    }

    #[test]
    fn test_second_switch_arg_reaches_other_display() {
        // "/internal" targets the monitor, which is already active
        let dir = TempStateDir::new();
        let display = FakeDisplay::new("DEV-MON")
            .on("/internal", "DEV-MON")
            .on("/external", "DEV-TV")
            .with_delay(2);

        let calibration =
            configure_displays(&display, Display::Monitor, &legacy(), 5, dir.path()).unwrap();

        assert_eq!(calibration.other.switch_arg, "/external");
        assert_eq!(calibration.initial.switch_arg, "/internal");
        assert_eq!(display.invoked(), vec!["/internal", "/external", "/internal"]);
        assert_eq!(display.active(), "DEV-MON");
        assert_eq!(
            dir.read(files::CONFIGS).unwrap(),
            "monitor.deviceId=DEV-MON\nmonitor.displaySwitchArg=/internal\n\
             tv.deviceId=DEV-TV\ntv.displaySwitchArg=/external\n"
        );
    }

    #[test]
    fn test_no_change_on_either_switch_arg_persists_nothing() {
        let dir = TempStateDir::new();
        dir.write(files::CONFIGS, "linux.grubEntry=gnulinux\n");
        let display = FakeDisplay::new("DEV-MON");

        let err = configure_displays(&display, Display::Tv, &legacy(), 3, dir.path()).unwrap_err();

        assert!(matches!(err, Error::DetectionFailed { stage } if stage.starts_with("trying")));
        assert_eq!(display.ticks.get(), 6);
        assert_eq!(dir.read(files::CONFIGS).unwrap(), "linux.grubEntry=gnulinux\n");
    }

    #[test]
    fn test_unconfirmed_restore_persists_nothing() {
        let dir = TempStateDir::new();
        let display = FakeDisplay::new("DEV-TV").on("1", "DEV-MON");
        let candidates = ["1".to_string(), "4".to_string()];

        let err =
            configure_displays(&display, Display::Tv, &candidates, 2, dir.path()).unwrap_err();

        assert!(matches!(err, Error::DetectionFailed { stage } if stage.starts_with("restoring")));
        assert!(dir.read(files::CONFIGS).is_none());
    }
}
