//! Display switch capability and the bounded confirmation poll

use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::Result;

/// Interval between two device id reads
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Platform support for querying and switching the active display
pub trait DisplaySwitch {
    /// Device id of the display currently in use
    fn active_device_id(&self) -> Result<String>;

    /// Run the external switch with a machine-specific argument
    fn invoke_switch(&self, arg: &str) -> Result<()>;

    /// Wait one poll interval
    fn wait_tick(&self) {
        thread::sleep(POLL_INTERVAL);
    }
}

/// Switch with `arg` and poll until the active device id changes
///
/// Reads the device id once per tick for at most `timeout_secs` ticks. Returns whether a
/// change was observed; the launch itself is never retried.
pub fn switch_and_wait(switch: &dyn DisplaySwitch, arg: &str, timeout_secs: u64) -> Result<bool> {
    let before = switch.active_device_id()?;
    debug!(arg = %arg, device_id = %before, "Invoking display switch");
    switch.invoke_switch(arg)?;

    for tick in 1..=timeout_secs {
        switch.wait_tick();
        let current = switch.active_device_id()?;
        trace!(tick, device_id = %current, "Polled active display");
        if current != before {
            debug!(arg = %arg, from = %before, to = %current, "Display changed");
            return Ok(true);
        }
    }

    debug!(arg = %arg, timeout_secs, "No display change observed");
    Ok(false)
}
