//! Fakes and fixtures shared by the unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::display::DisplaySwitch;
use crate::error::{Error, Result};
use crate::platform::{Host, PredefinedScript};
use crate::types::RebootAction;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Temporary state directory removed on drop
pub struct TempStateDir {
    path: PathBuf,
}

impl TempStateDir {
    pub fn new() -> Self {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("next-boot-test-{}-{n}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path.join(name), content).unwrap();
    }

    pub fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.path.join(name)).ok()
    }
}

impl Drop for TempStateDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Display switch whose device id changes are scripted per argument
///
/// `invoke_switch(arg)` schedules the id mapped to `arg`; the change becomes
/// visible after `delay_ticks` calls to `wait_tick`. Arguments without a
/// mapping, or mapped to the current id, produce no change.
pub struct FakeDisplay {
    active: RefCell<String>,
    responses: HashMap<String, String>,
    pending: RefCell<Option<(String, u64)>>,
    delay_ticks: u64,
    pub invoked: RefCell<Vec<String>>,
    pub ticks: Cell<u64>,
}

impl FakeDisplay {
    pub fn new(active: &str) -> Self {
        Self {
            active: RefCell::new(active.to_string()),
            responses: HashMap::new(),
            pending: RefCell::new(None),
            delay_ticks: 1,
            invoked: RefCell::new(Vec::new()),
            ticks: Cell::new(0),
        }
    }

    /// Switching with `arg` makes `device_id` active
    pub fn on(mut self, arg: &str, device_id: &str) -> Self {
        self.responses.insert(arg.to_string(), device_id.to_string());
        self
    }

    pub fn with_delay(mut self, ticks: u64) -> Self {
        self.delay_ticks = ticks;
        self
    }

    pub fn active(&self) -> String {
        self.active.borrow().clone()
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invoked.borrow().clone()
    }
}

impl DisplaySwitch for FakeDisplay {
    fn active_device_id(&self) -> Result<String> {
        Ok(self.active())
    }

    fn invoke_switch(&self, arg: &str) -> Result<()> {
        self.invoked.borrow_mut().push(arg.to_string());
        *self.pending.borrow_mut() = self
            .responses
            .get(arg)
            .map(|id| (id.clone(), self.delay_ticks));
        Ok(())
    }

    fn wait_tick(&self) {
        self.ticks.set(self.ticks.get() + 1);
        let mut pending = self.pending.borrow_mut();
        let due = match pending.as_mut() {
            Some((_, remaining)) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if due {
            if let Some((id, _)) = pending.take() {
                *self.active.borrow_mut() = id;
            }
        }
    }
}

/// Host recording reboot actions instead of running them
#[derive(Default)]
pub struct FakeHost {
    pub display: Option<FakeDisplay>,
    pub actions: RefCell<Vec<RebootAction>>,
    pub fail_actions: bool,
}

impl FakeHost {
    pub fn with_display(display: FakeDisplay) -> Self {
        Self {
            display: Some(display),
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<RebootAction> {
        self.actions.borrow().clone()
    }
}

impl Host for FakeHost {
    fn state_dir(&self) -> PathBuf {
        PathBuf::from("/nonexistent")
    }

    fn icon(&self) -> &'static str {
        "icon.png"
    }

    fn predefined_scripts(&self) -> Vec<PredefinedScript> {
        Vec::new()
    }

    fn run_reboot_action(&self, action: RebootAction) -> Result<()> {
        if self.fail_actions {
            return Err(Error::Launch {
                program: "fake".to_string(),
                source: std::io::Error::other("refused"),
            });
        }
        self.actions.borrow_mut().push(action);
        Ok(())
    }

    fn display_switch(&self) -> Option<&dyn DisplaySwitch> {
        self.display.as_ref().map(|d| d as &dyn DisplaySwitch)
    }
}
