//! Boot entry discovery from `grub.cfg`

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ConfigMappingWriter;
use crate::error::{ConfigError, Error, Result};
use crate::types::{OperatingSystem, OptionValue};

/// Boot entry id of every OS named in the top-level `menuentry` lines
///
/// Later entries for the same OS win.
pub fn scan_menu_entries(grub_cfg: &str) -> HashMap<OperatingSystem, String> {
    let mut entries = HashMap::new();
    for line in grub_cfg.lines().filter(|line| line.starts_with("menuentry ")) {
        let os = OperatingSystem::ALL
            .iter()
            .copied()
            .find(|os| line.contains(os.as_str()));
        if let (Some(os), Some(id)) = (os, entry_id(line)) {
            debug!(os = os.as_str(), id, "Found boot entry");
            entries.insert(os, id.to_string());
        }
    }
    entries
}

/// Last `'id'` directly followed by `{`, with `id` made of `[A-Za-z0-9_-]`
fn entry_id(line: &str) -> Option<&str> {
    line.match_indices('{').rev().find_map(|(brace, _)| {
        let before = line[..brace].trim_end();
        let quoted = before.strip_suffix('\'')?;
        let start = quoted.rfind('\'')? + 1;
        let id = &quoted[start..];
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then_some(id)
    })
}

/// Read `grub_cfg` and persist `<os>.grubEntry` for every OS
///
/// Nothing is written unless both entries are found.
pub fn configure_grub_entries(
    grub_cfg: &Path,
    state_dir: &Path,
) -> Result<HashMap<OperatingSystem, String>> {
    info!(path = %grub_cfg.display(), "Reading boot entries");
    let contents = fs::read_to_string(grub_cfg).map_err(|e| Error::io(grub_cfg, e))?;
    let entries = scan_menu_entries(&contents);

    let mut writer = ConfigMappingWriter::load(state_dir)?;
    for &os in OperatingSystem::ALL {
        let entry = entries.get(&os).ok_or_else(|| ConfigError::GrubEntryNotFound {
            os,
            grub_cfg: grub_cfg.to_path_buf(),
        })?;
        writer.set_grub_entry(os, entry);
    }
    writer.save()?;
    Ok(entries)
}
