//! On-disk stores kept in the state directory
//!
//! Both stores are loaded fresh for every query and rewritten on every
//! mutation; nothing is cached across invocations.

pub mod grubenv;
pub mod properties;

pub use grubenv::Grubenv;
pub use properties::Properties;

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Replace `path` with `bytes` via a sibling temp file and a rename
///
/// The parent directory is created when missing.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let mut file = fs::File::create(&tmp_path).map_err(|e| Error::io(&tmp_path, e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| Error::io(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::io(path, e)
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempStateDir;

    #[test]
    fn test_write_atomically_creates_parent_and_replaces() {
        let dir = TempStateDir::new();
        let path = dir.path().join("nested").join("file.txt");

        write_atomically(&path, b"first").unwrap();
        write_atomically(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "temp file left behind: {leftovers:?}");
    }
}
