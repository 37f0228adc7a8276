//! Escaped `key=value` files (options and configuration)

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// In-memory view of a properties file
///
/// Values escape a backslash as `\\` on disk. Lines are written sorted so
/// the same logical content always produces the same bytes.
#[derive(Debug)]
pub struct Properties {
    entries: HashMap<String, String>,
    path: PathBuf,
}

impl Properties {
    /// Load `path`, treating a missing file as empty
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => {
                let entries = Self::parse(&contents);
                debug!(path = %path.display(), entries = entries.len(), "Loaded properties");
                entries
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "Properties file not found, proceeding with empty content"
                );
                HashMap::new()
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        Ok(Self { entries, path })
    }

    fn parse(contents: &str) -> HashMap<String, String> {
        contents
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), unescape(value)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn to_file_content(&self) -> String {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{key}={}\n", escape(value)))
            .collect();
        lines.sort();
        lines.concat()
    }

    pub fn save(&self) -> Result<()> {
        super::write_atomically(&self.path, self.to_file_content().as_bytes())
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', r"\\")
}

fn unescape(value: &str) -> String {
    value.replace(r"\\", r"\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempStateDir;

    fn sample() -> Properties {
        Properties {
            entries: HashMap::from([
                ("jjj".to_string(), r"12\3".to_string()),
                ("abc".to_string(), "xyz".to_string()),
            ]),
            path: PathBuf::new(),
        }
    }

    #[test]
    fn test_parse_skips_comments_and_unescapes() {
        let entries =
            Properties::parse("abc=xyz\n#ignored=line\njjj=12\\\\3\r\n=orphan\nnoequals\n");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries["abc"], "xyz");
        assert_eq!(entries["jjj"], r"12\3");
    }

    #[test]
    fn test_value_keeps_everything_after_first_equals() {
        let entries = Properties::parse("a=b=c\n");
        assert_eq!(entries["a"], "b=c");
    }

    #[test]
    fn test_set_and_clear() {
        let mut props = sample();

        props.set("@@@", "###");
        props.set("jjj", "999");
        props.clear("abc");
        props.clear("missing");

        assert_eq!(props.get("jjj"), Some("999"));
        assert_eq!(props.get("@@@"), Some("###"));
        assert_eq!(props.get("abc"), None);
    }

    #[test]
    fn test_file_content_is_sorted_and_escaped() {
        assert_eq!(sample().to_file_content(), "abc=xyz\njjj=12\\\\3\n");
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempStateDir::new();
        let props = Properties::load(dir.path().join("absent.properties")).unwrap();
        assert_eq!(props.get("anything"), None);
    }

    #[test]
    fn test_save_then_load_preserves_backslashes() {
        let dir = TempStateDir::new();
        let path = dir.path().join("test.properties");

        let mut props = Properties::load(&path).unwrap();
        props.set("device", r"\\?\DISPLAY#GSM5B08#5&1a2b#0#{e6f07b5f}");
        props.set("plain", "value");
        props.save().unwrap();

        let reloaded = Properties::load(&path).unwrap();
        assert_eq!(reloaded.get("device"), Some(r"\\?\DISPLAY#GSM5B08#5&1a2b#0#{e6f07b5f}"));
        assert_eq!(reloaded.get("plain"), Some("value"));
    }

    #[test]
    fn test_save_is_byte_stable() {
        let dir = TempStateDir::new();
        let first = dir.path().join("a.properties");
        let second = dir.path().join("b.properties");

        let mut a = Properties::load(&first).unwrap();
        a.set("tv.deviceId", "B");
        a.set("monitor.deviceId", "A");
        a.save().unwrap();

        let mut b = Properties::load(&second).unwrap();
        b.set("monitor.deviceId", "A");
        b.set("tv.deviceId", "B");
        b.save().unwrap();

        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = TempStateDir::new();
        // A directory cannot be read as a file
        let err = Properties::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err:?}");
    }
}
