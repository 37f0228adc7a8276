//! Fixed-size GRUB environment block

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{files, grubenv};
use crate::error::{Error, Result};

/// Line-oriented view of `<state dir>/grubenv`
///
/// Lines are kept as raw bytes in file order so foreign variables and the
/// header survive a rewrite untouched. Filler-only lines are dropped on
/// load and the padding is regenerated on save.
#[derive(Debug)]
pub struct Grubenv {
    lines: Vec<Vec<u8>>,
    path: PathBuf,
}

impl Grubenv {
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(files::GRUBENV);
        let lines = match fs::read(&path) {
            Ok(bytes) => Self::parse(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "GRUB environment block not found, starting a new one"
                );
                vec![grubenv::HEADER.as_bytes().to_vec()]
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        debug!(path = %path.display(), lines = lines.len(), "Loaded GRUB environment block");
        Ok(Self { lines, path })
    }

    fn parse(bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes
            .split(|&b| b == b'\n')
            .filter(|line| line.iter().any(|&b| b != grubenv::FILLER))
            .map(<[u8]>::to_vec)
            .collect()
    }

    fn position(&self, key: &str) -> Option<usize> {
        let prefix = format!("{key}=");
        self.lines
            .iter()
            .position(|line| line.starts_with(prefix.as_bytes()))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.position(key).map(|index| {
            let value = &self.lines[index][key.len() + 1..];
            String::from_utf8_lossy(value).into_owned()
        })
    }

    /// Replace the line for `key` in place, or append one
    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{key}={value}").into_bytes();
        match self.position(key) {
            Some(index) => self.lines[index] = line,
            None => self.lines.push(line),
        }
    }

    pub fn clear(&mut self, key: &str) {
        if let Some(index) = self.position(key) {
            self.lines.remove(index);
        }
    }

    /// Serialize to exactly [`grubenv::BLOCK_SIZE`] bytes
    ///
    /// Content that does not fit is rejected instead of truncated.
    fn to_block(&self) -> Result<Vec<u8>> {
        let mut block = Vec::with_capacity(grubenv::BLOCK_SIZE);
        for line in &self.lines {
            block.extend_from_slice(line);
            block.push(b'\n');
        }

        if block.len() > grubenv::BLOCK_SIZE {
            return Err(Error::GrubenvTooLarge {
                size: block.len(),
                limit: grubenv::BLOCK_SIZE,
            });
        }
        block.resize(grubenv::BLOCK_SIZE, grubenv::FILLER);
        Ok(block)
    }

    pub fn save(&self) -> Result<()> {
        let block = self.to_block()?;
        super::write_atomically(&self.path, &block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempStateDir;

    fn block_with(lines: &str) -> Vec<u8> {
        let mut bytes = lines.as_bytes().to_vec();
        bytes.resize(grubenv::BLOCK_SIZE, b'#');
        bytes
    }

    fn load_from(dir: &TempStateDir, content: &[u8]) -> Grubenv {
        fs::write(dir.path().join(files::GRUBENV), content).unwrap();
        Grubenv::load(dir.path()).unwrap()
    }

    #[test]
    fn test_parse_drops_filler_keeps_header() {
        let lines = Grubenv::parse(&block_with("# GRUB Environment Block\nabc=xyz\n##\njjj=123\n"));
        assert_eq!(
            lines,
            vec![
                b"# GRUB Environment Block".to_vec(),
                b"abc=xyz".to_vec(),
                b"jjj=123".to_vec(),
            ]
        );
    }

    #[test]
    fn test_get_set_clear() {
        let dir = TempStateDir::new();
        let mut env = load_from(&dir, &block_with("# GRUB Environment Block\nabc=xyz\njjj=123\n"));

        assert_eq!(env.get("abc").as_deref(), Some("xyz"));
        assert_eq!(env.get("ab"), None);

        env.set("jjj", "999");
        env.set("new", "1");
        env.clear("abc");
        env.clear("missing");

        assert_eq!(env.get("jjj").as_deref(), Some("999"));
        assert_eq!(env.get("new").as_deref(), Some("1"));
        assert_eq!(env.get("abc"), None);
    }

    #[test]
    fn test_set_preserves_order_of_foreign_lines() {
        let dir = TempStateDir::new();
        let mut env = load_from(
            &dir,
            &block_with("# GRUB Environment Block\nnext_entry=\nsaved_entry=old\nboot_success=1\n"),
        );

        env.set("saved_entry", "new");
        env.save().unwrap();

        let bytes = fs::read(dir.path().join(files::GRUBENV)).unwrap();
        let expected: &[u8] =
            b"# GRUB Environment Block\nnext_entry=\nsaved_entry=new\nboot_success=1\n#";
        assert!(bytes.starts_with(expected));
    }

    #[test]
    fn test_save_is_exactly_block_size() {
        let dir = TempStateDir::new();
        let mut env = Grubenv::load(dir.path()).unwrap();
        env.save().unwrap();
        assert_eq!(fs::read(dir.path().join(files::GRUBENV)).unwrap().len(), grubenv::BLOCK_SIZE);

        for i in 0..10 {
            env.set(&format!("key{i}"), &"v".repeat(60));
        }
        env.save().unwrap();

        let bytes = fs::read(dir.path().join(files::GRUBENV)).unwrap();
        assert_eq!(bytes.len(), grubenv::BLOCK_SIZE);
        assert!(bytes.ends_with(b"#"));
    }

    #[test]
    fn test_missing_file_starts_with_header() {
        let dir = TempStateDir::new();
        let mut env = Grubenv::load(dir.path()).unwrap();
        env.set("saved_entry", "win-entry");
        env.save().unwrap();

        let bytes = fs::read(dir.path().join(files::GRUBENV)).unwrap();
        assert!(bytes.starts_with(b"# GRUB Environment Block\nsaved_entry=win-entry\n"));
    }

    #[test]
    fn test_oversized_content_is_rejected_and_not_written() {
        let dir = TempStateDir::new();
        let original = block_with("# GRUB Environment Block\nkeep=me\n");
        let mut env = load_from(&dir, &original);

        env.set("huge", &"x".repeat(grubenv::BLOCK_SIZE));
        let err = env.save().unwrap_err();

        assert!(matches!(err, Error::GrubenvTooLarge { limit: 1024, .. }), "{err:?}");
        assert_eq!(fs::read(dir.path().join(files::GRUBENV)).unwrap(), original);
    }

    #[test]
    fn test_non_utf8_foreign_line_survives() {
        let dir = TempStateDir::new();
        let mut content = b"# GRUB Environment Block\nodd=\xff\xfe\n".to_vec();
        content.resize(grubenv::BLOCK_SIZE, b'#');
        let mut env = load_from(&dir, &content);

        env.set("saved_entry", "x");
        env.save().unwrap();

        let bytes = fs::read(dir.path().join(files::GRUBENV)).unwrap();
        assert!(bytes.starts_with(b"# GRUB Environment Block\nodd=\xff\xfe\nsaved_entry=x\n"));
    }
}
