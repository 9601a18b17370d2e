use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MenuError;

/// Exponent bytes exactly as the user typed them, minus the line terminator.
///
/// The renderer parses them as an integer; nothing here does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSetting(Vec<u8>);

impl LayerSetting {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lossy text form for console and log output.
    pub fn display(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Whether Python's `int()` would accept the value: surrounding whitespace,
    /// an optional sign, then ASCII digits with single `_` separators between them.
    /// There is no size limit.
    pub fn is_integer(&self) -> bool {
        let text = self.0.trim_ascii();
        let digits = match text.first() {
            Some(b'+' | b'-') => &text[1..],
            _ => text,
        };
        !digits.is_empty()
            && digits
                .split(|b| *b == b'_')
                .all(|group| !group.is_empty() && group.iter().all(u8::is_ascii_digit))
    }
}

/// One-line settings file handed to the renderer.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file content with `setting` and a newline.
    ///
    /// The parent directory is not created; a missing `input/` is an error.
    pub fn store(&self, setting: &LayerSetting) -> Result<(), MenuError> {
        if !setting.is_integer() {
            log::warn!(
                "layer setting {:?} is not an integer, storing it anyway",
                setting.display()
            );
        }

        let mut content = setting.as_bytes().to_vec();
        content.push(b'\n');
        fs::write(&self.path, content).map_err(|source| MenuError::WriteSettings {
            path: self.path.clone(),
            source,
        })?;

        log::info!("wrote layer setting to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &Path) -> SettingsFile {
        fs::create_dir_all(dir.join("input")).unwrap();
        SettingsFile::new(dir.join("input").join("settings.txt"))
    }

    #[test]
    fn store_writes_value_and_newline() {
        let dir = tempfile::tempdir().unwrap();
        let file = settings_in(dir.path());

        file.store(&LayerSetting::new("5")).unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "5\n");
    }

    #[test]
    fn store_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = settings_in(dir.path());

        file.store(&LayerSetting::new("3")).unwrap();
        file.store(&LayerSetting::new("64")).unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "64\n");
    }

    #[test]
    fn longer_old_content_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let file = settings_in(dir.path());
        fs::write(file.path(), "123456789\nstale\n").unwrap();

        file.store(&LayerSetting::new("2")).unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "2\n");
    }

    #[test]
    fn empty_and_non_numeric_values_are_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = settings_in(dir.path());

        file.store(&LayerSetting::new("")).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "\n");

        file.store(&LayerSetting::new(" ten layers ")).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), " ten layers \n");
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("input").join("settings.txt"));

        let err = file.store(&LayerSetting::new("4")).unwrap_err();

        assert!(matches!(err, MenuError::WriteSettings { .. }));
        assert!(!file.path().exists());
    }

    #[test]
    fn non_utf8_bytes_are_written_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let file = settings_in(dir.path());

        file.store(&LayerSetting::new(b"\xe9\xff".to_vec())).unwrap();

        assert_eq!(fs::read(file.path()).unwrap(), b"\xe9\xff\n");
    }

    #[test]
    fn integer_check_follows_python_int() {
        for ok in ["64", " 7", "+3", "-2\t", "1_000", "123456789012345678901234567890"] {
            assert!(LayerSetting::new(ok).is_integer(), "{ok:?}");
        }
        for bad in ["", "  ", "-", "4^3", "_1", "1_", "1__0", "1.5", "0x10"] {
            assert!(!LayerSetting::new(bad).is_integer(), "{bad:?}");
        }
        assert!(!LayerSetting::new(b"\xe9".to_vec()).is_integer());
    }
}
