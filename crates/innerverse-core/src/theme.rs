//! UI theme preference, persisted as a single string.

use directories::ProjectDirs;
use log::debug;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Page color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme; the default when no preference is stored.
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Return the theme as a lowercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a theme string, defaulting unknown values to light.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// File-backed store for the theme preference string.
///
/// Read once at page load, written on every toggle. A missing or corrupt
/// file reads as the default theme.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Store under the user's InnerVerse config directory, when resolvable.
    pub fn for_user() -> Option<Self> {
        ProjectDirs::from("", "", "innerverse")
            .map(|dirs| Self::at(dirs.config_dir().join("theme")))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored preference, defaulting to light.
    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Theme::parse(&raw),
            Err(err) => {
                debug!("no stored theme ({}): {}", self.path.display(), err);
                Theme::default()
            }
        }
    }

    /// Persist a preference.
    pub fn save(&self, theme: Theme) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, theme.as_str())
    }

    /// Flip the stored preference and return the new theme.
    pub fn toggle(&self) -> io::Result<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, ThemeStore};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_and_corrupt_files_read_as_light() {
        let temp = tempdir().expect("tempdir");
        let store = ThemeStore::at(temp.path().join("theme"));
        assert_eq!(store.load(), Theme::Light);

        store.save(Theme::Dark).expect("save");
        std::fs::write(temp.path().join("theme"), "solarized").expect("write");
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn toggle_round_trips_through_the_file() {
        let temp = tempdir().expect("tempdir");
        let store = ThemeStore::at(temp.path().join("nested/theme"));

        assert_eq!(store.toggle().expect("toggle"), Theme::Dark);
        assert_eq!(store.load(), Theme::Dark);
        assert_eq!(store.toggle().expect("toggle"), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
    }
}
