//! Writer preferences
//!
//! The font choice and size are kept in the same key/value store as the
//! document. How a font is rendered is the front end's business; this module
//! only remembers which one was picked.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::storage::{PersistenceStore, StorageError};

/// Store key for the selected font
pub const FONT_KEY: &str = "selected_font";

/// Store key for the font size
pub const FONT_SIZE_KEY: &str = "font_size";

/// Sizes `cycle_font_size` steps through
pub const FONT_SIZES: [u16; 8] = [12, 14, 16, 18, 20, 24, 28, 32];

pub const DEFAULT_FONT_SIZE: u16 = 18;

/// Faces [`FontOption::Random`] picks from
pub const RANDOM_FACES: [&str; 15] = [
    "Helvetica",
    "Georgia",
    "Palatino",
    "Times New Roman",
    "Courier New",
    "Avenir",
    "Baskerville",
    "Cochin",
    "Copperplate",
    "Didot",
    "Futura",
    "Gill Sans",
    "Hoefler Text",
    "Optima",
    "Trebuchet MS",
];

/// Face shown for [`FontOption::Random`] until one is picked
pub const DEFAULT_RANDOM_FACE: &str = "Helvetica";

/// Pick one of [`RANDOM_FACES`]
pub fn random_face() -> &'static str {
    RANDOM_FACES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_RANDOM_FACE)
}

/// Errors that can occur when changing preferences
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Unknown font '{0}'. Valid fonts: lato, arial, system, serif, random")]
    UnknownFont(String),

    #[error("Failed to save preference: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontOption {
    #[default]
    Lato,
    Arial,
    System,
    Serif,
    /// One of [`RANDOM_FACES`], re-picked whenever it is chosen or loaded
    Random,
}

impl FontOption {
    pub const ALL: [FontOption; 5] = [
        FontOption::Lato,
        FontOption::Arial,
        FontOption::System,
        FontOption::Serif,
        FontOption::Random,
    ];

    /// Value written to the store
    pub fn as_str(self) -> &'static str {
        match self {
            FontOption::Lato => "lato",
            FontOption::Arial => "arial",
            FontOption::System => "system",
            FontOption::Serif => "serif",
            FontOption::Random => "random",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FontOption::Lato => "Lato",
            FontOption::Arial => "Arial",
            FontOption::System => "System",
            FontOption::Serif => "Serif",
            FontOption::Random => "Random",
        }
    }
}

impl fmt::Display for FontOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FontOption {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FontOption::ALL
            .into_iter()
            .find(|font| font.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PreferencesError::UnknownFont(s.to_string()))
    }
}

/// Font preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub font: FontOption,
    pub font_size: u16,
    /// Face in use while `font` is [`FontOption::Random`]; never stored
    #[serde(skip)]
    pub random_face: &'static str,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font: FontOption::default(),
            font_size: DEFAULT_FONT_SIZE,
            random_face: DEFAULT_RANDOM_FACE,
        }
    }
}

impl Preferences {
    /// Read preferences from the store
    ///
    /// Missing, unknown or unreadable values keep their defaults.
    pub fn load(store: &dyn PersistenceStore) -> Self {
        let mut prefs = Self::default();

        match store.get(FONT_KEY) {
            Ok(Some(value)) => match value.parse() {
                Ok(font) => prefs.select(font),
                Err(_) => warn!("Ignoring unknown saved font {:?}", value),
            },
            Ok(None) => {}
            Err(e) => warn!("Could not read font preference: {}", e),
        }

        match store.get(FONT_SIZE_KEY) {
            Ok(Some(value)) => match parse_font_size(&value) {
                Some(size) => prefs.font_size = size,
                None => warn!("Ignoring invalid saved font size {:?}", value),
            },
            Ok(None) => {}
            Err(e) => warn!("Could not read font size preference: {}", e),
        }

        prefs
    }

    /// Name of the face to render with
    pub fn face_name(&self) -> &'static str {
        match self.font {
            FontOption::Random => self.random_face,
            font => font.display_name(),
        }
    }

    /// Choose a font and remember it
    pub fn set_font(
        &mut self,
        store: &dyn PersistenceStore,
        font: FontOption,
    ) -> Result<(), PreferencesError> {
        store.set(FONT_KEY, font.as_str())?;
        self.select(font);
        Ok(())
    }

    fn select(&mut self, font: FontOption) {
        self.font = font;
        if font == FontOption::Random {
            self.random_face = random_face();
        }
    }

    /// Set the font size and remember it
    pub fn set_font_size(
        &mut self,
        store: &dyn PersistenceStore,
        size: u16,
    ) -> Result<(), PreferencesError> {
        store.set(FONT_SIZE_KEY, &size.to_string())?;
        self.font_size = size;
        Ok(())
    }

    /// Step to the next size in [`FONT_SIZES`], wrapping at the end
    ///
    /// A size that is not in the list goes back to the default.
    pub fn cycle_font_size(
        &mut self,
        store: &dyn PersistenceStore,
    ) -> Result<u16, PreferencesError> {
        let next = next_font_size(self.font_size);
        self.set_font_size(store, next)?;
        Ok(next)
    }
}

fn next_font_size(current: u16) -> u16 {
    match FONT_SIZES.iter().position(|&size| size == current) {
        Some(index) => FONT_SIZES[(index + 1) % FONT_SIZES.len()],
        None => DEFAULT_FONT_SIZE,
    }
}

/// Accepts whole or fractional sizes ("18", "18.0"); zero and negatives are rejected
fn parse_font_size(value: &str) -> Option<u16> {
    let size: f64 = value.trim().parse().ok()?;
    if size > 0.0 && size <= f64::from(u16::MAX) {
        Some(size.round() as u16)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let store = MemoryStore::new();
        let prefs = Preferences::load(&store);

        assert_eq!(prefs.font, FontOption::Lato);
        assert_eq!(prefs.font_size, 18);
    }

    #[test]
    fn test_load_saved_values() {
        let store = MemoryStore::new();
        store.set(FONT_KEY, "serif").unwrap();
        store.set(FONT_SIZE_KEY, "24.0").unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.font, FontOption::Serif);
        assert_eq!(prefs.font_size, 24);
    }

    #[test]
    fn test_invalid_saved_values_are_ignored() {
        let store = MemoryStore::new();
        store.set(FONT_KEY, "comic-sans").unwrap();
        store.set(FONT_SIZE_KEY, "0").unwrap();

        let prefs = Preferences::load(&store);
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_set_font_persists() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(&store);

        prefs.set_font(&store, FontOption::Arial).unwrap();

        assert_eq!(prefs.font, FontOption::Arial);
        assert_eq!(store.get(FONT_KEY).unwrap().as_deref(), Some("arial"));
        assert_eq!(Preferences::load(&store).font, FontOption::Arial);
    }

    #[test]
    fn test_font_parsing() {
        assert_eq!("System".parse::<FontOption>().unwrap(), FontOption::System);
        assert_eq!(" random ".parse::<FontOption>().unwrap(), FontOption::Random);
        assert!(matches!(
            "papyrus".parse::<FontOption>(),
            Err(PreferencesError::UnknownFont(_))
        ));
    }

    #[test]
    fn test_cycle_font_size_wraps() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(&store);

        assert_eq!(prefs.cycle_font_size(&store).unwrap(), 20);
        assert_eq!(store.get(FONT_SIZE_KEY).unwrap().as_deref(), Some("20"));

        prefs.font_size = 32;
        assert_eq!(prefs.cycle_font_size(&store).unwrap(), 12);
    }

    #[test]
    fn test_cycle_from_unknown_size_resets() {
        let store = MemoryStore::new();
        let mut prefs = Preferences {
            font_size: 17,
            ..Preferences::default()
        };

        assert_eq!(prefs.cycle_font_size(&store).unwrap(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_random_font_picks_a_face() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::load(&store);
        assert_eq!(prefs.face_name(), "Lato");

        prefs.set_font(&store, FontOption::Random).unwrap();
        assert!(RANDOM_FACES.contains(&prefs.face_name()));
        assert_eq!(store.get(FONT_KEY).unwrap().as_deref(), Some("random"));

        let reloaded = Preferences::load(&store);
        assert_eq!(reloaded.font, FontOption::Random);
        assert!(RANDOM_FACES.contains(&reloaded.face_name()));
    }

    #[test]
    fn test_fixed_fonts_ignore_random_face() {
        let prefs = Preferences {
            font: FontOption::Serif,
            random_face: "Futura",
            ..Preferences::default()
        };

        assert_eq!(prefs.face_name(), "Serif");
    }

    #[test]
    fn test_font_serializes_lowercase() {
        let json = serde_json::to_string(&FontOption::Serif).unwrap();
        assert_eq!(json, "\"serif\"");
    }
}
