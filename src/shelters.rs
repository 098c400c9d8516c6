//! # Shelter Directory
//!
//! Static list of nearby flood shelters served to the dashboard.
//!
//! - Loads from a TOML config (`[[shelters]]` entries with name + distance).
//! - Path resolution: `$SHELTERS_CONFIG_PATH` → `config/shelters.toml`.
//! - Falls back to a built-in seed when no usable config is found, so the
//!   endpoint always has content.
//! - Blank names are dropped; distances are free-form display strings.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const ENV_SHELTERS_CONFIG_PATH: &str = "SHELTERS_CONFIG_PATH";
pub const DEFAULT_SHELTERS_CONFIG_PATH: &str = "config/shelters.toml";

/// One shelter entry as served on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub name: String,
    /// Display string, e.g. "1.2 km". Kept verbatim from config.
    pub distance: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ShelterFile {
    #[serde(default)]
    shelters: Vec<Shelter>,
}

/// Loaded shelter list, immutable after startup.
#[derive(Debug, Clone)]
pub struct ShelterDirectory {
    shelters: Vec<Shelter>,
}

impl ShelterDirectory {
    /// Load from a TOML file. Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Load using env var + fallback path; missing files yield the seed.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_SHELTERS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SHELTERS_CONFIG_PATH));
        Self::load_from_file(path)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let file: ShelterFile = toml::from_str(s)?;
        Ok(Self {
            shelters: clean_list(file.shelters),
        })
    }

    pub fn all(&self) -> &[Shelter] {
        &self.shelters
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }

    /// Built-in seed used when no config file is present.
    pub(crate) fn default_seed() -> Self {
        let shelters = [
            ("Government School Shelter", "1.2 km"),
            ("Municipal Relief Center", "2.4 km"),
            ("Community Hall Safe Zone", "3.0 km"),
        ]
        .into_iter()
        .map(|(name, distance)| Shelter {
            name: name.to_string(),
            distance: distance.to_string(),
        })
        .collect();
        Self { shelters }
    }
}

fn clean_list(items: Vec<Shelter>) -> Vec<Shelter> {
    items
        .into_iter()
        .filter_map(|s| {
            let name = s.name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Shelter {
                name: name.to_string(),
                distance: s.distance.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_three_entries() {
        let d = ShelterDirectory::default_seed();
        assert_eq!(d.len(), 3);
        assert_eq!(d.all()[0].name, "Government School Shelter");
        assert_eq!(d.all()[2].distance, "3.0 km");
    }

    #[test]
    fn toml_entries_are_trimmed_and_blanks_dropped() {
        let toml = r#"
            [[shelters]]
            name = "  Riverside Camp "
            distance = " 0.8 km "

            [[shelters]]
            name = "   "
            distance = "2 km"
        "#;
        let d = ShelterDirectory::from_toml_str(toml).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d.all()[0].name, "Riverside Camp");
        assert_eq!(d.all()[0].distance, "0.8 km");
    }

    #[test]
    fn unreadable_file_falls_back_to_seed() {
        let d = ShelterDirectory::load_from_file("definitely/not/here.toml");
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn invalid_toml_falls_back_to_seed() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "shelters = 12").unwrap();
        let d = ShelterDirectory::load_from_file(tmp.path());
        assert_eq!(d.len(), 3);
    }
}
