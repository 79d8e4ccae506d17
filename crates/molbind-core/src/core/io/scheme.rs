use super::TableLoadError;
use crate::core::alignment::schemes::UserColourScheme;
use crate::core::models::colour::Colour;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeFile {
    default: Option<Colour>,
    #[serde(default)]
    residues: BTreeMap<String, Colour>,
}

impl UserColourScheme {
    /// Loads a scheme of the form `default = "white"` plus a `[residues]` table of
    /// single-letter keys.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| TableLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path_str)
    }

    fn from_toml_str(content: &str, path_str: &str) -> Result<Self, TableLoadError> {
        let file: SchemeFile = toml::from_str(content).map_err(|e| TableLoadError::Toml {
            path: path_str.to_string(),
            source: e,
        })?;

        let mut scheme = UserColourScheme::new(file.default.unwrap_or(Colour::WHITE));
        for (key, colour) in file.residues {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(residue), None) => scheme.set(residue, colour),
                _ => {
                    return Err(TableLoadError::InvalidRecord {
                        path: path_str.to_string(),
                        message: format!("residue key '{}' must be a single letter", key),
                    });
                }
            }
        }
        Ok(scheme)
    }
}
