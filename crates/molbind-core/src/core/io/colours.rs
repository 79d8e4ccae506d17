use super::TableLoadError;
use crate::core::alignment::SequenceRenderer;
use crate::core::alignment::sequences::SequenceAlignment;
use crate::core::models::colour::Colour;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ColourRecord {
    sequence: String,
    column: usize,
    colour: Colour,
}

/// Explicit per-cell colours, with a default for every cell not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourTable {
    cells: HashMap<(usize, usize), Colour>,
    default: Colour,
}

impl ColourTable {
    pub fn new(default: Colour) -> Self {
        Self {
            cells: HashMap::new(),
            default,
        }
    }

    pub fn set(&mut self, sequence: usize, column: usize, colour: Colour) {
        self.cells.insert((sequence, column), colour);
    }

    /// Reads `sequence,column,colour` records; sequences are named as in `alignment`.
    pub fn load(
        path: &Path,
        alignment: &SequenceAlignment,
        default: Colour,
    ) -> Result<Self, TableLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| TableLoadError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

        let mut table = Self::new(default);
        for result in reader.deserialize::<ColourRecord>() {
            let record = result.map_err(|e| TableLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            let sequence = alignment.index_of(&record.sequence).ok_or_else(|| {
                TableLoadError::InvalidRecord {
                    path: path_str.clone(),
                    message: format!("unknown sequence '{}'", record.sequence),
                }
            })?;
            table.set(sequence, record.column, record.colour);
        }
        debug!(path = %path_str, cells = table.cells.len(), "Loaded colour table.");
        Ok(table)
    }
}

impl SequenceRenderer for ColourTable {
    fn colour_at(&self, sequence: usize, column: usize) -> Colour {
        self.cells
            .get(&(sequence, column))
            .copied()
            .unwrap_or(self.default)
    }
}
