use super::TableLoadError;
use crate::core::alignment::FeatureSource;
use crate::core::alignment::sequences::SequenceAlignment;
use crate::core::models::feature::FeatureKey;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FeatureRecord {
    sequence: String,
    start: usize,
    end: usize,
    #[serde(rename = "type")]
    feature_type: String,
    description: Option<String>,
    score: Option<f32>,
}

/// An annotation spanning an inclusive range of alignment columns on one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpan {
    pub sequence: usize,
    pub start: usize,
    pub end: usize,
    pub key: FeatureKey,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    spans: Vec<FeatureSpan>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: FeatureSpan) {
        self.spans.push(span);
    }

    pub fn spans(&self) -> &[FeatureSpan] {
        &self.spans
    }

    /// Reads `sequence,start,end,type,description,score` records. `description` and
    /// `score` may be left empty.
    pub fn load(path: &Path, alignment: &SequenceAlignment) -> Result<Self, TableLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| TableLoadError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

        let mut table = Self::new();
        for result in reader.deserialize::<FeatureRecord>() {
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
            if record.start > record.end {
                return Err(TableLoadError::InvalidRecord {
                    path: path_str,
                    message: format!(
                        "feature '{}' starts after it ends ({} > {})",
                        record.feature_type, record.start, record.end
                    ),
                });
            }
            table.push(FeatureSpan {
                sequence,
                start: record.start,
                end: record.end,
                key: FeatureKey::from_annotation(
                    &record.feature_type,
                    record.description.as_deref(),
                    record.score,
                ),
            });
        }
        debug!(path = %path_str, features = table.spans.len(), "Loaded feature table.");
        Ok(table)
    }
}

impl FeatureSource for FeatureTable {
    fn features_at(&self, sequence: usize, column: usize) -> Vec<FeatureKey> {
        self.spans
            .iter()
            .filter(|span| span.sequence == sequence && (span.start..=span.end).contains(&column))
            .map(|span| span.key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::sequences::AlignedSequence;
    use tempfile::tempdir;

    #[test]
    fn load_derives_values_and_answers_column_queries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.csv");
        std::fs::write(
            &path,
            "sequence,start,end,type,description,score\n\
             s1,0,2,metal,zinc,\n\
             s1,2,3,kd,hydrophobicity,1.5\n\
             s2,1,1,helix,,\n",
        )
        .unwrap();
        let alignment = SequenceAlignment::new(vec![
            AlignedSequence::new("s1", "ACDE"),
            AlignedSequence::new("s2", "ACDE"),
        ]);

        let table = FeatureTable::load(&path, &alignment).unwrap();
        assert_eq!(table.spans().len(), 3);
        assert_eq!(
            table.features_at(0, 2),
            vec![FeatureKey::new("metal", "zinc"), FeatureKey::new("kd", "1.5")]
        );
        assert_eq!(table.features_at(1, 1), vec![FeatureKey::new("helix", "helix")]);
        assert!(table.features_at(1, 0).is_empty());
    }

    #[test]
    fn load_rejects_inverted_spans() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("features.csv");
        std::fs::write(
            &path,
            "sequence,start,end,type,description,score\ns1,3,1,metal,zinc,\n",
        )
        .unwrap();
        let alignment = SequenceAlignment::new(vec![AlignedSequence::new("s1", "ACDE")]);

        let result = FeatureTable::load(&path, &alignment);
        assert!(matches!(result, Err(TableLoadError::InvalidRecord { .. })));
    }
}
