/// Grouping key for per-residue annotations: the feature type and the value it carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub feature_type: String,
    pub value: String,
}

impl FeatureKey {
    pub fn new(feature_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            feature_type: feature_type.into(),
            value: value.into(),
        }
    }

    /// Derives the attribute value of an annotation.
    ///
    /// A meaningful score (non-zero, not NaN) wins; otherwise the description is used,
    /// falling back to the feature type itself when the description is absent or blank.
    pub fn from_annotation(
        feature_type: &str,
        description: Option<&str>,
        score: Option<f32>,
    ) -> Self {
        let value = match score {
            Some(score) if score != 0.0 && !score.is_nan() => format!("{:?}", score),
            _ => description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(feature_type)
                .to_string(),
        };
        Self::new(feature_type, value)
    }
}
