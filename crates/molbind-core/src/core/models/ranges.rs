use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which atoms of each residue a rendered selection addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomSpecType {
    /// The whole residue.
    #[default]
    ResidueOnly,
    /// Alpha carbons only.
    Alpha,
    /// Backbone phosphates only, for nucleic acid chains.
    Phosphate,
}

/// An inclusive span of residue numbers, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueRange {
    pub start: i32,
    pub end: i32,
}

impl ResidueRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn single(residue: i32) -> Self {
        Self::new(residue, residue)
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Number of residues covered.
    pub fn span(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start) + 1) as usize
    }

    pub fn contains(&self, residue: i32) -> bool {
        (self.start..=self.end).contains(&residue)
    }
}

/// Model ids order numerically when both are integers, numeric ids before any other id,
/// and lexicographically otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ModelKey(String);

impl ModelKey {
    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for ModelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ModelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lettered chains sort alphabetically; the "no chain" value sorts after all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum ChainKey {
    Named(String),
    Blank,
}

impl ChainKey {
    fn from_id(chain: &str) -> Self {
        let trimmed = chain.trim();
        if trimmed.is_empty() {
            ChainKey::Blank
        } else {
            ChainKey::Named(trimmed.to_string())
        }
    }

    fn as_str(&self) -> &str {
        match self {
            ChainKey::Named(id) => id,
            ChainKey::Blank => "",
        }
    }
}

/// Residue selections per model and chain, kept as sorted, maximally merged ranges.
///
/// Two stored ranges of one chain never overlap and are never contiguous, whatever the
/// order in which they were added. A blank (or whitespace-only) chain id denotes a model
/// without chain identifiers and reads back as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeModel {
    models: BTreeMap<ModelKey, BTreeMap<ChainKey, Vec<ResidueRange>>>,
}

impl RangeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `[start, end]` to `(model, chain)`, merging it with any overlapping or
    /// adjacent range already present.
    pub fn add_range(&mut self, model: &str, start: i32, end: i32, chain: &str) {
        let ranges = self
            .models
            .entry(ModelKey(model.to_string()))
            .or_default()
            .entry(ChainKey::from_id(chain))
            .or_default();
        merge_into(ranges, ResidueRange::new(start, end));
    }

    pub fn add_residue(&mut self, model: &str, residue: i32, chain: &str) {
        self.add_range(model, residue, residue, chain);
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(|key| key.0.as_str())
    }

    pub fn chains<'a>(&'a self, model: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.models
            .get(&ModelKey(model.to_string()))
            .into_iter()
            .flat_map(|chains| chains.keys().map(ChainKey::as_str))
    }

    pub fn ranges(&self, model: &str, chain: &str) -> &[ResidueRange] {
        self.models
            .get(&ModelKey(model.to_string()))
            .and_then(|chains| chains.get(&ChainKey::from_id(chain)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every `(model, chain, ranges)` triple in model order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[ResidueRange])> {
        self.models.iter().flat_map(|(model, chains)| {
            chains
                .iter()
                .map(move |(chain, ranges)| (model.0.as_str(), chain.as_str(), ranges.as_slice()))
        })
    }

    /// Chains grouped under their model, in model order.
    pub fn iter_models(
        &self,
    ) -> impl Iterator<Item = (&str, Vec<(&str, &[ResidueRange])>)> {
        self.models.iter().map(|(model, chains)| {
            let chains = chains
                .iter()
                .map(|(chain, ranges)| (chain.as_str(), ranges.as_slice()))
                .collect();
            (model.0.as_str(), chains)
        })
    }

    pub fn residue_count(&self) -> usize {
        self.iter()
            .flat_map(|(_, _, ranges)| ranges.iter())
            .map(ResidueRange::span)
            .sum()
    }

    /// Renders the selection in the `model//chain/ranges/suffix` macro form.
    pub fn render(&self, spec_type: AtomSpecType) -> String {
        crate::core::viewers::format::selection_macro(self, spec_type)
    }
}

fn merge_into(ranges: &mut Vec<ResidueRange>, new: ResidueRange) {
    let first = ranges.partition_point(|r| r.end.saturating_add(1) < new.start);
    let mut merged = new;
    let mut last = first;
    while last < ranges.len() && ranges[last].start <= merged.end.saturating_add(1) {
        merged.start = merged.start.min(ranges[last].start);
        merged.end = merged.end.max(ranges[last].end);
        last += 1;
    }
    ranges.splice(first..last, std::iter::once(merged));
}
