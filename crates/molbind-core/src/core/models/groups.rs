use super::colour::Colour;
use super::feature::FeatureKey;
use super::ranges::RangeModel;

/// Range selections keyed by a grouping value, iterated in the order keys were first seen.
///
/// The number of keys stays small (one per distinct colour or feature value), so lookups
/// are a linear scan over the entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGroups<K> {
    entries: Vec<(K, RangeModel)>,
}

pub type ColourGroups = ValueGroups<Colour>;
pub type FeatureGroups = ValueGroups<FeatureKey>;

impl<K> Default for ValueGroups<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> ValueGroups<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, key: K, model: &str, start: i32, end: i32, chain: &str) {
        let index = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key, RangeModel::new()));
                self.entries.len() - 1
            }
        };
        self.entries[index].1.add_range(model, start, end, chain);
    }

    pub fn get(&self, key: &K) -> Option<&RangeModel> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, model)| model)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &RangeModel)> {
        self.entries.iter().map(|(k, model)| (k, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_keep_first_seen_order_and_ranges_merge_per_key() {
        let blue = Colour::rgb(0, 0, 255);
        let yellow = Colour::rgb(255, 255, 0);
        let red = Colour::rgb(255, 0, 0);

        let mut groups = ColourGroups::new();
        groups.add_range(blue, "0", 2, 5, "A");
        groups.add_range(blue, "0", 9, 23, "A");
        groups.add_range(blue, "1", 1, 1, "A");
        groups.add_range(yellow, "1", 3, 5, "A");
        groups.add_range(yellow, "1", 8, 8, "A");
        groups.add_range(red, "0", 3, 9, "A");
        groups.add_range(blue, "0", 6, 8, "A");

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![blue, yellow, red]);
        let blue_ranges = groups.get(&blue).unwrap().ranges("0", "A");
        assert_eq!(blue_ranges.len(), 1);
        assert_eq!((blue_ranges[0].start, blue_ranges[0].end), (2, 23));
        assert!(groups.get(&Colour::WHITE).is_none());
    }
}
