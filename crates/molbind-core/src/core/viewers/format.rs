//! Pure formatting helpers shared by every viewer backend.

use crate::core::models::ranges::{AtomSpecType, RangeModel, ResidueRange};
use itertools::Itertools;

/// Namespace prefix of every attribute molbind defines in a viewer.
pub const ATTRIBUTE_PREFIX: &str = "mb_";

/// `n` for a single residue, `n-m` for a span.
pub fn range_token(range: &ResidueRange) -> String {
    if range.is_single() {
        range.start.to_string()
    } else {
        format!("{}-{}", range.start, range.end)
    }
}

pub fn join_ranges(ranges: &[ResidueRange], separator: &str) -> String {
    ranges.iter().map(range_token).join(separator)
}

fn macro_suffix(spec_type: AtomSpecType) -> &'static str {
    match spec_type {
        AtomSpecType::ResidueOnly => "",
        AtomSpecType::Alpha => "CA",
        AtomSpecType::Phosphate => "P",
    }
}

/// Renders `model//chain/ranges/suffix` groups, space-separated, in model then chain order.
///
/// An empty selection renders as the empty string.
pub fn selection_macro(model: &RangeModel, spec_type: AtomSpecType) -> String {
    let suffix = macro_suffix(spec_type);
    model
        .iter()
        .map(|(model_id, chain, ranges)| {
            format!("{}//{}/{}/{}", model_id, chain, join_ranges(ranges, "+"), suffix)
        })
        .join(" ")
}

/// Derives a viewer attribute name from a feature type: the namespace prefix followed by
/// the type with every character outside `[A-Za-z0-9_]` replaced by `_`.
pub fn attribute_name(feature_type: &str) -> String {
    let sanitised: String = feature_type
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}{}", ATTRIBUTE_PREFIX, sanitised)
}

/// Escapes single quotes so the value can sit inside a `'...'` literal.
pub fn escape_attribute_value(value: &str) -> String {
    value.replace('\'', "&#39;")
}

pub fn quote_attribute_value(value: &str) -> String {
    format!("'{}'", escape_attribute_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> RangeModel {
        let mut model = RangeModel::new();
        model.add_range("1", 1, 1, "A");
        model.add_range("0", 9, 23, "A");
        model.add_range("1", 4, 7, "B");
        model.add_range("0", 2, 5, "A");
        model.add_range("0", 7, 7, "B");
        model
    }

    #[test]
    fn selection_is_sorted_by_model_chain_and_start() {
        assert_eq!(
            sample_model().render(AtomSpecType::ResidueOnly),
            "0//A/2-5+9-23/ 0//B/7/ 1//A/1/ 1//B/4-7/"
        );
    }

    #[test]
    fn suffix_is_appended_to_every_chain_group() {
        assert_eq!(
            sample_model().render(AtomSpecType::Alpha),
            "0//A/2-5+9-23/CA 0//B/7/CA 1//A/1/CA 1//B/4-7/CA"
        );
        let mut rna = RangeModel::new();
        rna.add_range("2", 3, 4, "R");
        assert_eq!(rna.render(AtomSpecType::Phosphate), "2//R/3-4/P");
    }

    #[test]
    fn models_render_in_natural_order() {
        let mut model = RangeModel::new();
        model.add_range("5", 1, 2, "A");
        model.add_range("0", 1, 2, "A");
        model.add_range("1", 1, 2, "A");
        assert_eq!(
            model.render(AtomSpecType::ResidueOnly),
            "0//A/1-2/ 1//A/1-2/ 5//A/1-2/"
        );
    }

    #[test]
    fn blank_chain_renders_as_empty_field_after_lettered_chains() {
        let mut model = RangeModel::new();
        model.add_range("5", 25, 35, " ");
        assert_eq!(model.render(AtomSpecType::ResidueOnly), "5///25-35/");

        model.add_range("5", 1, 3, "A");
        assert_eq!(
            model.render(AtomSpecType::ResidueOnly),
            "5//A/1-3/ 5///25-35/"
        );
    }

    #[test]
    fn empty_selection_renders_empty_string() {
        assert_eq!(RangeModel::new().render(AtomSpecType::Alpha), "");
    }

    #[test]
    fn attribute_names_substitute_unsafe_characters() {
        assert_eq!(attribute_name("chain"), "mb_chain");
        assert_eq!(attribute_name("Hello World 24"), "mb_Hello_World_24");
        assert_eq!(
            attribute_name("!this is-a_very*{odd(name"),
            "mb__this_is_a_very__odd_name"
        );
        assert_eq!(attribute_name(""), "mb_");
    }

    #[test]
    fn single_quotes_are_escaped_not_dropped() {
        let value = "<html>metal <a href=\"http:a.b.c/x\"> 'ion!";
        let quoted = quote_attribute_value(value);
        assert_eq!(quoted, "'<html>metal <a href=\"http:a.b.c/x\"> &#39;ion!'");
        assert!(quoted.starts_with('\'') && quoted.ends_with('\''));
        assert_eq!(quoted[1..quoted.len() - 1].matches('\'').count(), 0);
    }
}
