//! Matching free-text order options to catalog option definitions.
//!
//! Orders record options as display text (`Size: Large`), while the cart
//! mutations need option and value ids. Reconciliation is best effort: when
//! an option has been renamed or removed the ids come back `None` and the raw
//! text is still shown.
//!
//! Matching compares lower-cased, trimmed strings. The chosen definition is
//! the first one, in definition order, that satisfies any of:
//!
//! - its name equals the selected name
//! - its name contains the (non-empty) selected name
//! - one of its values has a label equal to the selected value
//!
//! A later definition with an exact name never overrides an earlier one that
//! matched only by label.
//!
//! The value id is then the first value of the chosen definition whose label
//! equals the selected value.

use crate::models::{ProductOptionDefinition, ResolvedOption, SelectedOption};

fn normalized(s: &str) -> String {
    s.trim().to_lowercase()
}

fn has_value_labelled(definition: &ProductOptionDefinition, value: &str) -> bool {
    definition
        .values
        .iter()
        .any(|v| normalized(&v.label) == value)
}

fn find_definition<'a>(
    definitions: &'a [ProductOptionDefinition],
    name: &str,
    value: &str,
) -> Option<&'a ProductOptionDefinition> {
    definitions.iter().find(|d| {
        let candidate = normalized(&d.display_name);
        candidate == name
            || (!name.is_empty() && candidate.contains(name))
            || has_value_labelled(d, value)
    })
}

/// Resolve one selected option against a product's definitions.
#[must_use]
pub fn resolve_option(
    selected: &SelectedOption,
    definitions: &[ProductOptionDefinition],
) -> ResolvedOption {
    let name = normalized(&selected.name);
    let value = normalized(&selected.value);

    let definition = find_definition(definitions, &name, &value);
    let value_entity_id = definition.and_then(|d| {
        d.values
            .iter()
            .find(|v| normalized(&v.label) == value)
            .map(|v| v.id)
    });

    ResolvedOption {
        name: selected.name.clone(),
        value: selected.value.clone(),
        option_entity_id: definition.map(|d| d.id),
        value_entity_id,
    }
}

/// Resolve every selected option of a line, preserving input order.
#[must_use]
pub fn resolve_options(
    selected: &[SelectedOption],
    definitions: &[ProductOptionDefinition],
) -> Vec<ResolvedOption> {
    selected
        .iter()
        .map(|s| resolve_option(s, definitions))
        .collect()
}

#[cfg(test)]
mod tests {
    use cove_core::{OptionId, OptionValueId};

    use super::*;
    use crate::models::OptionValue;
    use crate::models::product::ProductOptionKind;

    fn definition(id: i64, name: &str, values: &[(i64, &str)]) -> ProductOptionDefinition {
        ProductOptionDefinition {
            id: OptionId::new(id),
            display_name: name.to_string(),
            kind: ProductOptionKind::MultipleChoice,
            is_variant_option: true,
            values: values
                .iter()
                .map(|&(id, label)| OptionValue {
                    id: OptionValueId::new(id),
                    label: label.to_string(),
                    is_default: false,
                })
                .collect(),
        }
    }

    fn selected(name: &str, value: &str) -> SelectedOption {
        SelectedOption {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn ids(resolved: &ResolvedOption) -> (Option<i64>, Option<i64>) {
        (
            resolved.option_entity_id.map(|id| id.as_i64()),
            resolved.value_entity_id.map(|id| id.as_i64()),
        )
    }

    #[test]
    fn test_exact_name_and_label() {
        let defs = vec![
            definition(10, "Size", &[(101, "Small"), (102, "Large")]),
            definition(11, "Color", &[(201, "Red")]),
        ];
        let resolved = resolve_option(&selected("Size", "Large"), &defs);
        assert_eq!(ids(&resolved), (Some(10), Some(102)));
        assert_eq!(resolved.name, "Size");
        assert_eq!(resolved.value, "Large");
    }

    #[test]
    fn test_comparison_ignores_case_and_padding() {
        let defs = vec![definition(10, " SIZE ", &[(102, "large ")])];
        let resolved = resolve_option(&selected("size", "  Large"), &defs);
        assert_eq!(ids(&resolved), (Some(10), Some(102)));
    }

    #[test]
    fn test_no_match_yields_nulls() {
        let defs = vec![definition(10, "Size", &[(101, "Small")])];
        let resolved = resolve_option(&selected("Engraving", "Hello"), &defs);
        assert_eq!(ids(&resolved), (None, None));

        let resolved = resolve_option(&selected("Size", "Huge"), &[]);
        assert_eq!(ids(&resolved), (None, None));
    }

    #[test]
    fn test_earlier_label_match_wins_over_later_exact_name() {
        let defs = vec![
            definition(10, "Color", &[(101, "Large")]),
            definition(11, "Size", &[(111, "Large")]),
        ];
        let resolved = resolve_option(&selected("Size", "Large"), &defs);
        assert_eq!(ids(&resolved), (Some(10), Some(101)));
    }

    #[test]
    fn test_earlier_partial_name_wins_over_later_exact_name() {
        let defs = vec![
            definition(10, "Shirt Size", &[(101, "Medium")]),
            definition(11, "Size", &[(111, "Large")]),
        ];
        let resolved = resolve_option(&selected("Size", "Large"), &defs);
        assert_eq!(ids(&resolved), (Some(10), None));
    }

    #[test]
    fn test_exact_name_found_when_no_earlier_candidate() {
        let defs = vec![
            definition(10, "Color", &[(101, "Red")]),
            definition(11, "Size", &[(111, "Large")]),
        ];
        let resolved = resolve_option(&selected("Size", "Large"), &defs);
        assert_eq!(ids(&resolved), (Some(11), Some(111)));
    }

    #[test]
    fn test_renamed_option_resolves_by_label() {
        let defs = vec![
            definition(10, "Colour", &[(101, "Red"), (102, "Blue")]),
            definition(11, "Size", &[(111, "Small")]),
        ];
        let resolved = resolve_option(&selected("Color", "Blue"), &defs);
        assert_eq!(ids(&resolved), (Some(10), Some(102)));
    }

    #[test]
    fn test_empty_selected_name_skips_partial_tier() {
        let defs = vec![
            definition(10, "Size", &[(101, "Small")]),
            definition(11, "Color", &[(201, "Red")]),
        ];
        let resolved = resolve_option(&selected("", "Red"), &defs);
        assert_eq!(ids(&resolved), (Some(11), Some(201)));
    }

    #[test]
    fn test_name_match_with_relabelled_value() {
        let defs = vec![definition(10, "Size", &[(101, "S"), (102, "L")])];
        let resolved = resolve_option(&selected("Size", "Large"), &defs);
        assert_eq!(ids(&resolved), (Some(10), None));
    }

    #[test]
    fn test_first_of_duplicate_labels_wins() {
        let defs = vec![definition(10, "Size", &[(101, "Large"), (102, "large")])];
        let resolved = resolve_option(&selected("Size", "LARGE"), &defs);
        assert_eq!(ids(&resolved), (Some(10), Some(101)));
    }

    #[test]
    fn test_resolve_options_preserves_order() {
        let defs = vec![
            definition(10, "Size", &[(101, "Small")]),
            definition(11, "Color", &[(201, "Red")]),
        ];
        let resolved = resolve_options(&[selected("Color", "Red"), selected("Size", "Small")], &defs);
        assert_eq!(ids(&resolved[0]), (Some(11), Some(201)));
        assert_eq!(ids(&resolved[1]), (Some(10), Some(101)));
    }
}
