//! Normalizer turning backend inventory lots into flat display rows
//!
//! The backend encodes two record shapes (multi-part-number lots and big/small
//! size-variant lots); the dashboard renders one uniform card list. This module
//! is a pure transform over an immutable snapshot: every refresh rebuilds the
//! whole row list from a fresh fetch, nothing is patched in place.

use crate::models::{DisplayRow, SizeVariant, TurboLot};

/// Low-stock threshold for priority lots.
pub const PRIORITY_LOW_STOCK_THRESHOLD: i64 = 5;
/// Low-stock threshold for regular lots.
pub const LOW_STOCK_THRESHOLD: i64 = 1;

/// Low-stock classification applied uniformly to rows and re-render checks.
pub fn is_low_stock(quantity: i64, priority: bool) -> bool {
    if priority {
        quantity <= PRIORITY_LOW_STOCK_THRESHOLD
    } else {
        quantity <= LOW_STOCK_THRESHOLD
    }
}

/// Convert the raw lot list into display rows, preserving input order.
///
/// Lots with no usable part numbers produce no row; that is data hygiene for
/// half-filled records, not an error.
pub fn normalize_lots(lots: &[TurboLot]) -> Vec<DisplayRow> {
    lots.iter().filter_map(row_for_lot).collect()
}

fn row_for_lot(lot: &TurboLot) -> Option<DisplayRow> {
    if lot.has_size_option {
        variant_row(lot)
    } else {
        simple_row(lot)
    }
}

fn simple_row(lot: &TurboLot) -> Option<DisplayRow> {
    let parts = clean_part_numbers(lot.part_numbers.as_deref().unwrap_or(&[]));
    if parts.is_empty() {
        return None;
    }

    let id = parts.join(", ");
    let quantity = lot.quantity.unwrap_or(0);

    Some(DisplayRow {
        model: id.clone(),
        display_text: id.clone(),
        id,
        location: lot.location.clone(),
        quantity,
        is_low_stock: is_low_stock(quantity, lot.priority),
        priority: lot.priority,
        all_part_numbers: parts,
        big_part_numbers: Vec::new(),
        small_part_numbers: Vec::new(),
        big_quantity: 0,
        small_quantity: 0,
    })
}

fn variant_row(lot: &TurboLot) -> Option<DisplayRow> {
    let variants = lot.size_variants.as_ref();
    let (big_parts, big_quantity) = variant_parts(variants.and_then(|v| v.big.as_ref()));
    let (small_parts, small_quantity) = variant_parts(variants.and_then(|v| v.small.as_ref()));

    if big_parts.is_empty() && small_parts.is_empty() {
        return None;
    }

    let mut all_parts = big_parts.clone();
    all_parts.extend(small_parts.iter().cloned());
    let id = all_parts.join(", ");

    let mut segments = Vec::new();
    if !big_parts.is_empty() {
        segments.push(format!("Big: {} (Qty: {})", big_parts.join(", "), big_quantity));
    }
    if !small_parts.is_empty() {
        segments.push(format!(
            "Small: {} (Qty: {})",
            small_parts.join(", "),
            small_quantity
        ));
    }
    let display_text = segments.join(" | ");

    let quantity = big_quantity + small_quantity;

    Some(DisplayRow {
        id,
        model: display_text.clone(),
        display_text,
        location: lot.location.clone(),
        quantity,
        is_low_stock: is_low_stock(quantity, lot.priority),
        priority: lot.priority,
        all_part_numbers: all_parts,
        big_part_numbers: big_parts,
        small_part_numbers: small_parts,
        big_quantity,
        small_quantity,
    })
}

/// Part numbers and quantity for one variant; an absent variant or one whose
/// part numbers are all blank contributes nothing.
fn variant_parts(variant: Option<&SizeVariant>) -> (Vec<String>, i64) {
    match variant {
        Some(v) => {
            let parts = clean_part_numbers(&v.part_numbers);
            if parts.is_empty() {
                (parts, 0)
            } else {
                (parts, v.quantity)
            }
        }
        None => (Vec::new(), 0),
    }
}

fn clean_part_numbers(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SizeVariants;
    use proptest::prelude::*;

    fn simple_lot(location: &str, parts: &[&str], quantity: i64, priority: bool) -> TurboLot {
        TurboLot {
            location: location.to_string(),
            quantity: Some(quantity),
            part_numbers: Some(parts.iter().map(|p| p.to_string()).collect()),
            has_size_option: false,
            size_variants: None,
            priority,
        }
    }

    fn variant_lot(
        location: &str,
        big: Option<(Vec<&str>, i64)>,
        small: Option<(Vec<&str>, i64)>,
        priority: bool,
    ) -> TurboLot {
        let to_variant = |(parts, quantity): (Vec<&str>, i64)| SizeVariant {
            part_numbers: parts.iter().map(|p| p.to_string()).collect(),
            quantity,
        };
        TurboLot {
            location: location.to_string(),
            quantity: None,
            part_numbers: None,
            has_size_option: true,
            size_variants: Some(SizeVariants {
                big: big.map(to_variant),
                small: small.map(to_variant),
            }),
            priority,
        }
    }

    #[test]
    fn test_simple_lot_produces_one_row() {
        let lots = vec![simple_lot("B4", &["5303 970 0262", "5303 970 0338"], 4, false)];
        let rows = normalize_lots(&lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "5303 970 0262, 5303 970 0338");
        assert_eq!(rows[0].model, "5303 970 0262, 5303 970 0338");
        assert_eq!(rows[0].quantity, 4);
        assert!(!rows[0].is_low_stock);
        assert_eq!(rows[0].primary_part_number(), Some("5303 970 0262"));
    }

    #[test]
    fn test_simple_lot_trims_and_drops_blank_part_numbers() {
        let lots = vec![simple_lot("B4", &[" 846015 ", "", "  "], 2, false)];
        let rows = normalize_lots(&lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "846015");
        assert_eq!(rows[0].all_part_numbers, vec!["846015"]);
    }

    #[test]
    fn test_simple_lot_with_no_part_numbers_yields_no_row() {
        let lots = vec![
            simple_lot("B4", &[], 2, false),
            simple_lot("B5", &["", "  "], 2, false),
        ];
        assert!(normalize_lots(&lots).is_empty());
    }

    #[test]
    fn test_variant_lot_sums_quantities_and_joins_big_then_small() {
        // End-to-end example: big 123 qty 2, small 456 qty 1.
        let lots = vec![variant_lot("A1", Some((vec!["123"], 2)), Some((vec!["456"], 1)), false)];
        let rows = normalize_lots(&lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "123, 456");
        assert_eq!(rows[0].quantity, 3);
        assert!(!rows[0].is_low_stock);
        assert_eq!(rows[0].display_text, "Big: 123 (Qty: 2) | Small: 456 (Qty: 1)");
        assert_eq!(rows[0].big_quantity, 2);
        assert_eq!(rows[0].small_quantity, 1);
        assert_eq!(rows[0].primary_part_number(), Some("123"));
    }

    #[test]
    fn test_variant_lot_with_only_big_side() {
        let lots = vec![variant_lot("A2", Some((vec!["846015", "825758"], 2)), None, false)];
        let rows = normalize_lots(&lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "846015, 825758");
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].display_text, "Big: 846015, 825758 (Qty: 2)");
        assert!(rows[0].small_part_numbers.is_empty());
    }

    #[test]
    fn test_variant_lot_with_both_sides_empty_is_dropped() {
        let lots = vec![
            variant_lot("A3", Some((vec![""], 5)), Some((vec![], 3)), false),
            variant_lot("A4", None, None, false),
        ];
        assert!(normalize_lots(&lots).is_empty());
    }

    #[test]
    fn test_blank_variant_contributes_no_quantity() {
        // A big side with only blank part numbers must not leak its quantity.
        let lots = vec![variant_lot("A5", Some((vec!["  "], 9)), Some((vec!["456"], 1)), false)];
        let rows = normalize_lots(&lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[0].id, "456");
    }

    #[test]
    fn test_row_order_follows_lot_order() {
        let lots = vec![
            simple_lot("B1", &["111"], 1, false),
            variant_lot("B2", Some((vec!["222"], 1)), None, false),
            simple_lot("B3", &["333"], 1, false),
        ];
        let ids: Vec<_> = normalize_lots(&lots).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["111", "222", "333"]);
    }

    #[test]
    fn test_low_stock_thresholds() {
        assert!(is_low_stock(5, true));
        assert!(!is_low_stock(6, true));
        assert!(is_low_stock(1, false));
        assert!(!is_low_stock(2, false));
        assert!(is_low_stock(0, false));
        assert!(is_low_stock(0, true));
    }

    #[test]
    fn test_priority_flag_carries_to_row() {
        let lots = vec![simple_lot("B6", &["846015"], 4, true)];
        let rows = normalize_lots(&lots);
        assert!(rows[0].priority);
        // 4 <= 5 under the relaxed priority threshold.
        assert!(rows[0].is_low_stock);
    }

    proptest! {
        #[test]
        fn prop_low_stock_matches_rule(quantity in 0i64..10_000, priority: bool) {
            let expected = if priority { quantity <= 5 } else { quantity <= 1 };
            prop_assert_eq!(is_low_stock(quantity, priority), expected);
        }

        #[test]
        fn prop_simple_lot_keeps_quantity_and_id(
            parts in proptest::collection::vec("[A-Z0-9]{3,8}", 1..5),
            quantity in 0i64..1_000,
            priority: bool,
        ) {
            let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
            let lots = vec![simple_lot("B1", &refs, quantity, priority)];
            let rows = normalize_lots(&lots);
            prop_assert_eq!(rows.len(), 1);
            prop_assert_eq!(rows[0].quantity, quantity);
            prop_assert_eq!(&rows[0].id, &parts.join(", "));
            prop_assert_eq!(rows[0].is_low_stock, is_low_stock(quantity, priority));
        }

        #[test]
        fn prop_variant_quantity_is_sum_of_sides(
            big_qty in 0i64..1_000,
            small_qty in 0i64..1_000,
        ) {
            let lots = vec![variant_lot(
                "A1",
                Some((vec!["111"], big_qty)),
                Some((vec!["222"], small_qty)),
                false,
            )];
            let rows = normalize_lots(&lots);
            prop_assert_eq!(rows.len(), 1);
            prop_assert_eq!(rows[0].quantity, big_qty + small_qty);
        }
    }
}
