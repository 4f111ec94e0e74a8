//! Validation rules for the stock entry and sell forms
//!
//! Validation happens before any network call; a failed check surfaces as an
//! inline notification and mutates nothing.

/// Split a comma-separated part-number field into trimmed, non-empty entries.
pub fn split_part_numbers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate a lot without size variants: bay location, at least one model,
/// and a non-negative quantity.
pub fn validate_simple_lot(
    models: &[String],
    location: &str,
    quantity: i64,
) -> Result<(), &'static str> {
    if location.trim().is_empty() {
        return Err("Please enter a bay location");
    }
    if models.iter().all(|m| m.trim().is_empty()) {
        return Err("Please enter at least one model");
    }
    if quantity < 0 {
        return Err("Please enter a valid quantity");
    }
    Ok(())
}

/// Validate a big/small variant lot: bay location, at least one variant with
/// models, and a non-negative quantity for each supplied side.
pub fn validate_variant_lot(
    location: &str,
    big_models: &[String],
    big_quantity: i64,
    small_models: &[String],
    small_quantity: i64,
) -> Result<(), &'static str> {
    if location.trim().is_empty() {
        return Err("Please enter a bay location");
    }
    let has_big = big_models.iter().any(|m| !m.trim().is_empty());
    let has_small = small_models.iter().any(|m| !m.trim().is_empty());
    if !has_big && !has_small {
        return Err("Please enter big or small models");
    }
    if has_big && big_quantity < 0 {
        return Err("Big quantity cannot be negative");
    }
    if has_small && small_quantity < 0 {
        return Err("Small quantity cannot be negative");
    }
    Ok(())
}

/// Validate a sell request against the stock shown on the row.
pub fn validate_sell_quantity(requested: i64, available: i64) -> Result<(), &'static str> {
    if requested < 1 {
        return Err("Sell quantity must be at least 1");
    }
    if requested > available {
        return Err("Not enough stock for the requested quantity");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(items: &[&str]) -> Vec<String> {
        items.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_split_part_numbers_trims_and_drops_empties() {
        assert_eq!(
            split_part_numbers("846015, 825758 ,, 883860 "),
            vec!["846015", "825758", "883860"]
        );
        assert!(split_part_numbers("  , ,").is_empty());
        assert!(split_part_numbers("").is_empty());
    }

    #[test]
    fn test_validate_simple_lot_ok() {
        assert!(validate_simple_lot(&models(&["846015"]), "B4", 3).is_ok());
        // Zero quantity is a legitimate out-of-stock entry.
        assert!(validate_simple_lot(&models(&["846015"]), "B4", 0).is_ok());
    }

    #[test]
    fn test_validate_simple_lot_rejects_missing_fields() {
        assert!(validate_simple_lot(&models(&["846015"]), "  ", 3).is_err());
        assert!(validate_simple_lot(&models(&["", " "]), "B4", 3).is_err());
        assert!(validate_simple_lot(&[], "B4", 3).is_err());
        assert!(validate_simple_lot(&models(&["846015"]), "B4", -1).is_err());
    }

    #[test]
    fn test_validate_variant_lot_requires_one_side() {
        assert!(validate_variant_lot("A1", &models(&["111"]), 2, &[], 0).is_ok());
        assert!(validate_variant_lot("A1", &[], 0, &models(&["222"]), 1).is_ok());
        assert!(validate_variant_lot("A1", &[], 0, &[], 0).is_err());
        assert!(validate_variant_lot("", &models(&["111"]), 2, &[], 0).is_err());
    }

    #[test]
    fn test_validate_variant_lot_rejects_negative_supplied_side() {
        assert!(validate_variant_lot("A1", &models(&["111"]), -1, &[], 0).is_err());
        assert!(validate_variant_lot("A1", &models(&["111"]), 2, &models(&["222"]), -3).is_err());
        // A negative quantity on an absent side is ignored.
        assert!(validate_variant_lot("A1", &models(&["111"]), 2, &[], -3).is_ok());
    }

    #[test]
    fn test_validate_sell_quantity_bounds() {
        assert!(validate_sell_quantity(1, 1).is_ok());
        assert!(validate_sell_quantity(3, 5).is_ok());
        assert!(validate_sell_quantity(0, 5).is_err());
        assert!(validate_sell_quantity(-2, 5).is_err());
        assert!(validate_sell_quantity(6, 5).is_err());
    }
}
