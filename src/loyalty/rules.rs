use crate::error::ApiError;

/// Decides a catalog redemption for an already-loaded balance.
///
/// The key must be sold before the balance is even looked at, so an unknown
/// key never leaks balance information. Returns the cost to debit.
pub fn decide_catalog_redemption(
    cost: Option<i32>,
    kind: &'static str,
    key: &str,
    balance: i32,
) -> Result<i32, ApiError> {
    let cost = cost.ok_or_else(|| ApiError::InvalidOption {
        kind,
        key: key.to_string(),
    })?;
    check_balance(balance, cost)?;
    Ok(cost)
}

/// A cost of zero is always affordable, whatever the balance.
pub fn check_balance(balance: i32, cost: i32) -> Result<(), ApiError> {
    if cost > 0 && balance < cost {
        return Err(ApiError::InsufficientPoints { balance, cost });
    }
    Ok(())
}

/// Resolves the cost of a freeform redemption, falling back to the catalog
/// default when the request names none.
pub fn custom_cost(requested: Option<i32>, default: i32) -> Result<i32, ApiError> {
    let cost = requested.unwrap_or(default);
    if cost < 0 {
        return Err(ApiError::Validation("cost must not be negative".into()));
    }
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_point_user_cannot_afford_a_thirty_point_item() {
        let err = decide_catalog_redemption(Some(30), "avatar", "dragon", 0).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InsufficientPoints {
                balance: 0,
                cost: 30
            }
        ));
    }

    #[test]
    fn free_items_redeem_regardless_of_balance() {
        assert_eq!(
            decide_catalog_redemption(Some(0), "theme", "default", 0).unwrap(),
            0
        );
        assert!(check_balance(0, 0).is_ok());
    }

    #[test]
    fn unknown_key_is_rejected_before_the_balance_is_considered() {
        // balance 0 would also fail the affordability check; the error must
        // still be the option one.
        let err = decide_catalog_redemption(None, "avatar", "wizard", 0).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidOption { kind: "avatar", ref key } if key == "wizard"
        ));
    }

    #[test]
    fn exact_balance_is_enough() {
        assert_eq!(
            decide_catalog_redemption(Some(30), "theme", "neon", 30).unwrap(),
            30
        );
    }

    #[test]
    fn one_point_short_is_not_enough() {
        let err = check_balance(29, 30).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InsufficientPoints {
                balance: 29,
                cost: 30
            }
        ));
    }

    #[test]
    fn custom_cost_defaults_from_the_catalog() {
        assert_eq!(custom_cost(None, 100).unwrap(), 100);
        assert_eq!(custom_cost(Some(40), 100).unwrap(), 40);
    }

    #[test]
    fn negative_custom_cost_is_rejected() {
        assert!(matches!(
            custom_cost(Some(-1), 100).unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
