use crate::errors::{CoreError, CoreResult};

/// Computes the even per-member share of a shared expense.
///
/// A class can never reach zero members through the supported operations, so
/// `EmptyGroup` only fires on a corrupted document.
pub fn compute_share(amount: f64, member_count: usize) -> CoreResult<f64> {
    if member_count == 0 {
        return Err(CoreError::EmptyGroup);
    }
    Ok(amount / member_count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_evenly_across_members() {
        assert_eq!(compute_share(100.0, 2).unwrap(), 50.0);
        assert_eq!(compute_share(100.0, 4).unwrap(), 25.0);
    }

    #[test]
    fn single_member_keeps_the_full_amount() {
        assert_eq!(compute_share(42.5, 1).unwrap(), 42.5);
    }

    #[test]
    fn zero_members_is_an_error() {
        let err = compute_share(10.0, 0).expect_err("zero members must fail");
        assert!(matches!(err, CoreError::EmptyGroup), "got {err:?}");
    }
}
