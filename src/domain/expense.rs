use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// A single expense record, owned by exactly one ledger (a user's personal
/// list or one class's shared list) for its whole lifetime.
///
/// Serialized field names follow the persisted camelCase layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique within the owning ledger only, never across ledgers.
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub date: NaiveDate,
    /// Full original amount. For shared expenses this is what the whole
    /// class was charged, not the per-member share.
    pub amount: f64,
    /// Username of the creator. Present only on shared expenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    /// Per-member share captured when the record was last written. Readers
    /// must recompute it from `amount` and live membership; the stored value
    /// goes stale when membership changes without a matching edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_amount: Option<f64>,
}

impl Expense {
    pub fn personal(id: i64, input: &ExpenseInput) -> Self {
        Self {
            id,
            product_name: input.product_name.clone(),
            category: input.category.clone(),
            date: input.date,
            amount: input.amount,
            added_by: None,
            shared_amount: None,
        }
    }

    pub fn shared(id: i64, input: &ExpenseInput, added_by: &str, shared_amount: f64) -> Self {
        Self {
            added_by: Some(added_by.to_owned()),
            shared_amount: Some(shared_amount),
            ..Self::personal(id, input)
        }
    }

    /// Applies an edit to the mutable fields, leaving identity and ownership
    /// markers untouched.
    pub fn apply(&mut self, input: &ExpenseInput) {
        self.product_name = input.product_name.clone();
        self.category = input.category.clone();
        self.date = input.date;
        self.amount = input.amount;
    }
}

/// Caller-supplied fields for creating or editing an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub product_name: String,
    pub category: String,
    pub date: NaiveDate,
    pub amount: f64,
}

impl ExpenseInput {
    pub fn validate(&self) -> CoreResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(CoreError::Validation("product name is required".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(CoreError::Validation(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Allocates a timestamp-derived expense id that is strictly greater than
/// every id already present in the target ledger, so two records created in
/// the same instant can never collide within one ledger.
pub fn allocate_id<I>(existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let now = Utc::now().timestamp_millis();
    match existing.into_iter().max() {
        Some(max) => now.max(max + 1),
        None => now,
    }
}
