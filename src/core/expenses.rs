//! Expense creation, editing, and deletion with ledger resolution.
//!
//! Expense ids are unique only within one ledger, so every edit and delete
//! first resolves which ledger holds the id: the caller's personal ledger
//! takes priority, then the shared ledgers of joined classes in join order,
//! first match wins. The resolved [`LedgerRef`] pins the mutation to one
//! concrete ledger before anything is touched.

use crate::{
    core::split,
    domain::{allocate_id, Document, Expense, ExpenseInput},
    errors::{CoreError, CoreResult},
};

/// The concrete ledger an expense id resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRef {
    /// The acting user's personal expense list.
    Personal,
    /// The shared list of the class with this id.
    Shared(String),
}

/// Validated create/edit/delete operations over both kinds of ledger.
pub struct ExpenseService;

impl ExpenseService {
    /// Records a new expense and returns its id.
    ///
    /// The placement decision is binary and made exactly once: the expense
    /// goes to the class ledger iff `target_class` names an existing class
    /// the user belongs to, otherwise it falls back to the personal ledger.
    pub fn add(
        document: &mut Document,
        username: &str,
        input: &ExpenseInput,
        target_class: Option<&str>,
    ) -> CoreResult<i64> {
        input.validate()?;
        if document.user(username).is_none() {
            return Err(CoreError::NotFound(format!("user `{username}`")));
        }

        let shared_target = target_class
            .and_then(|class_id| document.class(class_id))
            .filter(|class| class.is_member(username))
            .map(|class| class.class_id.clone());

        match shared_target {
            Some(class_id) => {
                let class = document
                    .class_mut(&class_id)
                    .ok_or_else(|| CoreError::NotFound(format!("class `{class_id}`")))?;
                let share = split::compute_share(input.amount, class.member_count())?;
                let id = allocate_id(class.expenses.iter().map(|expense| expense.id));
                class
                    .expenses
                    .push(Expense::shared(id, input, username, share));
                tracing::debug!(%username, %class_id, id, "added shared expense");
                Ok(id)
            }
            None => {
                let user = document
                    .user_mut(username)
                    .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;
                let id = allocate_id(user.expenses.iter().map(|expense| expense.id));
                user.expenses.push(Expense::personal(id, input));
                tracing::debug!(%username, id, "added personal expense");
                Ok(id)
            }
        }
    }

    /// Locates the ledger holding `expense_id` among those the user can
    /// reach. Personal ledger first, then joined classes in join order.
    pub fn resolve(document: &Document, username: &str, expense_id: i64) -> CoreResult<LedgerRef> {
        let user = document
            .user(username)
            .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;

        if user.expenses.iter().any(|expense| expense.id == expense_id) {
            return Ok(LedgerRef::Personal);
        }

        for class_id in &user.joined_classes {
            match document.class(class_id) {
                Some(class) => {
                    if class.expenses.iter().any(|expense| expense.id == expense_id) {
                        return Ok(LedgerRef::Shared(class_id.clone()));
                    }
                }
                // Tolerated dangling reference; see `Document` docs.
                None => tracing::warn!(%username, %class_id, "user references a missing class"),
            }
        }

        Err(CoreError::NotFound(format!("expense {expense_id}")))
    }

    /// Edits the mutable fields of the expense in place. A shared match has
    /// its stored share recomputed from the new amount and the class's
    /// current member count.
    pub fn edit(
        document: &mut Document,
        username: &str,
        expense_id: i64,
        input: &ExpenseInput,
    ) -> CoreResult<LedgerRef> {
        input.validate()?;
        let ledger = Self::resolve(document, username, expense_id)?;

        match &ledger {
            LedgerRef::Personal => {
                let user = document
                    .user_mut(username)
                    .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;
                let expense = user
                    .expenses
                    .iter_mut()
                    .find(|expense| expense.id == expense_id)
                    .ok_or_else(|| CoreError::NotFound(format!("expense {expense_id}")))?;
                expense.apply(input);
            }
            LedgerRef::Shared(class_id) => {
                let class = document
                    .class_mut(class_id)
                    .ok_or_else(|| CoreError::NotFound(format!("class `{class_id}`")))?;
                let share = split::compute_share(input.amount, class.member_count())?;
                let expense = class
                    .expenses
                    .iter_mut()
                    .find(|expense| expense.id == expense_id)
                    .ok_or_else(|| CoreError::NotFound(format!("expense {expense_id}")))?;
                expense.apply(input);
                expense.shared_amount = Some(share);
            }
        }

        tracing::debug!(%username, expense_id, ?ledger, "edited expense");
        Ok(ledger)
    }

    /// Removes exactly one record: the first match in resolution order. A
    /// second delete of the same id reports `NotFound` instead of removing
    /// anything else.
    pub fn delete(document: &mut Document, username: &str, expense_id: i64) -> CoreResult<LedgerRef> {
        let ledger = Self::resolve(document, username, expense_id)?;

        match &ledger {
            LedgerRef::Personal => {
                let user = document
                    .user_mut(username)
                    .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;
                if let Some(position) = user
                    .expenses
                    .iter()
                    .position(|expense| expense.id == expense_id)
                {
                    user.expenses.remove(position);
                }
            }
            LedgerRef::Shared(class_id) => {
                let class = document
                    .class_mut(class_id)
                    .ok_or_else(|| CoreError::NotFound(format!("class `{class_id}`")))?;
                if let Some(position) = class
                    .expenses
                    .iter()
                    .position(|expense| expense.id == expense_id)
                {
                    class.expenses.remove(position);
                }
            }
        }

        tracing::debug!(%username, expense_id, ?ledger, "deleted expense");
        Ok(ledger)
    }
}
