//! Read-side monthly aggregation.
//!
//! Everything here is a projection recomputed from the document on each read;
//! none of these types are ever persisted. Shared amounts are always derived
//! from the full amount and the class's current member count, so views stay
//! correct after membership churn even when the stored share is stale.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    core::split,
    domain::{Document, Expense},
    errors::{CoreError, CoreResult},
};

/// One expense as presented to the caller, annotated with its class and
/// per-member share when it came from a shared ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_amount: Option<f64>,
}

impl ExpenseView {
    pub fn personal(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            product_name: expense.product_name.clone(),
            category: expense.category.clone(),
            date: expense.date,
            amount: expense.amount,
            class_name: None,
            shared_amount: None,
        }
    }

    pub fn shared(expense: &Expense, class_name: &str, share: f64) -> Self {
        Self {
            class_name: Some(class_name.to_owned()),
            shared_amount: Some(share),
            ..Self::personal(expense)
        }
    }

    /// What this view contributes to a bucket total: the per-member share
    /// for shared expenses, the full amount otherwise.
    pub fn effective_amount(&self) -> f64 {
        self.shared_amount.unwrap_or(self.amount)
    }
}

/// Expenses of one calendar month with their summed effective amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    /// Display key, e.g. "March 2024".
    pub month: String,
    pub total: f64,
    pub items: Vec<ExpenseView>,
}

/// Personal and shared totals across all months, as shown on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerTotals {
    pub personal: f64,
    pub shared: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Groups expense views into per-month buckets, ordered chronologically.
    pub fn group_by_month(items: Vec<ExpenseView>) -> Vec<MonthBucket> {
        let mut buckets: Vec<MonthBucket> = Vec::new();
        for item in items {
            push_into_month(&mut buckets, item);
        }
        finalize(&mut buckets);
        buckets
    }

    /// Overlays shared expenses onto personal month buckets.
    ///
    /// An id already present in some bucket has its share overwritten in
    /// place; anything else lands in the find-or-create bucket for its
    /// month. Totals are recomputed from the item lists afterwards, so an
    /// in-place overwrite can never leave a bucket total inconsistent.
    pub fn merge_views(
        mut buckets: Vec<MonthBucket>,
        shared: Vec<ExpenseView>,
    ) -> Vec<MonthBucket> {
        for view in shared {
            let existing = buckets.iter().enumerate().find_map(|(bucket_idx, bucket)| {
                bucket
                    .items
                    .iter()
                    .position(|item| item.id == view.id)
                    .map(|item_idx| (bucket_idx, item_idx))
            });
            match existing {
                Some((bucket_idx, item_idx)) => {
                    let item = &mut buckets[bucket_idx].items[item_idx];
                    item.shared_amount = view.shared_amount;
                    item.class_name = view.class_name;
                }
                None => push_into_month(&mut buckets, view),
            }
        }
        finalize(&mut buckets);
        buckets
    }

    /// All shared expenses visible to the user, with shares recomputed from
    /// live membership. Dangling class references are skipped.
    pub fn shared_expenses_for(document: &Document, username: &str) -> CoreResult<Vec<ExpenseView>> {
        let user = document
            .user(username)
            .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;

        let mut views = Vec::new();
        for class_id in &user.joined_classes {
            let Some(class) = document.class(class_id) else {
                tracing::warn!(%username, %class_id, "user references a missing class");
                continue;
            };
            if !class.is_member(username) {
                continue;
            }
            for expense in &class.expenses {
                let share = split::compute_share(expense.amount, class.member_count())?;
                views.push(ExpenseView::shared(expense, &class.class_name, share));
            }
        }
        Ok(views)
    }

    /// The combined monthly report: personal buckets merged with every
    /// shared expense the user can see.
    pub fn monthly_overview(document: &Document, username: &str) -> CoreResult<Vec<MonthBucket>> {
        let user = document
            .user(username)
            .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;
        let personal = user.expenses.iter().map(ExpenseView::personal).collect();
        let buckets = Self::group_by_month(personal);
        let shared = Self::shared_expenses_for(document, username)?;
        Ok(Self::merge_views(buckets, shared))
    }

    /// Running totals for the overview header.
    pub fn totals(document: &Document, username: &str) -> CoreResult<LedgerTotals> {
        let user = document
            .user(username)
            .ok_or_else(|| CoreError::NotFound(format!("user `{username}`")))?;
        let personal = user.expenses.iter().map(|expense| expense.amount).sum();
        let shared = Self::shared_expenses_for(document, username)?
            .iter()
            .map(ExpenseView::effective_amount)
            .sum();
        Ok(LedgerTotals { personal, shared })
    }
}

fn month_key(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Appends the view to the bucket for its month, creating one if needed.
fn push_into_month(buckets: &mut Vec<MonthBucket>, view: ExpenseView) {
    let key = month_key(view.date);
    match buckets.iter().position(|bucket| bucket.month == key) {
        Some(index) => buckets[index].items.push(view),
        None => buckets.push(MonthBucket {
            month: key,
            total: 0.0,
            items: vec![view],
        }),
    }
}

/// Recomputes every bucket total from its items and orders buckets
/// chronologically. Buckets always hold at least one item.
fn finalize(buckets: &mut [MonthBucket]) {
    for bucket in buckets.iter_mut() {
        bucket.total = bucket.items.iter().map(ExpenseView::effective_amount).sum();
    }
    buckets.sort_by_key(|bucket| {
        bucket
            .items
            .first()
            .map(|item| (item.date.year(), item.date.month()))
            .unwrap_or_default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{ExpenseService, MembershipService},
        domain::{ExpenseInput, User},
    };

    fn view(id: i64, date: (i32, u32, u32), amount: f64) -> ExpenseView {
        ExpenseView {
            id,
            product_name: format!("item-{id}"),
            category: "General".into(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount,
            class_name: None,
            shared_amount: None,
        }
    }

    fn shared_view(id: i64, date: (i32, u32, u32), amount: f64, share: f64) -> ExpenseView {
        ExpenseView {
            class_name: Some("Class-1".into()),
            shared_amount: Some(share),
            ..view(id, date, amount)
        }
    }

    #[test]
    fn groups_by_calendar_month_with_totals() {
        let buckets = SummaryService::group_by_month(vec![
            view(1, (2024, 1, 15), 20.0),
            view(2, (2024, 2, 1), 30.0),
        ]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month, "January 2024");
        assert_eq!(buckets[0].total, 20.0);
        assert_eq!(buckets[1].month, "February 2024");
        assert_eq!(buckets[1].total, 30.0);
    }

    #[test]
    fn buckets_are_ordered_chronologically_across_years() {
        let buckets = SummaryService::group_by_month(vec![
            view(1, (2024, 2, 10), 1.0),
            view(2, (2023, 12, 1), 2.0),
            view(3, (2024, 1, 5), 3.0),
        ]);
        let months: Vec<_> = buckets.iter().map(|bucket| bucket.month.as_str()).collect();
        assert_eq!(months, ["December 2023", "January 2024", "February 2024"]);
    }

    #[test]
    fn same_month_name_in_different_years_stays_separate() {
        let buckets = SummaryService::group_by_month(vec![
            view(1, (2023, 3, 1), 5.0),
            view(2, (2024, 3, 1), 7.0),
        ]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month, "March 2023");
        assert_eq!(buckets[1].month, "March 2024");
    }

    #[test]
    fn merge_appends_shared_expenses_into_their_month() {
        let buckets = SummaryService::group_by_month(vec![view(1, (2024, 1, 15), 20.0)]);
        let merged =
            SummaryService::merge_views(buckets, vec![shared_view(2, (2024, 1, 20), 40.0, 20.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].items.len(), 2);
        assert_eq!(merged[0].total, 40.0, "20 personal + 20 share");
    }

    #[test]
    fn merge_creates_new_buckets_for_unseen_months() {
        let buckets = SummaryService::group_by_month(vec![view(1, (2024, 1, 15), 20.0)]);
        let merged =
            SummaryService::merge_views(buckets, vec![shared_view(2, (2024, 3, 2), 60.0, 30.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].month, "March 2024");
        assert_eq!(merged[1].total, 30.0);
    }

    #[test]
    fn merge_overwrite_keeps_totals_consistent() {
        // Same id on both sides: the merge must overwrite the share in place
        // and the bucket total must reflect the overwritten value.
        let buckets = SummaryService::group_by_month(vec![view(5, (2024, 1, 15), 100.0)]);
        let merged =
            SummaryService::merge_views(buckets, vec![shared_view(5, (2024, 1, 15), 100.0, 25.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].items.len(), 1);
        assert_eq!(merged[0].total, 25.0);
    }

    #[test]
    fn merged_totals_conserve_input_amounts() {
        let personal = vec![view(1, (2024, 1, 3), 10.0), view(2, (2024, 2, 3), 15.0)];
        let shared = vec![
            shared_view(3, (2024, 1, 9), 50.0, 25.0),
            shared_view(4, (2024, 4, 9), 30.0, 10.0),
        ];
        let expected: f64 = 10.0 + 15.0 + 25.0 + 10.0;

        let merged = SummaryService::merge_views(SummaryService::group_by_month(personal), shared);
        let total: f64 = merged.iter().map(|bucket| bucket.total).sum();
        assert!((total - expected).abs() < 1e-9, "got {total}");
    }

    #[test]
    fn shared_views_recompute_stale_stored_shares() {
        let mut document = Document::default();
        for name in ["alice", "bob", "carol"] {
            document
                .users
                .push(User::new(name, format!("{name}@example.com"), "pw"));
        }
        let class_id = MembershipService::create_class(&mut document, "alice").expect("create");
        MembershipService::join_class(&mut document, "bob", &class_id).expect("join");
        let input = ExpenseInput {
            product_name: "Rent".into(),
            category: "Housing".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            amount: 100.0,
        };
        ExpenseService::add(&mut document, "alice", &input, Some(&class_id)).expect("add");
        // Stored share is 50; carol joining makes it stale.
        MembershipService::join_class(&mut document, "carol", &class_id).expect("join");

        for member in ["alice", "bob", "carol"] {
            let views = SummaryService::shared_expenses_for(&document, member).expect("views");
            assert_eq!(views.len(), 1);
            let share = views[0].shared_amount.expect("share present");
            assert!((share - 100.0 / 3.0).abs() < 1e-9, "got {share}");
        }
    }

    #[test]
    fn totals_split_personal_and_shared() {
        let mut document = Document::default();
        for name in ["alice", "bob"] {
            document
                .users
                .push(User::new(name, format!("{name}@example.com"), "pw"));
        }
        let class_id = MembershipService::create_class(&mut document, "alice").expect("create");
        MembershipService::join_class(&mut document, "bob", &class_id).expect("join");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let personal = ExpenseInput {
            product_name: "Book".into(),
            category: "Leisure".into(),
            date,
            amount: 12.0,
        };
        let shared = ExpenseInput {
            product_name: "Pizza".into(),
            category: "Food".into(),
            date,
            amount: 100.0,
        };
        ExpenseService::add(&mut document, "alice", &personal, None).expect("add");
        ExpenseService::add(&mut document, "alice", &shared, Some(&class_id)).expect("add");

        let totals = SummaryService::totals(&document, "alice").expect("totals");
        assert_eq!(totals.personal, 12.0);
        assert_eq!(totals.shared, 50.0);

        let bob = SummaryService::totals(&document, "bob").expect("totals");
        assert_eq!(bob.personal, 0.0);
        assert_eq!(bob.shared, 50.0);
    }
}
