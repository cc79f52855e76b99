//! Services operating on an in-memory [`Document`](crate::domain::Document).
//!
//! All services are pure, synchronous transformations; persistence happens
//! only through [`DocumentStore`].

pub mod accounts;
pub mod expenses;
pub mod membership;
pub mod split;
pub mod store;
pub mod summary;

pub use accounts::AccountService;
pub use expenses::{ExpenseService, LedgerRef};
pub use membership::MembershipService;
pub use store::DocumentStore;
pub use summary::{ExpenseView, LedgerTotals, MonthBucket, SummaryService};
