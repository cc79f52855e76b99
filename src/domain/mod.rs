//! Serde data model for the persisted document: users, classes, and the
//! expense records their ledgers hold.

pub mod document;
pub mod expense;
pub mod group;
pub mod user;

pub use document::Document;
pub use expense::{allocate_id, Expense, ExpenseInput};
pub use group::Group;
pub use user::User;
