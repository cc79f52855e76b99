use serde::{Deserialize, Serialize};

use super::expense::Expense;

/// An account holder with a personal expense ledger and the set of classes
/// they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    /// Opaque credential. The core stores it verbatim and never compares it.
    pub password: String,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Class ids in join order; this order drives expense resolution.
    #[serde(default)]
    pub joined_classes: Vec<String>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            expenses: Vec::new(),
            joined_classes: Vec::new(),
        }
    }

    pub fn has_joined(&self, class_id: &str) -> bool {
        self.joined_classes.iter().any(|id| id == class_id)
    }
}
