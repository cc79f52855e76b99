use serde::{Deserialize, Serialize};

use super::expense::Expense;

/// A shared-ledger class: a named set of members splitting every expense in
/// its ledger evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub class_id: String,
    /// Display label assigned at creation; not unique.
    pub class_name: String,
    /// Usernames in join order, never empty after creation.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn new(
        class_id: impl Into<String>,
        class_name: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            class_name: class_name.into(),
            members: vec![creator.into()],
            expenses: Vec::new(),
        }
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|member| member == username)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
