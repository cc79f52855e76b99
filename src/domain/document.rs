use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{group::Group, user::User};

/// The whole persisted application state: every user and every class. The
/// storage layer loads and saves it as one unit.
///
/// A class id listed in some user's `joined_classes` but absent from
/// `classes` is tolerated on read paths (skipped with a warning); mutation
/// paths never create such a reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub classes: BTreeMap<String, Group>,
}

impl Document {
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.username == username)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    pub fn class(&self, class_id: &str) -> Option<&Group> {
        self.classes.get(class_id)
    }

    pub fn class_mut(&mut self, class_id: &str) -> Option<&mut Group> {
        self.classes.get_mut(class_id)
    }
}
