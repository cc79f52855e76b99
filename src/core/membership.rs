//! Class creation and membership.
//!
//! Invariant maintained here: a class's `members` list and each member's
//! `joined_classes` stay mutually consistent after every operation.

use uuid::Uuid;

use crate::{
    domain::{Document, Group},
    errors::{CoreError, CoreResult},
};

pub struct MembershipService;

impl MembershipService {
    /// Creates a class with the creator as sole member and returns its id.
    ///
    /// The display name is `Class-N` where N is one more than the current
    /// class count; classes are never deleted, so the counter never reuses a
    /// label.
    pub fn create_class(document: &mut Document, creator: &str) -> CoreResult<String> {
        let user = document
            .user_mut(creator)
            .ok_or_else(|| CoreError::NotFound(format!("user `{creator}`")))?;

        let class_id = Uuid::new_v4().to_string();
        user.joined_classes.push(class_id.clone());

        let class_name = format!("Class-{}", document.classes.len() + 1);
        document.classes.insert(
            class_id.clone(),
            Group::new(class_id.as_str(), class_name.as_str(), creator),
        );

        tracing::info!(%creator, %class_id, %class_name, "created class");
        Ok(class_id)
    }

    /// Adds the user to the class. Idempotent: joining a class twice leaves
    /// the document unchanged.
    pub fn join_class(document: &mut Document, username: &str, class_id: &str) -> CoreResult<()> {
        if document.user(username).is_none() {
            return Err(CoreError::NotFound(format!("user `{username}`")));
        }
        let class = document
            .class(class_id)
            .ok_or_else(|| CoreError::NotFound(format!("class `{class_id}`")))?;
        if class.is_member(username) {
            tracing::debug!(%username, %class_id, "already a member");
            return Ok(());
        }

        if let Some(user) = document.user_mut(username) {
            if !user.has_joined(class_id) {
                user.joined_classes.push(class_id.to_owned());
            }
        }
        if let Some(class) = document.class_mut(class_id) {
            class.members.push(username.to_owned());
        }

        tracing::info!(%username, %class_id, "joined class");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    fn document_with_users(names: &[&str]) -> Document {
        let mut document = Document::default();
        for name in names {
            document
                .users
                .push(User::new(*name, format!("{name}@example.com"), "pw"));
        }
        document
    }

    #[test]
    fn create_class_registers_both_sides_of_the_membership() {
        let mut document = document_with_users(&["alice"]);
        let class_id = MembershipService::create_class(&mut document, "alice").expect("create");

        let class = document.class(&class_id).expect("class present");
        assert_eq!(class.members, vec!["alice"]);
        assert_eq!(class.class_name, "Class-1");
        assert!(class.expenses.is_empty());
        assert!(document.user("alice").unwrap().has_joined(&class_id));
    }

    #[test]
    fn class_names_count_up() {
        let mut document = document_with_users(&["alice"]);
        MembershipService::create_class(&mut document, "alice").expect("create");
        let second = MembershipService::create_class(&mut document, "alice").expect("create");
        assert_eq!(document.class(&second).unwrap().class_name, "Class-2");
    }

    #[test]
    fn create_class_requires_an_existing_creator() {
        let mut document = Document::default();
        let err = MembershipService::create_class(&mut document, "ghost").expect_err("must fail");
        assert!(err.is_not_found(), "got {err:?}");
        assert!(document.classes.is_empty());
    }

    #[test]
    fn join_class_is_idempotent() {
        let mut document = document_with_users(&["alice", "bob"]);
        let class_id = MembershipService::create_class(&mut document, "alice").expect("create");

        MembershipService::join_class(&mut document, "bob", &class_id).expect("first join");
        MembershipService::join_class(&mut document, "bob", &class_id).expect("second join");

        assert_eq!(document.class(&class_id).unwrap().members, vec!["alice", "bob"]);
        let bob = document.user("bob").unwrap();
        assert_eq!(bob.joined_classes, vec![class_id]);
    }

    #[test]
    fn join_unknown_class_reports_not_found() {
        let mut document = document_with_users(&["bob"]);
        let err =
            MembershipService::join_class(&mut document, "bob", "missing").expect_err("must fail");
        assert!(err.is_not_found(), "got {err:?}");
        assert!(document.user("bob").unwrap().joined_classes.is_empty());
    }
}
