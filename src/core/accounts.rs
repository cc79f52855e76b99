//! User registration. Credential comparison lives outside the core; this
//! module only guards the document's uniqueness invariant.

use crate::{
    domain::{Document, User},
    errors::{CoreError, CoreResult},
};

pub struct AccountService;

impl AccountService {
    /// Appends a new user with empty ledgers. Usernames and emails are both
    /// unique across the document.
    pub fn register(
        document: &mut Document,
        username: &str,
        email: &str,
        password: &str,
    ) -> CoreResult<()> {
        if username.trim().is_empty() {
            return Err(CoreError::Validation("username is required".into()));
        }
        if email.trim().is_empty() {
            return Err(CoreError::Validation("email is required".into()));
        }
        if document.user_by_email(email).is_some() {
            return Err(CoreError::AlreadyExists(format!("email `{email}`")));
        }
        if document.user(username).is_some() {
            return Err(CoreError::AlreadyExists(format!("user `{username}`")));
        }

        document.users.push(User::new(username, email, password));
        tracing::info!(%username, "registered user");
        Ok(())
    }
}
