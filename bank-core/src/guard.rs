//! Session state and role-based authorization guards
//!
//! A [`Session`] is an explicit value created by a successful login and
//! passed into every gated operation; the engine holds no ambient
//! current-user state, so any number of sessions may coexist.

use crate::{types::Role, Error, Result};

/// An authenticated caller
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    role: Role,
}

impl Session {
    pub(crate) fn new(username: String, role: Role) -> Self {
        Self { username, role }
    }

    /// Username this session was authenticated as
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role held at login time
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Require a logged-in caller holding exactly `required`
///
/// `None` means no caller is logged in; both cases are rejected with
/// `Unauthorized` before any state is touched.
pub fn require_role<'a>(session: Option<&'a Session>, required: Role) -> Result<&'a Session> {
    let session = session.ok_or_else(|| Error::Unauthorized("not logged in".to_string()))?;

    match (session.role, required) {
        (Role::Client, Role::Client)
        | (Role::Employee, Role::Employee)
        | (Role::Admin, Role::Admin) => Ok(session),
        (actual, required) => Err(Error::Unauthorized(format!(
            "requires {} role, caller '{}' is {}",
            required,
            session.username(),
            actual
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_role_passes() {
        let session = Session::new("alice".to_string(), Role::Client);
        let granted = require_role(Some(&session), Role::Client).unwrap();
        assert_eq!(granted.username(), "alice");
    }

    #[test]
    fn test_wrong_role_rejected() {
        let session = Session::new("carol".to_string(), Role::Employee);
        assert!(matches!(
            require_role(Some(&session), Role::Admin),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_no_session_rejected() {
        assert!(matches!(
            require_role(None, Role::Client),
            Err(Error::Unauthorized(_))
        ));
    }
}
