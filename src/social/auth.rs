//! Authentication collaborator
//!
//! Sign-in happens outside this crate. The social core only asks who the
//! current user is.

use std::sync::RwLock;
use tracing::info;

/// Supplies the signed-in user's opaque id.
pub trait AuthProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// A session set by the host application after it has signed the user in.
#[derive(Default)]
pub struct StaticSession {
    user_id: RwLock<Option<String>>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        info!("[Auth] signed in as {}", user_id);
        if let Ok(mut guard) = self.user_id.write() {
            *guard = Some(user_id);
        }
    }

    pub fn sign_out(&self) {
        info!("[Auth] signed out");
        if let Ok(mut guard) = self.user_id.write() {
            *guard = None;
        }
    }
}

impl AuthProvider for StaticSession {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|g| g.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_and_out() {
        let session = StaticSession::signed_out();
        assert_eq!(session.current_user_id(), None);
        session.sign_in("u1");
        assert_eq!(session.current_user_id().as_deref(), Some("u1"));
        session.sign_out();
        assert_eq!(session.current_user_id(), None);
    }
}
