//! Authenticated session lifecycle
//!
//! The session is an explicit value handed to every remote call. It is written
//! once after authentication and cleared once by [`SessionManager::release`].

use std::fmt;
use tracing::{debug, info, warn};

use crate::api::AccessApi;
use crate::error::AlignResult;

/// Bearer token holder passed to every outgoing request
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Session carrying a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Unauthenticated session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Current token, if authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Value of the `Authorization` header; empty when unauthenticated
    pub fn authorization_value(&self) -> String {
        match &self.token {
            Some(token) => format!("Bearer {}", token),
            None => String::new(),
        }
    }

    fn clear(&mut self) {
        self.token = None;
    }
}

// Tokens never end up in logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Acquires and releases the process-wide session
pub struct SessionManager<A: AccessApi> {
    access: A,
    session: Session,
}

impl<A: AccessApi> SessionManager<A> {
    /// Manager with no active session
    pub fn new(access: A) -> Self {
        Self {
            access,
            session: Session::anonymous(),
        }
    }

    /// Exchange credentials for a token and keep it for subsequent calls
    pub async fn authenticate(&mut self, username: &str, password: &str) -> AlignResult<&Session> {
        info!("Authenticating...");
        let token = self.access.request_token(username, password).await?;
        self.session = Session::with_token(token);
        info!("Authenticated!");
        Ok(&self.session)
    }

    /// Token of the active session
    pub fn current_token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Session to pass to remote calls
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Best-effort logout followed by clearing the local token
    ///
    /// Failures are logged and swallowed. Calling this without an active
    /// session does nothing.
    pub async fn release(&mut self) {
        if self.session.token().is_some() {
            match self.access.logout(&self.session).await {
                Ok(()) => debug!("Logged out"),
                Err(e) => warn!("Unable to logout: {}", e),
            }
        }
        self.session.clear();
    }

    /// Underlying access client
    pub fn access(&self) -> &A {
        &self.access
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignError;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Access {}

        #[async_trait]
        impl AccessApi for Access {
            async fn request_token(&self, username: &str, password: &str) -> AlignResult<String>;
            async fn logout(&self, session: &Session) -> AlignResult<()>;
        }
    }

    #[test]
    fn test_authorization_value() {
        assert_eq!(Session::with_token("abc").authorization_value(), "Bearer abc");
        assert_eq!(Session::anonymous().authorization_value(), "");
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", Session::with_token("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let mut access = MockAccess::new();
        access
            .expect_request_token()
            .withf(|u, p| u == "admin" && p == "pw")
            .times(1)
            .returning(|_, _| Ok("tok".to_string()));

        let mut manager = SessionManager::new(access);
        manager.authenticate("admin", "pw").await.unwrap();
        assert_eq!(manager.current_token(), Some("tok"));
    }

    #[tokio::test]
    async fn test_failed_authentication_leaves_no_token() {
        let mut access = MockAccess::new();
        access
            .expect_request_token()
            .returning(|_, _| Err(AlignError::Authentication("Unauthorized!".to_string())));
        access.expect_logout().times(0);

        let mut manager = SessionManager::new(access);
        let result = manager.authenticate("admin", "wrong").await;
        assert!(matches!(result, Err(AlignError::Authentication(_))));
        assert_eq!(manager.current_token(), None);

        manager.release().await;
    }

    #[tokio::test]
    async fn test_release_clears_token_even_when_logout_fails() {
        let mut access = MockAccess::new();
        access.expect_request_token().returning(|_, _| Ok("tok".to_string()));
        access
            .expect_logout()
            .times(1)
            .returning(|_| Err(AlignError::remote(500, "boom")));

        let mut manager = SessionManager::new(access);
        manager.authenticate("admin", "pw").await.unwrap();
        manager.release().await;
        assert_eq!(manager.current_token(), None);

        // already released: no second logout
        manager.release().await;
    }

    #[tokio::test]
    async fn test_logout_receives_active_session() {
        let mut access = MockAccess::new();
        access.expect_request_token().returning(|_, _| Ok("tok".to_string()));
        access
            .expect_logout()
            .withf(|session| session.authorization_value() == "Bearer tok")
            .times(1)
            .returning(|_| Ok(()));

        let mut manager = SessionManager::new(access);
        manager.authenticate("admin", "pw").await.unwrap();
        manager.release().await;
    }
}
