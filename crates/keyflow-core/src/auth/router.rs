use std::sync::Arc;

use tracing::warn;

use super::{AuthClient, AuthenticatedSession};

/// The two screens the application can present. A session is either fully
/// present or fully absent; there is no half-authenticated state.
#[derive(Debug, Clone)]
pub enum Screen {
    LoggedOut,
    LoggedIn(AuthenticatedSession),
}

/// Owns the single "current session" slot and swaps the presented screen.
///
/// Written only by the successful-auth and logout paths; all reads and
/// writes happen on the UI task.
pub struct SessionRouter<C> {
    client: Arc<C>,
    screen: Screen,
}

impl<C: AuthClient> SessionRouter<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            screen: Screen::LoggedOut,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&AuthenticatedSession> {
        match &self.screen {
            Screen::LoggedIn(session) => Some(session),
            Screen::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.screen, Screen::LoggedIn(_))
    }

    /// Atomically replace the presented screen with the logged-in view.
    pub fn log_in(&mut self, session: AuthenticatedSession) {
        self.screen = Screen::LoggedIn(session);
    }

    /// Revoke the session and return to the logged-out screen.
    ///
    /// Logout is unconditional from the UI's perspective: a failed revoke is
    /// logged and the session slot is cleared regardless.
    pub async fn log_out(&mut self) {
        if let Err(err) = self.client.session_revoke().await {
            warn!(error = %err, "session revoke failed; logging out anyway");
        }
        self.screen = Screen::LoggedOut;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        AuthError, OAuthProvider, OAuthStart, OtpMethod, UserIdentity, UserName,
    };
    use chrono::Utc;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    struct MockClient {
        revoke_fails: bool,
        revoke_calls: AtomicUsize,
    }

    impl MockClient {
        fn new(revoke_fails: bool) -> Self {
            Self {
                revoke_fails,
                revoke_calls: AtomicUsize::new(0),
            }
        }
    }

    impl AuthClient for MockClient {
        async fn oauth_start(
            &self,
            _provider: OAuthProvider,
            _login_redirect: &Url,
            _signup_redirect: &Url,
        ) -> Result<OAuthStart, AuthError> {
            unreachable!("not exercised")
        }

        async fn oauth_authenticate(
            &self,
            _token: &str,
        ) -> Result<AuthenticatedSession, AuthError> {
            unreachable!("not exercised")
        }

        async fn otp_login_or_create(
            &self,
            _phone_e164: &str,
            _expiration_minutes: u32,
        ) -> Result<OtpMethod, AuthError> {
            unreachable!("not exercised")
        }

        async fn otp_authenticate(
            &self,
            _method_id: &str,
            _code: &str,
        ) -> Result<AuthenticatedSession, AuthError> {
            unreachable!("not exercised")
        }

        async fn session_revoke(&self) -> Result<(), AuthError> {
            self.revoke_calls.fetch_add(1, Ordering::SeqCst);
            if self.revoke_fails {
                return Err(AuthError::Endpoint {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "revoke failed".into(),
                });
            }
            Ok(())
        }
    }

    fn sample_session() -> AuthenticatedSession {
        AuthenticatedSession {
            session_token: "session-tok".into(),
            user: UserIdentity {
                user_id: "user-1".into(),
                name: UserName::default(),
                emails: vec![],
                phone_numbers: vec![],
                providers: vec![],
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn log_in_swaps_to_logged_in_screen() {
        let mut router = SessionRouter::new(Arc::new(MockClient::new(false)));
        assert!(!router.is_logged_in());
        router.log_in(sample_session());
        assert!(router.is_logged_in());
        assert_eq!(router.session().unwrap().user.user_id, "user-1");
    }

    #[tokio::test]
    async fn log_out_revokes_and_clears_session() {
        let client = Arc::new(MockClient::new(false));
        let mut router = SessionRouter::new(client.clone());
        router.log_in(sample_session());
        router.log_out().await;
        assert!(!router.is_logged_in());
        assert_eq!(client.revoke_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_out_clears_session_even_when_revoke_fails() {
        let client = Arc::new(MockClient::new(true));
        let mut router = SessionRouter::new(client.clone());
        router.log_in(sample_session());
        router.log_out().await;
        assert!(!router.is_logged_in());
        assert!(router.session().is_none());
        assert_eq!(client.revoke_calls.load(Ordering::SeqCst), 1);
    }
}
