use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::phone::PhoneNumber;

use super::{AuthClient, AuthError, AuthenticatedSession};

/// Requested lifetime of a delivered code, in minutes.
///
/// The same constant feeds the service request and the client-side deadline,
/// so the two can never disagree.
pub const OTP_EXPIRATION_MINUTES: u32 = 2;

/// A delivered one-time code waiting to be verified.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub method_id: String,
    pub phone: PhoneNumber,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time left before the challenge expires, clamped to zero.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }
}

/// Where the OTP flow currently stands.
#[derive(Debug, Clone)]
pub enum OtpFlowState {
    Idle,
    Requesting,
    AwaitingCode(OtpChallenge),
    Verifying(OtpChallenge),
}

/// Coordinates the phone-number sign-in flow: request a code for a valid
/// number, collect it, verify it, hand back a session.
///
/// One request at a time: while a service call is pending the triggering
/// control must stay disabled, and re-entry is rejected with
/// [`AuthError::RequestInFlight`]. The "valid E.164 number" precondition is
/// carried by the [`PhoneNumber`] argument type rather than checked here.
pub struct OtpFlow<C> {
    client: Arc<C>,
    state: OtpFlowState,
}

impl<C: AuthClient> OtpFlow<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: OtpFlowState::Idle,
        }
    }

    pub fn state(&self) -> &OtpFlowState {
        &self.state
    }

    /// Whether a service call is currently pending.
    pub fn in_flight(&self) -> bool {
        matches!(
            self.state,
            OtpFlowState::Requesting | OtpFlowState::Verifying(_)
        )
    }

    /// The challenge awaiting a code, if any.
    pub fn challenge(&self) -> Option<&OtpChallenge> {
        match &self.state {
            OtpFlowState::AwaitingCode(challenge) | OtpFlowState::Verifying(challenge) => {
                Some(challenge)
            }
            _ => None,
        }
    }

    /// Request a one-time code for `phone`.
    ///
    /// Permitted from `Idle` and from `AwaitingCode` (resend discards the
    /// old challenge). On service failure the flow returns to `Idle` and the
    /// error is handed back for user-visible display.
    pub async fn request_code(&mut self, phone: PhoneNumber) -> Result<OtpChallenge, AuthError> {
        if self.in_flight() {
            return Err(AuthError::RequestInFlight);
        }
        self.state = OtpFlowState::Requesting;

        let issued_at = Utc::now();
        let result = self
            .client
            .otp_login_or_create(phone.e164(), OTP_EXPIRATION_MINUTES)
            .await;
        match result {
            Ok(method) => {
                let challenge = OtpChallenge {
                    method_id: method.method_id,
                    phone,
                    expires_at: issued_at + Duration::minutes(i64::from(OTP_EXPIRATION_MINUTES)),
                };
                debug!(method_id = %challenge.method_id, "one-time code delivered");
                self.state = OtpFlowState::AwaitingCode(challenge.clone());
                Ok(challenge)
            }
            Err(err) => {
                self.state = OtpFlowState::Idle;
                Err(err)
            }
        }
    }

    /// Verify a user-entered code against the pending challenge.
    ///
    /// Expiry is enforced client-side before any network call; a wrong code
    /// keeps the challenge so the user can retry until the deadline.
    /// Success consumes the challenge and returns the session.
    pub async fn verify(&mut self, code: &str) -> Result<AuthenticatedSession, AuthError> {
        let challenge = match std::mem::replace(&mut self.state, OtpFlowState::Idle) {
            OtpFlowState::AwaitingCode(challenge) => challenge,
            OtpFlowState::Idle => return Err(AuthError::NoPendingChallenge),
            state @ (OtpFlowState::Requesting | OtpFlowState::Verifying(_)) => {
                self.state = state;
                return Err(AuthError::RequestInFlight);
            }
        };

        if challenge.is_expired() {
            debug!(method_id = %challenge.method_id, "challenge expired before verification");
            return Err(AuthError::CodeExpired);
        }

        self.state = OtpFlowState::Verifying(challenge.clone());
        let result = self.client.otp_authenticate(&challenge.method_id, code).await;
        match result {
            Ok(session) => {
                self.state = OtpFlowState::Idle;
                Ok(session)
            }
            Err(err) => {
                self.state = OtpFlowState::AwaitingCode(challenge);
                Err(err)
            }
        }
    }

    /// Drop any pending challenge, e.g. when the code-entry surface is
    /// dismissed.
    pub fn cancel(&mut self) {
        self.state = OtpFlowState::Idle;
    }

    #[cfg(test)]
    pub(crate) fn resume_with_challenge(&mut self, challenge: OtpChallenge) {
        self.state = OtpFlowState::AwaitingCode(challenge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{OAuthProvider, OAuthStart, OtpMethod, UserIdentity, UserName};
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct MockClient {
        otp_requests: AtomicUsize,
        otp_results: Mutex<VecDeque<Result<OtpMethod, AuthError>>>,
        verify_calls: AtomicUsize,
        verify_results: Mutex<VecDeque<Result<AuthenticatedSession, AuthError>>>,
    }

    impl MockClient {
        fn push_otp(&self, result: Result<OtpMethod, AuthError>) {
            self.otp_results.lock().unwrap().push_back(result);
        }

        fn push_verify(&self, result: Result<AuthenticatedSession, AuthError>) {
            self.verify_results.lock().unwrap().push_back(result);
        }
    }

    impl AuthClient for MockClient {
        async fn oauth_start(
            &self,
            _provider: OAuthProvider,
            _login_redirect: &Url,
            _signup_redirect: &Url,
        ) -> Result<OAuthStart, AuthError> {
            unreachable!("oauth not exercised in OTP tests")
        }

        async fn oauth_authenticate(
            &self,
            _token: &str,
        ) -> Result<AuthenticatedSession, AuthError> {
            unreachable!("oauth not exercised in OTP tests")
        }

        async fn otp_login_or_create(
            &self,
            _phone_e164: &str,
            _expiration_minutes: u32,
        ) -> Result<OtpMethod, AuthError> {
            self.otp_requests.fetch_add(1, Ordering::SeqCst);
            self.otp_results.lock().unwrap().pop_front().unwrap()
        }

        async fn otp_authenticate(
            &self,
            _method_id: &str,
            _code: &str,
        ) -> Result<AuthenticatedSession, AuthError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            self.verify_results.lock().unwrap().pop_front().unwrap()
        }

        async fn session_revoke(&self) -> Result<(), AuthError> {
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

    fn sample_phone() -> PhoneNumber {
        PhoneNumber::parse("+1 415 555 0100").unwrap()
    }

    fn endpoint_error() -> AuthError {
        AuthError::Endpoint {
            status: StatusCode::UNAUTHORIZED,
            body: "otp_code_not_found".into(),
        }
    }

    #[tokio::test]
    async fn requested_challenge_expires_in_the_future() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Ok(OtpMethod {
            method_id: "method-1".into(),
        }));
        let mut flow = OtpFlow::new(client);

        let before = Utc::now();
        let challenge = flow.request_code(sample_phone()).await.unwrap();
        assert!(challenge.expires_at > before);
        assert!(!challenge.is_expired());
        assert!(matches!(flow.state(), OtpFlowState::AwaitingCode(_)));
    }

    #[tokio::test]
    async fn request_failure_returns_to_idle_with_error() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Err(endpoint_error()));
        let mut flow = OtpFlow::new(client);

        let err = flow.request_code(sample_phone()).await.unwrap_err();
        assert!(matches!(err, AuthError::Endpoint { .. }));
        assert!(err.is_retryable());
        assert!(matches!(flow.state(), OtpFlowState::Idle));
    }

    #[tokio::test]
    async fn wrong_code_keeps_challenge_for_retry() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Ok(OtpMethod {
            method_id: "method-1".into(),
        }));
        client.push_verify(Err(endpoint_error()));
        client.push_verify(Ok(sample_session()));
        let mut flow = OtpFlow::new(client.clone());

        flow.request_code(sample_phone()).await.unwrap();
        let err = flow.verify("000000").await.unwrap_err();
        assert!(matches!(err, AuthError::Endpoint { .. }));
        assert_eq!(flow.challenge().unwrap().method_id, "method-1");

        let session = flow.verify("123456").await.unwrap();
        assert_eq!(session.session_token, "session-tok");
        assert_eq!(client.otp_requests.load(Ordering::SeqCst), 1);
        assert_eq!(client.verify_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_challenge_rejected_without_network_call() {
        let client = Arc::new(MockClient::default());
        // The service would accept the code; the client must not ask it.
        client.push_verify(Ok(sample_session()));
        let mut flow = OtpFlow::new(client.clone());
        flow.resume_with_challenge(OtpChallenge {
            method_id: "method-1".into(),
            phone: sample_phone(),
            expires_at: Utc::now() - Duration::seconds(1),
        });

        let err = flow.verify("123456").await.unwrap_err();
        assert!(matches!(err, AuthError::CodeExpired));
        assert!(!err.is_retryable());
        assert_eq!(client.verify_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(flow.state(), OtpFlowState::Idle));
    }

    #[tokio::test]
    async fn verify_without_challenge_is_rejected() {
        let client = Arc::new(MockClient::default());
        let mut flow = OtpFlow::new(client);
        let err = flow.verify("123456").await.unwrap_err();
        assert!(matches!(err, AuthError::NoPendingChallenge));
    }

    #[tokio::test]
    async fn success_consumes_the_challenge() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Ok(OtpMethod {
            method_id: "method-1".into(),
        }));
        client.push_verify(Ok(sample_session()));
        let mut flow = OtpFlow::new(client);

        flow.request_code(sample_phone()).await.unwrap();
        flow.verify("123456").await.unwrap();
        assert!(matches!(flow.state(), OtpFlowState::Idle));
        let err = flow.verify("123456").await.unwrap_err();
        assert!(matches!(err, AuthError::NoPendingChallenge));
    }

    #[tokio::test]
    async fn resend_replaces_pending_challenge() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Ok(OtpMethod {
            method_id: "method-1".into(),
        }));
        client.push_otp(Ok(OtpMethod {
            method_id: "method-2".into(),
        }));
        let mut flow = OtpFlow::new(client);

        flow.request_code(sample_phone()).await.unwrap();
        let challenge = flow.request_code(sample_phone()).await.unwrap();
        assert_eq!(challenge.method_id, "method-2");
        assert_eq!(flow.challenge().unwrap().method_id, "method-2");
    }

    #[tokio::test]
    async fn cancel_drops_pending_challenge() {
        let client = Arc::new(MockClient::default());
        client.push_otp(Ok(OtpMethod {
            method_id: "method-1".into(),
        }));
        let mut flow = OtpFlow::new(client);

        flow.request_code(sample_phone()).await.unwrap();
        flow.cancel();
        assert!(flow.challenge().is_none());
        assert!(matches!(flow.state(), OtpFlowState::Idle));
    }
}
