use url::Url;

use super::{AuthError, AuthenticatedSession};

/// Third-party identity providers offered on the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Apple,
}

impl OAuthProvider {
    pub const fn all() -> [OAuthProvider; 2] {
        [OAuthProvider::Google, OAuthProvider::Apple]
    }

    /// Identifier used in service request paths.
    pub fn slug(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Apple => "apple",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OAuthProvider::Google => "Google",
            OAuthProvider::Apple => "Apple",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of starting a provider web-session: an opaque token to exchange
/// plus the callback URL the provider redirected to.
#[derive(Debug, Clone)]
pub struct OAuthStart {
    pub token: String,
    pub callback_url: Url,
}

/// Identifier for a delivered one-time code, consumed exactly once by a
/// verify call.
#[derive(Debug, Clone)]
pub struct OtpMethod {
    pub method_id: String,
}

/// Capability surface of the hosted authentication service.
///
/// The flow coordinators are generic over this trait; production code uses
/// [`super::RestAuthClient`] and tests substitute in-memory
/// implementations.
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// Begin a provider OAuth web-session and wait for its completion.
    async fn oauth_start(
        &self,
        provider: OAuthProvider,
        login_redirect: &Url,
        signup_redirect: &Url,
    ) -> Result<OAuthStart, AuthError>;

    /// Exchange an opaque OAuth completion token for a session.
    async fn oauth_authenticate(&self, token: &str) -> Result<AuthenticatedSession, AuthError>;

    /// Deliver a one-time code over SMS, creating the user if needed.
    async fn otp_login_or_create(
        &self,
        phone_e164: &str,
        expiration_minutes: u32,
    ) -> Result<OtpMethod, AuthError>;

    /// Verify a one-time code against its challenge.
    async fn otp_authenticate(
        &self,
        method_id: &str,
        code: &str,
    ) -> Result<AuthenticatedSession, AuthError>;

    /// Revoke the current session server-side.
    async fn session_revoke(&self) -> Result<(), AuthError>;
}
