use std::sync::Arc;

use tracing::debug;
use url::Url;

use super::{AuthClient, AuthError, AuthenticatedSession, OAuthProvider};

pub const DEFAULT_LOGIN_REDIRECT: &str = "keyflow://login";
pub const DEFAULT_SIGNUP_REDIRECT: &str = "keyflow://signup";

/// Whether the provider web-session completed as a returning login or a
/// first-time signup. Only the greeting differs; both paths reach the same
/// token exchange and the same success state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Login,
    Signup,
}

impl Completion {
    /// Derived from the final path segment of the callback URL.
    pub fn from_callback_url(url: &Url) -> Self {
        let last_segment = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            // Custom schemes like `keyflow://login` put the discriminator in
            // the host position instead of the path.
            .or_else(|| url.host_str());
        match last_segment {
            Some("login") => Completion::Login,
            _ => Completion::Signup,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Completion::Login => "Welcome back!",
            Completion::Signup => "Welcome",
        }
    }
}

/// Result of a completed OAuth flow.
#[derive(Debug, Clone)]
pub struct OAuthOutcome {
    pub session: AuthenticatedSession,
    pub completion: Completion,
}

/// Coordinates third-party sign-in: start the provider web-session, then
/// exchange the returned token for a session.
///
/// The two steps are distinct on purpose. The first is bound to the
/// provider redirect, the second to the opaque token; collapsing them would
/// hide which half failed and they must stay separate calls.
pub struct OAuthFlow<C> {
    client: Arc<C>,
    login_redirect: Url,
    signup_redirect: Url,
}

impl<C: AuthClient> OAuthFlow<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            login_redirect: Url::parse(DEFAULT_LOGIN_REDIRECT).expect("valid redirect URL"),
            signup_redirect: Url::parse(DEFAULT_SIGNUP_REDIRECT).expect("valid redirect URL"),
        }
    }

    pub fn with_redirects(mut self, login_redirect: Url, signup_redirect: Url) -> Self {
        self.login_redirect = login_redirect;
        self.signup_redirect = signup_redirect;
        self
    }

    /// Run the full flow for `provider`.
    ///
    /// Failure at either step surfaces the error as-is; no partial session
    /// state is retained.
    pub async fn start(&self, provider: OAuthProvider) -> Result<OAuthOutcome, AuthError> {
        let started = self
            .client
            .oauth_start(provider, &self.login_redirect, &self.signup_redirect)
            .await?;
        let completion = Completion::from_callback_url(&started.callback_url);
        debug!(%provider, ?completion, "provider web-session completed");

        let session = self.client.oauth_authenticate(&started.token).await?;
        Ok(OAuthOutcome {
            session,
            completion,
        })
    }
}
