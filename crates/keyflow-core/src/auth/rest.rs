use std::sync::Mutex;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{AuthClient, AuthError, AuthenticatedSession, OAuthProvider, OAuthStart, OtpMethod};

const DEFAULT_USER_AGENT: &str = "keyflow/0.1.0";

/// Client configuration supplied once at startup and injected into the
/// coordinators; replaces any ambient process-wide SDK initialization.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub public_token: String,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(public_token: S) -> Self {
        Self {
            public_token: public_token.into(),
        }
    }
}

/// Service endpoints used by the REST binding.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub base_url: Url,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://auth.keyflow.app/v1/").expect("valid service URL"),
        }
    }
}

impl ServiceEndpoints {
    fn join(&self, path: &str) -> Result<Url, AuthError> {
        Ok(self.base_url.join(path)?)
    }
}

/// HTTP binding for the hosted auth service.
///
/// The current session token lives inside the binding, not in the UI layer:
/// authenticate calls store it and revoke consumes it, so the front-ends
/// only ever see a complete [`AuthenticatedSession`] or nothing.
pub struct RestAuthClient {
    http: Client,
    config: ClientConfig,
    endpoints: ServiceEndpoints,
    session_token: Mutex<Option<String>>,
}

impl RestAuthClient {
    pub fn new(config: ClientConfig) -> Result<Self, AuthError> {
        Self::with_endpoints(config, ServiceEndpoints::default())
    }

    pub fn with_endpoints(
        config: ClientConfig,
        endpoints: ServiceEndpoints,
    ) -> Result<Self, AuthError> {
        let http = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self {
            http,
            config,
            endpoints,
            session_token: Mutex::new(None),
        })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    fn remember_session(&self, session: &AuthenticatedSession) {
        let mut slot = self
            .session_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(session.session_token.clone());
    }

    fn take_session_token(&self) -> Option<String> {
        self.session_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthError> {
        let response = self
            .http
            .post(self.endpoints.join(path)?)
            .bearer_auth(&self.config.public_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "".into());
            return Err(AuthError::Endpoint { status, body });
        }
        Ok(response.json().await?)
    }
}

impl AuthClient for RestAuthClient {
    async fn oauth_start(
        &self,
        provider: OAuthProvider,
        login_redirect: &Url,
        signup_redirect: &Url,
    ) -> Result<OAuthStart, AuthError> {
        let payload: OAuthStartResponse = self
            .post_json(
                &format!("oauth/{}/start", provider.slug()),
                json!({
                    "login_redirect_url": login_redirect.as_str(),
                    "signup_redirect_url": signup_redirect.as_str(),
                }),
            )
            .await?;
        Ok(OAuthStart {
            token: payload.token,
            callback_url: Url::parse(&payload.callback_url)?,
        })
    }

    async fn oauth_authenticate(&self, token: &str) -> Result<AuthenticatedSession, AuthError> {
        let session: AuthenticatedSession = self
            .post_json("oauth/authenticate", json!({ "token": token }))
            .await?;
        self.remember_session(&session);
        Ok(session)
    }

    async fn otp_login_or_create(
        &self,
        phone_e164: &str,
        expiration_minutes: u32,
    ) -> Result<OtpMethod, AuthError> {
        let payload: OtpStartResponse = self
            .post_json(
                "otps/sms/login_or_create",
                json!({
                    "phone_number": phone_e164,
                    "expiration_minutes": expiration_minutes,
                }),
            )
            .await?;
        Ok(OtpMethod {
            method_id: payload.method_id,
        })
    }

    async fn otp_authenticate(
        &self,
        method_id: &str,
        code: &str,
    ) -> Result<AuthenticatedSession, AuthError> {
        let session: AuthenticatedSession = self
            .post_json(
                "otps/authenticate",
                json!({ "method_id": method_id, "code": code }),
            )
            .await?;
        self.remember_session(&session);
        Ok(session)
    }

    async fn session_revoke(&self) -> Result<(), AuthError> {
        // Nothing to revoke if no authenticate call succeeded this run.
        let Some(token) = self.take_session_token() else {
            return Ok(());
        };
        let _: RevokeResponse = self
            .post_json("sessions/revoke", json!({ "session_token": token }))
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct OAuthStartResponse {
    token: String,
    callback_url: String,
}

#[derive(Debug, Deserialize)]
struct OtpStartResponse {
    method_id: String,
}

#[derive(Debug, Deserialize)]
struct RevokeResponse {}
