mod client;
mod error;
mod oauth;
mod otp;
mod rest;
mod router;
mod session;
mod validation;

pub use client::{AuthClient, OAuthProvider, OAuthStart, OtpMethod};
pub use error::AuthError;
pub use oauth::{
    Completion, OAuthFlow, OAuthOutcome, DEFAULT_LOGIN_REDIRECT, DEFAULT_SIGNUP_REDIRECT,
};
pub use otp::{OtpChallenge, OtpFlow, OtpFlowState, OTP_EXPIRATION_MINUTES};
pub use rest::{ClientConfig, RestAuthClient, ServiceEndpoints};
pub use router::{Screen, SessionRouter};
pub use session::{
    AuthenticatedSession, EmailEntry, PhoneEntry, ProviderEntry, UserIdentity, UserName,
};
pub use validation::{InputFeedback, PhoneValidation, INVALID_NUMBER_MESSAGE};
